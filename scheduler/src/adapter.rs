//! Boundary normalization.
//!
//! External collaborators deliver sessions in a loose shape: the durable id
//! arrives as `sessionId`, `session_id` or plain `id` depending on the
//! endpoint, dates are strings (sometimes with a time part tacked on), and
//! several fields may simply be missing. This module maps all of that onto
//! the canonical [`Session`] record before any diffing occurs, so the
//! reconciler only ever sees the canonical shape.
//!
//! Validation lives here, not in the reconciler: an entry without a date or
//! timeslot can never be matched by content key, so it is rejected (strict)
//! or dropped with a warning (lenient) at this boundary.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ScheduleError;
use crate::types::Session;

/// A session as delivered by the UI or the fetch layer, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSession {
    #[serde(alias = "session_id", alias = "id")]
    pub session_id: Option<i64>,
    #[serde(alias = "sessionDate", alias = "scheduleDate", alias = "session_date")]
    pub date: Option<String>,
    #[serde(alias = "timeslot_id", alias = "timeSlotId")]
    pub timeslot_id: Option<i64>,
    #[serde(alias = "instructor_id", alias = "teacherId")]
    pub instructor_id: Option<i64>,
    #[serde(alias = "class_id")]
    pub class_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "zoom_uuid", alias = "zoomUUID")]
    pub zoom_uuid: Option<String>,
    #[serde(alias = "original_session_id")]
    pub original_session_id: Option<i64>,
    #[serde(alias = "is_rescheduled")]
    pub is_rescheduled: Option<bool>,
}

impl RawSession {
    /// Normalize onto the canonical [`Session`] shape.
    ///
    /// # Returns
    /// * `Ok(Session)` when the record carries a parseable date and a timeslot.
    /// * `Err(ScheduleError)` describing the first missing or malformed field.
    pub fn normalize(&self) -> Result<Session, ScheduleError> {
        let raw_date = self.date.as_deref().ok_or(ScheduleError::MissingDate)?;
        let date = parse_date(raw_date)?;
        let timeslot_id = self.timeslot_id.ok_or(ScheduleError::MissingTimeslot)?;

        Ok(Session {
            id: self.session_id,
            date,
            timeslot_id,
            instructor_id: self.instructor_id.unwrap_or_default(),
            class_id: self.class_id.unwrap_or_default(),
            title: self.title.clone(),
            description: self.description.clone(),
            zoom_uuid: self.zoom_uuid.clone(),
            original_session_id: self.original_session_id,
            is_rescheduled: self.is_rescheduled.unwrap_or(false),
        })
    }
}

/// Parse a calendar date, tolerating a trailing time part (`2024-01-10T09:00:00`).
fn parse_date(raw: &str) -> Result<NaiveDate, ScheduleError> {
    let date_part = raw.split('T').next().unwrap_or(raw).trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate(raw.to_string()))
}

/// Normalize a whole collection, failing on the first malformed entry.
pub fn normalize_sessions(raw: &[RawSession]) -> Result<Vec<Session>, ScheduleError> {
    raw.iter().map(RawSession::normalize).collect()
}

/// Normalize a whole collection, dropping malformed entries.
///
/// This is the pre-filter for callers that prefer one broken row to cost only
/// itself rather than the whole diff.
pub fn normalize_sessions_lenient(raw: &[RawSession]) -> Vec<Session> {
    raw.iter()
        .filter_map(|r| match r.normalize() {
            Ok(session) => Some(session),
            Err(err) => {
                log::warn!("dropping malformed session record: {err}");
                None
            }
        })
        .collect()
}

/// Check the slot-uniqueness invariant: no two sessions of one class may
/// occupy the same date and timeslot.
pub fn check_unique_slots(sessions: &[Session]) -> Result<(), ScheduleError> {
    let mut seen = std::collections::BTreeSet::new();
    for session in sessions {
        if !seen.insert(session.slot()) {
            return Err(ScheduleError::DuplicateSlot {
                date: session.date,
                timeslot_id: session.timeslot_id,
            });
        }
    }
    Ok(())
}
