//! Scheduler Error Types
//!
//! This module defines the [`ScheduleError`] enum covering everything that can go wrong
//! while normalizing external session data at the system boundary.
//!
//! The reconciliation functions themselves are infallible: once a session has passed
//! normalization it always carries a valid slot, so diffing can never fail. Errors only
//! arise while converting loose external records into the canonical [`crate::types::Session`]
//! shape, or when a caller opts into strict collection validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Represents all error types that can occur in the scheduler system.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// A session record has no calendar date.
    #[error("session has no calendar date")]
    MissingDate,
    /// A session record has no timeslot reference.
    #[error("session has no timeslot reference")]
    MissingTimeslot,
    /// A session date string could not be parsed.
    #[error("invalid session date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    /// Two sessions of the same class occupy the same date and timeslot.
    #[error("duplicate slot: more than one session on {date} in timeslot {timeslot_id}")]
    DuplicateSlot {
        date: NaiveDate,
        timeslot_id: i64,
    },
}
