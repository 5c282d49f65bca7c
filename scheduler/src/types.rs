//! # Types Module
//!
//! Core data structures shared by the diffing components: the canonical [`Session`]
//! and [`ClassMetadata`] records that every external representation is normalized
//! onto before diffing, the [`SessionOp`] operation variants the reconciler emits,
//! and the [`ScheduleDiff`] buckets that mirror the schedule-update wire contract.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One scheduled teaching occurrence of a class.
///
/// This is the canonical session shape: the boundary adapter maps every loose
/// external representation onto it before any diffing occurs, so the reconciler
/// never has to deal with aliased field names or string-encoded dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Durable key assigned by the backend; absent for not-yet-created sessions.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Calendar date the session occurs on (no time component).
    pub date: NaiveDate,
    /// Reference to a fixed daily time window shared across the platform.
    pub timeslot_id: i64,
    pub instructor_id: i64,
    pub class_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External meeting reference, if one has been provisioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_uuid: Option<String>,
    /// When set together with `is_rescheduled`, marks this record as the
    /// replacement for the session identified by that id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_session_id: Option<i64>,
    #[serde(default)]
    pub is_rescheduled: bool,
}

/// The `(date, timeslot)` pair that identifies a session when no durable key exists.
pub type SlotKey = (NaiveDate, i64);

impl Session {
    /// The content key of this session.
    pub fn slot(&self) -> SlotKey {
        (self.date, self.timeslot_id)
    }
}

/// A scalar attribute value as supplied by the editing UI.
///
/// The UI sends numbers and numeric strings interchangeably (`500` one edit,
/// `"500"` the next), so scalar fields are kept as a tagged union and compared
/// through [`FieldValue::normalized_eq`] rather than raw equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value, parsing numeric strings.
    fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    /// Numerically normalized equality: `Text("100")` equals `Int(100)`.
    ///
    /// Values that both have a numeric reading are compared as numbers;
    /// everything else falls back to same-variant equality.
    pub fn normalized_eq(&self, other: &FieldValue) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Scalar class attributes unrelated to the session list, plus the
/// scheduling-adjacent scalars that ride along with a schedule payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassMetadata {
    pub name: Option<String>,
    pub fee: Option<FieldValue>,
    pub max_students: Option<FieldValue>,
    pub course_id: Option<FieldValue>,
    pub status: Option<String>,
    pub open_date_plan: Option<NaiveDate>,
    pub end_date_plan: Option<NaiveDate>,
    pub num_of_sessions: Option<FieldValue>,
    pub instructor_id: Option<FieldValue>,
}

/// The diffable fields of [`ClassMetadata`], in wire spelling order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum MetadataField {
    Name,
    Fee,
    MaxStudents,
    CourseId,
    Status,
    OpenDatePlan,
    EndDatePlan,
    NumOfSessions,
    InstructorId,
}

impl MetadataField {
    /// Every diffable field, in a fixed order.
    pub const ALL: [MetadataField; 9] = [
        MetadataField::Name,
        MetadataField::Fee,
        MetadataField::MaxStudents,
        MetadataField::CourseId,
        MetadataField::Status,
        MetadataField::OpenDatePlan,
        MetadataField::EndDatePlan,
        MetadataField::NumOfSessions,
        MetadataField::InstructorId,
    ];

    /// True for the scheduling-adjacent scalars that must ride along with a
    /// schedule payload rather than a metadata-only payload.
    pub fn is_plan_scalar(self) -> bool {
        matches!(
            self,
            MetadataField::OpenDatePlan
                | MetadataField::EndDatePlan
                | MetadataField::NumOfSessions
                | MetadataField::InstructorId
        )
    }
}

impl ClassMetadata {
    /// The current value of `field`, widened to a [`FieldValue`].
    ///
    /// Returns `None` when the field is unset, which the differ treats the
    /// same as the field being absent from the edit form.
    pub fn field(&self, field: MetadataField) -> Option<FieldValue> {
        match field {
            MetadataField::Name => self.name.clone().map(FieldValue::Text),
            MetadataField::Fee => self.fee.clone(),
            MetadataField::MaxStudents => self.max_students.clone(),
            MetadataField::CourseId => self.course_id.clone(),
            MetadataField::Status => self.status.clone().map(FieldValue::Text),
            MetadataField::OpenDatePlan => self
                .open_date_plan
                .map(|d| FieldValue::Text(d.to_string())),
            MetadataField::EndDatePlan => self
                .end_date_plan
                .map(|d| FieldValue::Text(d.to_string())),
            MetadataField::NumOfSessions => self.num_of_sessions.clone(),
            MetadataField::InstructorId => self.instructor_id.clone(),
        }
    }
}

/// Changed metadata fields mapped to their new values. Ordered so that diff
/// output (and anything serialized from it) is deterministic.
pub type MetadataDiff = BTreeMap<MetadataField, FieldValue>;

/// Moves an existing session to a new date or timeslot, keyed by its durable id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    pub session_id: i64,
    pub date: NaiveDate,
    pub timeslot_id: i64,
    pub instructor_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A brand-new session; carries no durable id by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecord {
    pub date: NaiveDate,
    pub timeslot_id: i64,
    pub instructor_id: i64,
    pub class_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_uuid: Option<String>,
}

/// Replaces the session identified by `original_session_id` while preserving
/// the attendance history tied to it, as opposed to a delete+create pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRecord {
    pub original_session_id: i64,
    pub date: NaiveDate,
    pub timeslot_id: i64,
    pub instructor_id: i64,
    pub class_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_uuid: Option<String>,
}

impl UpdateRecord {
    pub fn from_session(session: &Session, session_id: i64) -> Self {
        Self {
            session_id,
            date: session.date,
            timeslot_id: session.timeslot_id,
            instructor_id: session.instructor_id,
            title: session.title.clone(),
            description: session.description.clone(),
        }
    }
}

impl CreateRecord {
    pub fn from_session(session: &Session) -> Self {
        Self {
            date: session.date,
            timeslot_id: session.timeslot_id,
            instructor_id: session.instructor_id,
            class_id: session.class_id,
            title: session.title.clone(),
            description: session.description.clone(),
            zoom_uuid: session.zoom_uuid.clone(),
        }
    }
}

impl RescheduleRecord {
    pub fn from_session(session: &Session, original_session_id: i64) -> Self {
        Self {
            original_session_id,
            date: session.date,
            timeslot_id: session.timeslot_id,
            instructor_id: session.instructor_id,
            class_id: session.class_id,
            title: session.title.clone(),
            description: session.description.clone(),
            zoom_uuid: session.zoom_uuid.clone(),
        }
    }
}

/// One reconciliation operation.
///
/// The variants carry distinct record shapes so a consumer cannot treat an
/// update as a create (or either as a reschedule) by accident.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOp {
    Update(UpdateRecord),
    Create(CreateRecord),
    Delete(i64),
    Reschedule(RescheduleRecord),
}

/// The reconciler result: four operation buckets matching the schedule-update
/// wire contract. `delete` is a plain list of durable session ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleDiff {
    pub update: Vec<UpdateRecord>,
    pub create: Vec<CreateRecord>,
    pub delete: Vec<i64>,
    pub reschedule: Vec<RescheduleRecord>,
}

impl ScheduleDiff {
    /// Route an operation into its bucket.
    pub fn push(&mut self, op: SessionOp) {
        match op {
            SessionOp::Update(record) => self.update.push(record),
            SessionOp::Create(record) => self.create.push(record),
            SessionOp::Delete(session_id) => self.delete.push(session_id),
            SessionOp::Reschedule(record) => self.reschedule.push(record),
        }
    }

    /// True when no bucket holds any operation.
    pub fn is_empty(&self) -> bool {
        self.update.is_empty()
            && self.create.is_empty()
            && self.delete.is_empty()
            && self.reschedule.is_empty()
    }

    /// Total number of operations across all buckets.
    pub fn len(&self) -> usize {
        self.update.len() + self.create.len() + self.delete.len() + self.reschedule.len()
    }
}

impl FromIterator<SessionOp> for ScheduleDiff {
    fn from_iter<I: IntoIterator<Item = SessionOp>>(ops: I) -> Self {
        let mut diff = ScheduleDiff::default();
        for op in ops {
            diff.push(op);
        }
        diff
    }
}
