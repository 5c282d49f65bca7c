//! Wire payload shaping.
//!
//! Projects the diff results into the two payload shapes consumed by the
//! external update endpoints. The two payloads are always separate requests:
//! a metadata-only PATCH, and a schedule update whose four operation lists
//! the backend must apply as a single atomic unit.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{FieldValue, MetadataDiff, MetadataField, ScheduleDiff};

/// Body of the metadata-only update request: any subset of
/// `{name, fee, maxStudents, courseId, status}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataPayload(BTreeMap<MetadataField, FieldValue>);

impl MetadataPayload {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: MetadataField) -> Option<&FieldValue> {
        self.0.get(&field)
    }
}

/// Body of the schedule update request. The plan scalars are present only
/// when the corresponding metadata field changed: the schedule endpoint needs
/// them to validate session dates and counts against the class-level plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub sessions: ScheduleDiff,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_date_plan: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_plan: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_of_sessions: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<FieldValue>,
}

/// Project a metadata diff onto the metadata-only wire shape.
///
/// The plan scalars never appear here: they belong to the schedule payload.
/// Over the remaining fields this is an identity transform, kept so the wire
/// contract stays decoupled from the internal diff representation.
pub fn build_metadata_payload(metadata: &MetadataDiff) -> MetadataPayload {
    MetadataPayload(
        metadata
            .iter()
            .filter(|(field, _)| !field.is_plan_scalar())
            .map(|(field, value)| (*field, value.clone()))
            .collect(),
    )
}

/// Wrap a schedule diff for the schedule-update endpoint, lifting any changed
/// plan scalars out of the metadata diff onto the payload's top level.
pub fn build_schedule_payload(schedule: &ScheduleDiff, metadata: &MetadataDiff) -> SchedulePayload {
    SchedulePayload {
        sessions: schedule.clone(),
        open_date_plan: metadata.get(&MetadataField::OpenDatePlan).cloned(),
        end_date_plan: metadata.get(&MetadataField::EndDatePlan).cloned(),
        num_of_sessions: metadata.get(&MetadataField::NumOfSessions).cloned(),
        instructor_id: metadata.get(&MetadataField::InstructorId).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SessionOp, UpdateRecord};
    use chrono::NaiveDate;
    use serde_json::json;

    fn sample_metadata_diff() -> MetadataDiff {
        let mut diff = MetadataDiff::new();
        diff.insert(MetadataField::Fee, FieldValue::from(600));
        diff.insert(MetadataField::Status, FieldValue::from("open"));
        diff.insert(MetadataField::NumOfSessions, FieldValue::from(12));
        diff.insert(MetadataField::OpenDatePlan, FieldValue::from("2024-03-01"));
        diff
    }

    #[test]
    fn test_metadata_payload_excludes_plan_scalars() {
        let payload = build_metadata_payload(&sample_metadata_diff());
        assert_eq!(payload.get(MetadataField::Fee), Some(&FieldValue::from(600)));
        assert_eq!(
            payload.get(MetadataField::Status),
            Some(&FieldValue::from("open"))
        );
        assert_eq!(payload.get(MetadataField::NumOfSessions), None);
        assert_eq!(payload.get(MetadataField::OpenDatePlan), None);
    }

    #[test]
    fn test_metadata_payload_wire_shape() {
        let payload = build_metadata_payload(&sample_metadata_diff());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({ "fee": 600, "status": "open" }));
    }

    #[test]
    fn test_schedule_payload_lifts_plan_scalars() {
        let mut schedule = ScheduleDiff::default();
        schedule.push(SessionOp::Update(UpdateRecord {
            session_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            timeslot_id: 3,
            instructor_id: 11,
            title: None,
            description: None,
        }));
        schedule.push(SessionOp::Delete(4));

        let payload = build_schedule_payload(&schedule, &sample_metadata_diff());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "sessions": {
                    "update": [{
                        "sessionId": 1,
                        "date": "2024-01-12",
                        "timeslotId": 3,
                        "instructorId": 11
                    }],
                    "create": [],
                    "delete": [4],
                    "reschedule": []
                },
                "openDatePlan": "2024-03-01",
                "numOfSessions": 12
            })
        );
    }

    #[test]
    fn test_schedule_payload_omits_absent_scalars() {
        let payload = build_schedule_payload(&ScheduleDiff::default(), &MetadataDiff::new());
        let value = serde_json::to_value(&payload).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.keys().collect::<Vec<_>>(), vec!["sessions"]);
    }
}
