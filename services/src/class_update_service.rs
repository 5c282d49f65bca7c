//! Class update planning.
//!
//! Wires the diffing components together for one edit session: the metadata
//! differ and the schedule reconciler run independently on the (old, new)
//! snapshot pair, the classifier combines their results, and the payload
//! builders shape whatever actually needs to go over the wire.
//!
//! The two payloads stay separate requests. The schedule payload must be
//! applied by the backend as one atomic unit (all four operation lists
//! succeed or none do); that contract binds the transport collaborator, not
//! this service.

use serde::Serialize;

use scheduler::{
    ChangeType, ClassMetadata, MetadataPayload, SchedulePayload, Session, build_metadata_payload,
    build_schedule_payload, classify, diff_metadata, reconcile,
};

/// A class as known at one point in time: its scalar attributes and its
/// session collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassSnapshot {
    pub metadata: ClassMetadata,
    pub sessions: Vec<Session>,
}

/// The outcome of planning one edit: what kind of change it is, and the
/// request bodies to send. A payload is `None` when that endpoint has
/// nothing to receive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassUpdatePlan {
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_payload: Option<MetadataPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_payload: Option<SchedulePayload>,
}

impl ClassUpdatePlan {
    /// True when the edit session changed nothing worth sending.
    pub fn is_noop(&self) -> bool {
        self.metadata_payload.is_none() && self.schedule_payload.is_none()
    }
}

pub struct ClassUpdateService;

impl ClassUpdateService {
    /// Plan the requests for an edit of an existing class.
    ///
    /// # Arguments
    /// * `new` - The snapshot produced by the editing session.
    /// * `old` - The last-fetched committed snapshot.
    pub fn plan_update(new: &ClassSnapshot, old: &ClassSnapshot) -> ClassUpdatePlan {
        let metadata_diff = diff_metadata(&new.metadata, Some(&old.metadata));
        let schedule_diff = reconcile(&new.sessions, &old.sessions);
        let change_type = classify(&metadata_diff, &schedule_diff);

        log::info!("class update classified as {change_type}");
        log::debug!(
            "metadata fields changed: {}, session operations: {}",
            metadata_diff.len(),
            schedule_diff.len()
        );

        let metadata_payload =
            Some(build_metadata_payload(&metadata_diff)).filter(|p| !p.is_empty());

        // Changed plan scalars ride with the schedule payload even when no
        // session moved, so the endpoint can revalidate the class-level plan.
        let plan_scalars_changed = metadata_diff.keys().any(|f| f.is_plan_scalar());
        let schedule_payload = if !schedule_diff.is_empty() || plan_scalars_changed {
            Some(build_schedule_payload(&schedule_diff, &metadata_diff))
        } else {
            None
        };

        ClassUpdatePlan {
            change_type,
            metadata_payload,
            schedule_payload,
        }
    }

    /// Plan the requests for a brand-new class: every metadata field present
    /// in the snapshot is new, and every session is a create.
    pub fn plan_creation(new: &ClassSnapshot) -> ClassUpdatePlan {
        let metadata_diff = diff_metadata(&new.metadata, None);
        let schedule_diff = reconcile(&new.sessions, &[]);
        let change_type = classify(&metadata_diff, &schedule_diff);

        log::info!(
            "class creation planned: {} metadata fields, {} sessions",
            metadata_diff.len(),
            schedule_diff.create.len()
        );

        let metadata_payload =
            Some(build_metadata_payload(&metadata_diff)).filter(|p| !p.is_empty());
        let schedule_payload = if schedule_diff.is_empty()
            && !metadata_diff.keys().any(|f| f.is_plan_scalar())
        {
            None
        } else {
            Some(build_schedule_payload(&schedule_diff, &metadata_diff))
        };

        ClassUpdatePlan {
            change_type,
            metadata_payload,
            schedule_payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use scheduler::{FieldValue, MetadataField};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn session(id: Option<i64>, day: &str, timeslot_id: i64) -> Session {
        Session {
            id,
            date: date(day),
            timeslot_id,
            instructor_id: 11,
            class_id: 7,
            title: None,
            description: None,
            zoom_uuid: None,
            original_session_id: None,
            is_rescheduled: false,
        }
    }

    fn snapshot(fee: i64, sessions: Vec<Session>) -> ClassSnapshot {
        ClassSnapshot {
            metadata: ClassMetadata {
                name: Some("Algebra II".to_string()),
                fee: Some(FieldValue::from(fee)),
                status: Some("open".to_string()),
                ..Default::default()
            },
            sessions,
        }
    }

    #[test]
    fn test_unchanged_snapshot_is_a_noop() {
        let old = snapshot(500, vec![session(Some(1), "2024-01-10", 3)]);
        let plan = ClassUpdateService::plan_update(&old.clone(), &old);

        assert_eq!(plan.change_type, ChangeType::None);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_metadata_only_edit() {
        let old = snapshot(500, vec![session(Some(1), "2024-01-10", 3)]);
        let new = snapshot(600, old.sessions.clone());
        let plan = ClassUpdateService::plan_update(&new, &old);

        assert_eq!(plan.change_type, ChangeType::MetadataOnly);
        let payload = plan.metadata_payload.expect("metadata payload");
        assert_eq!(payload.get(MetadataField::Fee), Some(&FieldValue::from(600)));
        assert!(plan.schedule_payload.is_none());
    }

    #[test]
    fn test_schedule_only_edit() {
        let old = snapshot(500, vec![session(Some(1), "2024-01-10", 3)]);
        let mut new = old.clone();
        new.sessions.push(session(None, "2024-01-20", 2));
        let plan = ClassUpdateService::plan_update(&new, &old);

        assert_eq!(plan.change_type, ChangeType::ScheduleOnly);
        assert!(plan.metadata_payload.is_none());
        let payload = plan.schedule_payload.expect("schedule payload");
        assert_eq!(payload.sessions.create.len(), 1);
        assert!(payload.num_of_sessions.is_none());
    }

    #[test]
    fn test_both_edit() {
        let old = snapshot(500, vec![session(Some(1), "2024-01-10", 3)]);
        let mut new = snapshot(600, vec![]);
        new.sessions.push(session(Some(1), "2024-01-15", 3));
        let plan = ClassUpdateService::plan_update(&new, &old);

        assert_eq!(plan.change_type, ChangeType::Both);
        assert!(plan.metadata_payload.is_some());
        let payload = plan.schedule_payload.expect("schedule payload");
        assert_eq!(payload.sessions.update.len(), 1);
    }

    #[test]
    fn test_plan_scalar_rides_schedule_payload_without_session_ops() {
        let old = snapshot(500, vec![session(Some(1), "2024-01-10", 3)]);
        let mut new = old.clone();
        new.metadata.num_of_sessions = Some(FieldValue::from(12));
        let plan = ClassUpdateService::plan_update(&new, &old);

        // The plan scalar counts as a metadata change, but its wire home is
        // the schedule payload.
        assert_eq!(plan.change_type, ChangeType::MetadataOnly);
        assert!(plan.metadata_payload.is_none());
        let payload = plan.schedule_payload.expect("schedule payload");
        assert!(payload.sessions.is_empty());
        assert_eq!(payload.num_of_sessions, Some(FieldValue::from(12)));
    }

    #[test]
    fn test_plan_serializes_wire_spellings() {
        let old = snapshot(500, vec![]);
        let new = snapshot(600, vec![]);
        let plan = ClassUpdateService::plan_update(&new, &old);

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["change_type"], "METADATA_ONLY");
        assert_eq!(value["metadata_payload"]["fee"], 600);
        assert!(value.get("schedule_payload").is_none());
    }

    #[test]
    fn test_plan_creation() {
        let new = snapshot(
            500,
            vec![
                session(None, "2024-02-01", 2),
                session(None, "2024-02-03", 2),
            ],
        );
        let plan = ClassUpdateService::plan_creation(&new);

        assert_eq!(plan.change_type, ChangeType::Both);
        let metadata = plan.metadata_payload.expect("metadata payload");
        assert_eq!(metadata.get(MetadataField::Fee), Some(&FieldValue::from(500)));
        let schedule = plan.schedule_payload.expect("schedule payload");
        assert_eq!(schedule.sessions.create.len(), 2);
        assert!(schedule.sessions.delete.is_empty());
    }
}
