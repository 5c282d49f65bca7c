//! Edit classification.
//!
//! Combines the metadata diff and the schedule diff into a single
//! [`ChangeType`], which callers use to decide which update payloads to send.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{MetadataDiff, ScheduleDiff};

/// The overall shape of one edit session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ChangeType {
    None,
    MetadataOnly,
    ScheduleOnly,
    Both,
}

/// Classify an edit from its two diff results.
pub fn classify(metadata: &MetadataDiff, schedule: &ScheduleDiff) -> ChangeType {
    match (!metadata.is_empty(), !schedule.is_empty()) {
        (true, true) => ChangeType::Both,
        (true, false) => ChangeType::MetadataOnly,
        (false, true) => ChangeType::ScheduleOnly,
        (false, false) => ChangeType::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreateRecord, FieldValue, MetadataField, SessionOp};
    use chrono::NaiveDate;

    fn schedule_with_one_create() -> ScheduleDiff {
        let mut diff = ScheduleDiff::default();
        diff.push(SessionOp::Create(CreateRecord {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            timeslot_id: 2,
            instructor_id: 1,
            class_id: 9,
            title: None,
            description: None,
            zoom_uuid: None,
        }));
        diff
    }

    fn metadata_with_one_change() -> MetadataDiff {
        let mut diff = MetadataDiff::new();
        diff.insert(MetadataField::Fee, FieldValue::from(600));
        diff
    }

    #[test]
    fn test_none() {
        let change = classify(&MetadataDiff::new(), &ScheduleDiff::default());
        assert_eq!(change, ChangeType::None);
    }

    #[test]
    fn test_schedule_only() {
        let change = classify(&MetadataDiff::new(), &schedule_with_one_create());
        assert_eq!(change, ChangeType::ScheduleOnly);
    }

    #[test]
    fn test_metadata_only() {
        let change = classify(&metadata_with_one_change(), &ScheduleDiff::default());
        assert_eq!(change, ChangeType::MetadataOnly);
    }

    #[test]
    fn test_both() {
        let change = classify(&metadata_with_one_change(), &schedule_with_one_create());
        assert_eq!(change, ChangeType::Both);
    }

    #[test]
    fn test_wire_spelling() {
        assert_eq!(ChangeType::ScheduleOnly.to_string(), "SCHEDULE_ONLY");
        assert_eq!(
            serde_json::to_string(&ChangeType::MetadataOnly).unwrap(),
            "\"METADATA_ONLY\""
        );
        assert_eq!("both".parse::<ChangeType>().unwrap(), ChangeType::Both);
    }
}
