//! Metadata diffing.
//!
//! Detects changed scalar class attributes between an old and a new
//! [`ClassMetadata`] record. Comparison is numerically normalized through
//! [`FieldValue::normalized_eq`], so a fee of `"100"` against `100` is not a
//! change. The output carries only changed fields (never unchanged ones),
//! which is what makes PATCH-style payloads possible downstream.

use crate::types::{ClassMetadata, MetadataDiff, MetadataField};

/// Diff two metadata records.
///
/// # Arguments
/// * `new` - The record produced by the editing session.
/// * `old` - The last-fetched record, or `None` for the creation case.
///
/// # Returns
/// A map of changed fields to their new values. When `old` is `None` the diff
/// degenerates to "everything is new": every field present in `new` is
/// returned. Fields unset in `new` are never emitted, even if the old record
/// had a value for them.
pub fn diff_metadata(new: &ClassMetadata, old: Option<&ClassMetadata>) -> MetadataDiff {
    let mut diff = MetadataDiff::new();

    for field in MetadataField::ALL {
        let Some(new_value) = new.field(field) else {
            continue;
        };

        let unchanged = old
            .and_then(|o| o.field(field))
            .is_some_and(|old_value| new_value.normalized_eq(&old_value));

        if !unchanged {
            diff.insert(field, new_value);
        }
    }

    diff
}
