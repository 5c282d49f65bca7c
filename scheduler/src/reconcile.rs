//! Schedule reconciliation.
//!
//! Diffs two session collections into the minimal set of update / create /
//! delete / reschedule operations that transforms the old schedule into the
//! new one. Matching is entirely key-based: a session is identified by its
//! durable backend id when it has one, and by its `(date, timeslot)` slot
//! otherwise, so the result never depends on the ordering of either input.
//!
//! A reschedule is not a delete+create pair: it moves an existing session
//! while preserving the attendance history tied to its durable id, so the
//! superseded id must never also land in the delete bucket.
//!
//! Duplicate slots within one input violate the schedule's uniqueness
//! invariant; the ordered indexes keep the last-seen entry for a slot.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{
    CreateRecord, RescheduleRecord, ScheduleDiff, Session, SessionOp, SlotKey, UpdateRecord,
};

/// Reconcile an edited session collection against the last committed one.
///
/// # Arguments
/// * `new_sessions` - The collection produced by the editing session.
/// * `old_sessions` - The last-fetched committed collection.
///
/// # Returns
/// A [`ScheduleDiff`] with one operation per affected session. Unchanged
/// sessions produce nothing, so `reconcile(s, s)` is all-empty, and applying
/// the diff to `old_sessions` and re-running yields all-empty again.
///
/// Each new session is classified with this precedence:
/// 1. reschedule, when it is flagged as the replacement for an old session;
/// 2. update, when its durable id resolves to an old session and the date or
///    timeslot moved (same date and timeslot is a true no-op);
/// 3. create, when it has no durable id and no old session occupies its slot;
/// 4. otherwise no-op: the session already exists as-is.
///
/// Old sessions are deleted only when their durable id was not retained by an
/// update or reschedule above and no new session occupies their slot. This
/// function never fails: entries it cannot classify confidently degrade to
/// no-ops instead of blocking the rest of the diff.
pub fn reconcile(new_sessions: &[Session], old_sessions: &[Session]) -> ScheduleDiff {
    if old_sessions.is_empty() {
        return index_by_slot(new_sessions)
            .into_values()
            .map(|s| SessionOp::Create(CreateRecord::from_session(s)))
            .collect();
    }

    if new_sessions.is_empty() {
        let ids: BTreeSet<i64> = old_sessions.iter().filter_map(|s| s.id).collect();
        return ids.into_iter().map(SessionOp::Delete).collect();
    }

    let old_by_id: BTreeMap<i64, &Session> = old_sessions
        .iter()
        .filter_map(|s| s.id.map(|id| (id, s)))
        .collect();
    let old_by_slot = index_by_slot(old_sessions);
    let new_by_slot = index_by_slot(new_sessions);

    let mut diff = ScheduleDiff::default();
    // Old durable ids that keep their row: updated in place, unchanged, or
    // superseded by a reschedule. Everything else with an id is a delete
    // candidate.
    let mut retained: BTreeSet<i64> = BTreeSet::new();

    for session in new_by_slot.values() {
        if session.is_rescheduled {
            if let Some(original_id) = session.original_session_id {
                retained.insert(original_id);
                diff.push(SessionOp::Reschedule(RescheduleRecord::from_session(
                    session,
                    original_id,
                )));
                continue;
            }
        }

        match session.id {
            Some(id) => {
                if let Some(old) = old_by_id.get(&id) {
                    retained.insert(id);
                    if old.date != session.date || old.timeslot_id != session.timeslot_id {
                        diff.push(SessionOp::Update(UpdateRecord::from_session(session, id)));
                    }
                }
                // A durable id that resolves to nothing is stale; leave it alone.
            }
            None => {
                if !old_by_slot.contains_key(&session.slot()) {
                    diff.push(SessionOp::Create(CreateRecord::from_session(session)));
                }
                // An id-less session whose slot is already taken exists already.
            }
        }
    }

    for (id, old) in &old_by_id {
        if !retained.contains(id) && !new_by_slot.contains_key(&old.slot()) {
            diff.push(SessionOp::Delete(*id));
        }
    }

    if !diff.is_empty() {
        log::debug!(
            "reconciled schedule: {} update, {} create, {} delete, {} reschedule",
            diff.update.len(),
            diff.create.len(),
            diff.delete.len(),
            diff.reschedule.len()
        );
    }

    diff
}

/// Index sessions by slot. Later entries shadow earlier ones on a duplicate slot.
fn index_by_slot(sessions: &[Session]) -> BTreeMap<SlotKey, &Session> {
    sessions.iter().map(|s| (s.slot(), s)).collect()
}
