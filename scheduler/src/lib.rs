//! # Scheduler Library
//!
//! Core logic for reconciling a class's teaching schedule after an edit
//! session. Given the previously committed session collection and the newly
//! edited one, it computes the minimal set of operations (create / update /
//! delete / reschedule) that transforms the old schedule into the new one,
//! detects scalar metadata changes alongside, classifies the overall edit,
//! and shapes the two wire payloads the external update endpoints consume.
//!
//! ## Key Concepts
//! - **Durable key**: the backend-assigned session id, present only for
//!   already-persisted sessions.
//! - **Content key (slot)**: the `(date, timeslot)` pair used to match
//!   sessions when no durable key is available.
//! - **Reschedule**: moves an existing session to a new date/timeslot while
//!   preserving the attendance history tied to its durable key, as opposed
//!   to a destructive delete+create pair.
//!
//! Everything here is a synchronous pure function over in-memory collections:
//! no I/O, no persistence, no shared state. Identical inputs always produce
//! identical outputs, and `reconcile(s, s)` is always empty.

pub mod adapter;
pub mod classifier;
pub mod error;
pub mod metadata;
pub mod payload;
pub mod reconcile;
pub mod types;

pub use adapter::{RawSession, check_unique_slots, normalize_sessions, normalize_sessions_lenient};
pub use classifier::{ChangeType, classify};
pub use error::ScheduleError;
pub use metadata::diff_metadata;
pub use payload::{MetadataPayload, SchedulePayload, build_metadata_payload, build_schedule_payload};
pub use reconcile::reconcile;
pub use types::{
    ClassMetadata, CreateRecord, FieldValue, MetadataDiff, MetadataField, RescheduleRecord,
    ScheduleDiff, Session, SessionOp, SlotKey, UpdateRecord,
};
