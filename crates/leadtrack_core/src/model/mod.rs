//! Lead domain model.
//!
//! # Responsibility
//! - Define the canonical lead, sales agent and comment records.
//! - Validate caller payloads explicitly before anything reaches storage.
//! - Own the status-transition rule that stamps `closed_at`.
//!
//! # Invariants
//! - Every entity is identified by a UUID v4 assigned at creation.
//! - Timestamps are Unix epoch milliseconds.
//! - References between entities are plain ids; nothing cascades.

pub mod agent;
pub mod comment;
pub mod lead;
pub mod validation;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
