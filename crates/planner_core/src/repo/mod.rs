//! Repository layer over the record store.
//!
//! # Responsibility
//! - Own storage keys and the JSON boundary for each record type.
//! - Turn read/decode failures into default records plus a log event.
//!
//! # Invariants
//! - Storage keys are stable across versions.
//! - Repositories borrow the store; they hold no record state.

pub mod daily_repo;
pub mod global_repo;
