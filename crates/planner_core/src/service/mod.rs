//! Controllers and the planner session.
//!
//! # Responsibility
//! - Hold the in-memory record each view edits.
//! - Turn edits into debounced writes through the repositories.
//! - Keep UI/FFI layers decoupled from storage keys and encoding.

pub mod autosave;
pub mod daily_controller;
pub mod debounce;
pub mod record_controller;
pub mod session;
