//! Debounced autosave state shared by every controller.
//!
//! # Invariants
//! - Edits apply to the in-memory record immediately.
//! - Only the latest state is written; intermediate states are coalesced.
//! - A failed write keeps the record dirty and is reported, never raised.

use super::debounce::Debouncer;
use crate::store::{StoreError, StoreResult};
use log::{debug, warn};
use std::time::{Duration, Instant};

/// Result of one poll/flush attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStatus {
    /// Nothing to write.
    Clean,
    /// Edits are waiting for the debounce deadline.
    Waiting,
    /// State was written.
    Saved,
    /// Write was attempted and rejected; state stays in memory.
    Failed,
}

#[derive(Debug)]
pub struct AutosaveSlot<R> {
    kind: &'static str,
    record: R,
    debounce: Debouncer,
    dirty: bool,
    last_error: Option<StoreError>,
}

impl<R> AutosaveSlot<R> {
    pub fn new(kind: &'static str, record: R, window: Duration) -> Self {
        Self {
            kind,
            record,
            debounce: Debouncer::new(window),
            dirty: false,
            last_error: None,
        }
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    /// Unsaved edits exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<StoreError> {
        self.last_error.take()
    }

    /// Swaps in a freshly loaded record, dropping any pending deadline and
    /// the previous record's write error.
    pub fn replace(&mut self, record: R) {
        self.debounce.cancel();
        self.dirty = false;
        self.last_error = None;
        self.record = record;
    }

    /// Applies `mutator` now and restarts the debounce from `now`.
    pub fn edit_at(&mut self, now: Instant, mutator: impl FnOnce(&mut R)) {
        mutator(&mut self.record);
        self.dirty = true;
        self.debounce.restart(now);
    }

    /// Writes the record when its deadline has passed.
    pub fn poll_with(
        &mut self,
        now: Instant,
        save: impl FnOnce(&R) -> StoreResult<()>,
    ) -> FlushStatus {
        if self.debounce.fire_if_due(now) {
            return self.write(save);
        }
        if self.debounce.is_pending() {
            FlushStatus::Waiting
        } else {
            FlushStatus::Clean
        }
    }

    /// Cancels the deadline and writes unsaved edits right away.
    pub fn flush_with(&mut self, save: impl FnOnce(&R) -> StoreResult<()>) -> FlushStatus {
        self.debounce.cancel();
        if !self.dirty {
            return FlushStatus::Clean;
        }
        self.write(save)
    }

    /// Cancels the deadline and writes the current state, dirty or not.
    pub fn force_flush_with(&mut self, save: impl FnOnce(&R) -> StoreResult<()>) -> FlushStatus {
        self.debounce.cancel();
        self.write(save)
    }

    fn write(&mut self, save: impl FnOnce(&R) -> StoreResult<()>) -> FlushStatus {
        match save(&self.record) {
            Ok(()) => {
                self.dirty = false;
                self.last_error = None;
                debug!("event=autosave module=service status=ok kind={}", self.kind);
                FlushStatus::Saved
            }
            Err(err) => {
                warn!(
                    "event=autosave module=service status=error kind={} error={}",
                    self.kind, err
                );
                self.last_error = Some(err);
                FlushStatus::Failed
            }
        }
    }
}
