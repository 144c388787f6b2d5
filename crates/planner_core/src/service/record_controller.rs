//! Autosave controller for the single-slot weekly/monthly/yearly records.

use super::autosave::{AutosaveSlot, FlushStatus};
use crate::repo::global_repo::{GlobalRecord, GlobalRecordRepository};
use crate::store::{RecordStore, StoreError};
use chrono::NaiveDate;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RecordController<R: GlobalRecord> {
    slot: AutosaveSlot<R>,
}

impl<R: GlobalRecord> RecordController<R> {
    pub fn new(record: R, window: Duration) -> Self {
        Self {
            slot: AutosaveSlot::new(R::KIND, record, window),
        }
    }

    /// Loads the stored record (or the initial one) and takes ownership of it.
    pub fn load<S: RecordStore + ?Sized>(
        repo: &GlobalRecordRepository<'_, S, R>,
        today: NaiveDate,
        window: Duration,
    ) -> Self {
        Self::new(repo.load_or_init(today), window)
    }

    pub fn record(&self) -> &R {
        self.slot.record()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.slot.is_dirty()
    }

    pub fn flush_deadline(&self) -> Option<Instant> {
        self.slot.deadline()
    }

    pub fn last_persist_error(&self) -> Option<&StoreError> {
        self.slot.last_error()
    }

    pub fn take_persist_error(&mut self) -> Option<StoreError> {
        self.slot.take_error()
    }

    /// Applies `mutator` in memory and restarts the debounce from `now`.
    pub fn update_at(&mut self, now: Instant, mutator: impl FnOnce(&mut R)) {
        self.slot.edit_at(now, mutator);
    }

    pub fn update(&mut self, mutator: impl FnOnce(&mut R)) {
        self.update_at(Instant::now(), mutator);
    }

    /// Like `update_at`, for edits that validate their input first.
    ///
    /// Nothing changes and no write is scheduled when `mutator` fails.
    pub fn try_update_at<E>(
        &mut self,
        now: Instant,
        mutator: impl FnOnce(&mut R) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut candidate = self.record().clone();
        mutator(&mut candidate)?;
        self.slot.edit_at(now, |record| *record = candidate);
        Ok(())
    }

    pub fn poll<S: RecordStore + ?Sized>(
        &mut self,
        repo: &GlobalRecordRepository<'_, S, R>,
        now: Instant,
    ) -> FlushStatus {
        self.slot.poll_with(now, |record| repo.save(record))
    }

    pub fn flush<S: RecordStore + ?Sized>(
        &mut self,
        repo: &GlobalRecordRepository<'_, S, R>,
    ) -> FlushStatus {
        self.slot.flush_with(|record| repo.save(record))
    }

    pub fn close<S: RecordStore + ?Sized>(
        mut self,
        repo: &GlobalRecordRepository<'_, S, R>,
    ) -> FlushStatus {
        self.flush(repo)
    }
}
