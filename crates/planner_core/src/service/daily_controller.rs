//! Active-date controller for the daily view.
//!
//! # Responsibility
//! - Own the active date and its record while the daily view is mounted.
//! - Debounce edits into single writes; flush before switching dates.
//!
//! # Invariants
//! - The active record's `date` always equals the active date; edits cannot
//!   change it, only `switch_date` can.
//! - `switch_date` writes the outgoing record synchronously before loading
//!   the incoming one; unsaved edits are never dropped by a failed switch.

use super::autosave::{AutosaveSlot, FlushStatus};
use crate::calendar::format_date;
use crate::model::daily::{DailyField, DailyRecord};
use crate::model::RecordValidationError;
use crate::repo::daily_repo::{DailyRecordRepository, LegacyMigration, MigrationOutcome};
use crate::store::{RecordStore, StoreError};
use chrono::NaiveDate;
use log::{info, warn};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct DailyController {
    slot: AutosaveSlot<DailyRecord>,
}

impl DailyController {
    /// Starts with an already loaded record.
    pub fn new(record: DailyRecord, window: Duration) -> Self {
        Self {
            slot: AutosaveSlot::new("daily", record, window),
        }
    }

    /// Runs the startup migration (once per `migration`) and activates today.
    pub fn start<S: RecordStore + ?Sized>(
        repo: &DailyRecordRepository<'_, S>,
        migration: &mut LegacyMigration,
        today: NaiveDate,
        window: Duration,
    ) -> (Self, MigrationOutcome) {
        let report = migration.run(repo, today);
        (Self::new(report.record, window), report.outcome)
    }

    pub fn active_date(&self) -> NaiveDate {
        self.slot.record().date
    }

    pub fn active_record(&self) -> &DailyRecord {
        self.slot.record()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.slot.is_dirty()
    }

    pub fn flush_deadline(&self) -> Option<Instant> {
        self.slot.deadline()
    }

    /// Last write failure, kept until the next successful write.
    pub fn last_persist_error(&self) -> Option<&StoreError> {
        self.slot.last_error()
    }

    pub fn take_persist_error(&mut self) -> Option<StoreError> {
        self.slot.take_error()
    }

    /// Applies `mutator` to the active record and restarts the debounce.
    pub fn update_at(&mut self, now: Instant, mutator: impl FnOnce(&mut DailyRecord)) {
        let date = self.active_date();
        self.slot.edit_at(now, |record| {
            mutator(record);
            record.date = date;
        });
    }

    pub fn update(&mut self, mutator: impl FnOnce(&mut DailyRecord)) {
        self.update_at(Instant::now(), mutator);
    }

    pub fn set_field_at(&mut self, now: Instant, field: DailyField, text: impl Into<String>) {
        let text = text.into();
        self.update_at(now, |record| record.set_field(field, text));
    }

    /// Replaces zero-based schedule row `index`.
    pub fn set_schedule_slot_at(
        &mut self,
        now: Instant,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), RecordValidationError> {
        let mut candidate = self.active_record().clone();
        candidate.set_schedule_slot(index, text)?;
        self.update_at(now, |record| *record = candidate);
        Ok(())
    }

    /// Writes pending edits once the debounce deadline has passed.
    pub fn poll<S: RecordStore + ?Sized>(
        &mut self,
        repo: &DailyRecordRepository<'_, S>,
        now: Instant,
    ) -> FlushStatus {
        self.slot.poll_with(now, |record| repo.save(record))
    }

    /// Writes pending edits now.
    pub fn flush<S: RecordStore + ?Sized>(
        &mut self,
        repo: &DailyRecordRepository<'_, S>,
    ) -> FlushStatus {
        self.slot.flush_with(|record| repo.save(record))
    }

    /// Persists the outgoing record, then activates `new_date`.
    ///
    /// The outgoing write bypasses the debounce. When it fails and the
    /// outgoing record has unsaved edits, the switch is refused: the record
    /// stays active and dirty, and the error is kept in `last_persist_error`.
    pub fn switch_date<S: RecordStore + ?Sized>(
        &mut self,
        repo: &DailyRecordRepository<'_, S>,
        new_date: NaiveDate,
    ) -> FlushStatus {
        let outgoing = self.active_date();
        let status = self.slot.force_flush_with(|record| repo.save(record));
        if status == FlushStatus::Failed && self.slot.is_dirty() {
            warn!(
                "event=daily_switch module=service status=refused from={} to={} reason=flush_failed",
                format_date(outgoing),
                format_date(new_date)
            );
            return status;
        }
        self.activate(repo, outgoing, new_date, status);
        status
    }

    /// Activates `new_date`, writing the outgoing record only when it has
    /// unsaved edits.
    ///
    /// A clean record already matches storage (or was never stored), so
    /// skipping its write loses nothing and leaves no empty page behind.
    pub fn select_date<S: RecordStore + ?Sized>(
        &mut self,
        repo: &DailyRecordRepository<'_, S>,
        new_date: NaiveDate,
    ) -> FlushStatus {
        if self.slot.is_dirty() {
            return self.switch_date(repo, new_date);
        }
        let outgoing = self.active_date();
        self.activate(repo, outgoing, new_date, FlushStatus::Clean);
        FlushStatus::Clean
    }

    fn activate<S: RecordStore + ?Sized>(
        &mut self,
        repo: &DailyRecordRepository<'_, S>,
        outgoing: NaiveDate,
        new_date: NaiveDate,
        flush: FlushStatus,
    ) {
        let incoming = repo.load(new_date);
        self.slot.replace(incoming);
        info!(
            "event=daily_switch module=service status=ok from={} to={} flush={:?}",
            format_date(outgoing),
            format_date(new_date),
            flush
        );
    }

    /// Tears the controller down, writing any unsaved edits.
    pub fn close<S: RecordStore + ?Sized>(
        mut self,
        repo: &DailyRecordRepository<'_, S>,
    ) -> FlushStatus {
        self.flush(repo)
    }
}

#[cfg(test)]
mod tests {
    use super::DailyController;
    use crate::model::daily::DailyRecord;
    use crate::service::debounce::DEFAULT_DEBOUNCE;
    use chrono::NaiveDate;
    use std::time::Instant;

    #[test]
    fn update_cannot_move_record_to_another_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut controller = DailyController::new(DailyRecord::empty(date), DEFAULT_DEBOUNCE);
        controller.update_at(Instant::now(), |record| {
            record.date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
            record.memo = "kept".to_string();
        });
        assert_eq!(controller.active_date(), date);
        assert_eq!(controller.active_record().memo, "kept");
        assert!(controller.has_unsaved_changes());
    }

    #[test]
    fn schedule_slot_out_of_range_leaves_record_clean() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut controller = DailyController::new(DailyRecord::empty(date), DEFAULT_DEBOUNCE);
        assert!(controller
            .set_schedule_slot_at(Instant::now(), 12, "late")
            .is_err());
        assert!(!controller.has_unsaved_changes());
    }
}
