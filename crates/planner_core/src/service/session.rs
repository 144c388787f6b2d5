//! Process-level planner session.
//!
//! # Responsibility
//! - Own the record store and every view controller for one process.
//! - Run the legacy daily migration once, at open.
//! - Drive all debounce deadlines from a single `tick`.
//!
//! # Invariants
//! - Exactly one controller owns each record while the session lives.
//! - Closing or dropping the session writes every unsaved edit.

use super::autosave::FlushStatus;
use super::daily_controller::DailyController;
use super::record_controller::RecordController;
use crate::calendar::format_date;
use crate::model::daily::{DailyField, DailyRecord};
use crate::model::monthly::MonthlyRecord;
use crate::model::weekly::{WeeklyField, WeeklyRecord};
use crate::model::yearly::YearlyRecord;
use crate::model::RecordValidationError;
use crate::repo::daily_repo::{DailyRecordRepository, LegacyMigration, MigrationOutcome};
use crate::repo::global_repo::GlobalRecordRepository;
use crate::store::{RecordStore, StoreResult};
use crate::view::ViewMode;
use chrono::{NaiveDate, Weekday};
use log::{info, warn};
use std::time::{Duration, Instant};

/// Counts of writes performed by one `tick`/`flush_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub saved: usize,
    pub failed: usize,
}

impl FlushReport {
    fn record(&mut self, status: FlushStatus) {
        match status {
            FlushStatus::Saved => self.saved += 1,
            FlushStatus::Failed => self.failed += 1,
            FlushStatus::Clean | FlushStatus::Waiting => {}
        }
    }
}

/// Non-fatal persistence problem to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistNotice {
    pub view: ViewMode,
    pub message: String,
}

pub struct PlannerSession<S: RecordStore> {
    store: S,
    today: NaiveDate,
    view: ViewMode,
    migration: LegacyMigration,
    migration_outcome: MigrationOutcome,
    daily: DailyController,
    weekly: RecordController<WeeklyRecord>,
    monthly: RecordController<MonthlyRecord>,
    yearly: RecordController<YearlyRecord>,
    closed: bool,
}

impl<S: RecordStore> PlannerSession<S> {
    /// Opens the session: migrates legacy daily data and loads every record.
    pub fn open(store: S, today: NaiveDate, window: Duration) -> Self {
        let mut migration = LegacyMigration::new();
        let (daily, migration_outcome) = DailyController::start(
            &DailyRecordRepository::new(&store),
            &mut migration,
            today,
            window,
        );
        let weekly: RecordController<WeeklyRecord> =
            RecordController::load(&GlobalRecordRepository::new(&store), today, window);
        let monthly: RecordController<MonthlyRecord> =
            RecordController::load(&GlobalRecordRepository::new(&store), today, window);
        let yearly: RecordController<YearlyRecord> =
            RecordController::load(&GlobalRecordRepository::new(&store), today, window);

        info!(
            "event=session_open module=service status=ok today={} migration={:?}",
            format_date(today),
            migration_outcome
        );

        Self {
            store,
            today,
            view: ViewMode::default(),
            migration,
            migration_outcome,
            daily,
            weekly,
            monthly,
            yearly,
            closed: false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn migration_outcome(&self) -> &MigrationOutcome {
        &self.migration_outcome
    }

    /// Re-runs the startup migration guard; a no-op after `open`.
    pub fn rerun_migration(&mut self) -> MigrationOutcome {
        let report = self
            .migration
            .run(&DailyRecordRepository::new(&self.store), self.today);
        report.outcome
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn daily(&self) -> &DailyController {
        &self.daily
    }

    pub fn weekly(&self) -> &RecordController<WeeklyRecord> {
        &self.weekly
    }

    pub fn monthly(&self) -> &RecordController<MonthlyRecord> {
        &self.monthly
    }

    pub fn yearly(&self) -> &RecordController<YearlyRecord> {
        &self.yearly
    }

    /// Dates with a stored daily page.
    pub fn daily_dates(&self) -> StoreResult<Vec<NaiveDate>> {
        DailyRecordRepository::new(&self.store).list_dates()
    }

    pub fn switch_date(&mut self, date: NaiveDate) -> FlushStatus {
        let repo = DailyRecordRepository::new(&self.store);
        self.daily.switch_date(&repo, date)
    }

    /// Like `switch_date`, but a record without unsaved edits is not rewritten.
    pub fn select_date(&mut self, date: NaiveDate) -> FlushStatus {
        let repo = DailyRecordRepository::new(&self.store);
        self.daily.select_date(&repo, date)
    }

    pub fn update_daily_at(&mut self, now: Instant, mutator: impl FnOnce(&mut DailyRecord)) {
        self.daily.update_at(now, mutator);
    }

    pub fn set_daily_field_at(&mut self, now: Instant, field: DailyField, text: impl Into<String>) {
        self.daily.set_field_at(now, field, text);
    }

    pub fn set_schedule_slot_at(
        &mut self,
        now: Instant,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), RecordValidationError> {
        self.daily.set_schedule_slot_at(now, index, text)
    }

    pub fn update_weekly_at(&mut self, now: Instant, mutator: impl FnOnce(&mut WeeklyRecord)) {
        self.weekly.update_at(now, mutator);
    }

    pub fn set_weekly_field_at(
        &mut self,
        now: Instant,
        field: WeeklyField,
        text: impl Into<String>,
    ) {
        let text = text.into();
        self.weekly
            .update_at(now, |record| record.set_field(field, text));
    }

    pub fn set_weekday_at(&mut self, now: Instant, day: Weekday, text: impl Into<String>) {
        let text = text.into();
        self.weekly.update_at(now, |record| record.days.set(day, text));
    }

    pub fn update_monthly_at(&mut self, now: Instant, mutator: impl FnOnce(&mut MonthlyRecord)) {
        self.monthly.update_at(now, mutator);
    }

    /// Sets the text of `day` in the displayed month.
    pub fn set_month_day_at(
        &mut self,
        now: Instant,
        day: u32,
        text: impl Into<String>,
    ) -> Result<(), RecordValidationError> {
        self.monthly
            .try_update_at(now, |record| record.set_day_text(day, text))
    }

    pub fn set_monthly_memo_at(&mut self, now: Instant, text: impl Into<String>) {
        let text = text.into();
        self.monthly.update_at(now, |record| record.memo = text);
    }

    /// Moves the displayed month; the single monthly record is edited in place.
    pub fn step_month_at(
        &mut self,
        now: Instant,
        delta: i32,
    ) -> Result<(), RecordValidationError> {
        self.monthly
            .try_update_at(now, |record| record.step_month(delta))
    }

    pub fn set_year_month_at(
        &mut self,
        now: Instant,
        index: u32,
        text: impl Into<String>,
    ) -> Result<(), RecordValidationError> {
        self.yearly
            .try_update_at(now, |record| record.set_month_text(index, text))
    }

    /// Applies a raw year edit; unparseable input means the current year.
    pub fn set_year_input_at(&mut self, now: Instant, raw: &str) {
        let today = self.today;
        self.yearly
            .update_at(now, |record| record.set_year_input(raw, today));
    }

    /// Writes every record whose debounce deadline has passed at `now`.
    pub fn tick(&mut self, now: Instant) -> FlushReport {
        let mut report = FlushReport::default();
        report.record(self.daily.poll(&DailyRecordRepository::new(&self.store), now));
        report.record(self.weekly.poll(&GlobalRecordRepository::new(&self.store), now));
        report.record(self.monthly.poll(&GlobalRecordRepository::new(&self.store), now));
        report.record(self.yearly.poll(&GlobalRecordRepository::new(&self.store), now));
        report
    }

    /// Earliest pending debounce deadline across all views.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.daily.flush_deadline(),
            self.weekly.flush_deadline(),
            self.monthly.flush_deadline(),
            self.yearly.flush_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Writes every unsaved edit now.
    pub fn flush_all(&mut self) -> FlushReport {
        let mut report = FlushReport::default();
        report.record(self.daily.flush(&DailyRecordRepository::new(&self.store)));
        report.record(self.weekly.flush(&GlobalRecordRepository::new(&self.store)));
        report.record(self.monthly.flush(&GlobalRecordRepository::new(&self.store)));
        report.record(self.yearly.flush(&GlobalRecordRepository::new(&self.store)));
        report
    }

    /// Current persistence problems, one per affected view.
    pub fn persist_notices(&self) -> Vec<PersistNotice> {
        [
            (ViewMode::Daily, self.daily.last_persist_error()),
            (ViewMode::Weekly, self.weekly.last_persist_error()),
            (ViewMode::Monthly, self.monthly.last_persist_error()),
            (ViewMode::Yearly, self.yearly.last_persist_error()),
        ]
        .into_iter()
        .filter_map(|(view, error)| {
            error.map(|error| PersistNotice {
                view,
                message: format!("{} changes are not saved: {error}", view.label()),
            })
        })
        .collect()
    }

    /// Flushes everything and ends the session.
    pub fn close(mut self) -> FlushReport {
        self.shutdown()
    }

    fn shutdown(&mut self) -> FlushReport {
        if self.closed {
            return FlushReport::default();
        }
        self.closed = true;
        let report = self.flush_all();
        if report.failed > 0 {
            warn!(
                "event=session_close module=service status=partial saved={} failed={}",
                report.saved, report.failed
            );
        } else {
            info!(
                "event=session_close module=service status=ok saved={}",
                report.saved
            );
        }
        report
    }
}

impl<S: RecordStore> Drop for PlannerSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
