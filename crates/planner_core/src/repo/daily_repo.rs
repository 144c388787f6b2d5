//! Date-keyed daily record repository and legacy migration.
//!
//! # Responsibility
//! - Map each calendar date to its own storage key.
//! - Load with empty-record fallback; save under the record's own date.
//! - Move the legacy single-slot daily record into the per-date scheme.
//!
//! # Invariants
//! - `key_for(d1) != key_for(d2)` whenever `d1 != d2`.
//! - Reads never fail: absent or undecodable payloads yield `empty_record`.
//! - Migration runs at most once per process (`LegacyMigration`), and the
//!   legacy key is gone afterwards unless the per-date write failed.

use crate::calendar::{format_date, parse_date};
use crate::model::daily::DailyRecord;
use crate::store::codec::{decode_record, encode_record};
use crate::store::{RecordStore, StoreError, StoreResult};
use chrono::NaiveDate;
use log::{error, info, warn};

/// Fixed key used before daily records were partitioned by date.
pub const LEGACY_DAILY_KEY: &str = "planner_daily";
/// Prefix of every per-date daily key.
pub const DAILY_KEY_PREFIX: &str = "planner_daily_";

/// What the startup migration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No legacy payload was stored.
    NoLegacy,
    /// Legacy record belonged to today and became the active record.
    MigratedToday,
    /// Legacy record was moved under its own, earlier or later, date.
    MigratedOtherDate(NaiveDate),
    /// Legacy payload could not be decoded and was deleted.
    DiscardedUndecodable,
    /// Legacy record decoded but could not be written; it stays in place.
    WriteFailed,
    /// Migration already ran in this process.
    AlreadyDone,
}

/// Migration result: the record to activate for today plus what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub outcome: MigrationOutcome,
    pub record: DailyRecord,
}

/// Per-process migration state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MigrationState {
    #[default]
    Pending,
    Done,
}

/// Guards [`DailyRecordRepository::migrate_legacy_if_present`] so it runs once.
#[derive(Debug, Default)]
pub struct LegacyMigration {
    state: MigrationState,
}

impl LegacyMigration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Runs the migration on the first call; later calls only load `today`.
    ///
    /// Transitions to `Done` whatever the outcome.
    pub fn run<S: RecordStore + ?Sized>(
        &mut self,
        repo: &DailyRecordRepository<'_, S>,
        today: NaiveDate,
    ) -> MigrationReport {
        match self.state {
            MigrationState::Done => MigrationReport {
                outcome: MigrationOutcome::AlreadyDone,
                record: repo.load(today),
            },
            MigrationState::Pending => {
                self.state = MigrationState::Done;
                repo.migrate_legacy_if_present(today)
            }
        }
    }
}

/// Daily record persistence over a [`RecordStore`].
pub struct DailyRecordRepository<'s, S: RecordStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: RecordStore + ?Sized> DailyRecordRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Storage key for `date`: prefix plus `YYYY-MM-DD`.
    pub fn key_for(date: NaiveDate) -> String {
        format!("{DAILY_KEY_PREFIX}{}", format_date(date))
    }

    pub fn empty_record(date: NaiveDate) -> DailyRecord {
        DailyRecord::empty(date)
    }

    /// Loads `date`'s record, falling back to the empty record.
    ///
    /// Read and decode failures are logged, never returned.
    pub fn load(&self, date: NaiveDate) -> DailyRecord {
        let key = Self::key_for(date);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::empty_record(date),
            Err(err) => {
                warn!(
                    "event=daily_load module=repo status=fallback reason=read_failed date={} error={}",
                    format_date(date),
                    err
                );
                return Self::empty_record(date);
            }
        };

        match decode_record::<DailyRecord>(&raw) {
            Ok(mut record) => {
                if record.date != date {
                    warn!(
                        "event=daily_load module=repo status=repaired reason=date_mismatch date={} stored_date={}",
                        format_date(date),
                        format_date(record.date)
                    );
                    record.date = date;
                }
                record
            }
            Err(err) => {
                warn!(
                    "event=daily_load module=repo status=fallback reason=decode_failed date={} error={}",
                    format_date(date),
                    err
                );
                Self::empty_record(date)
            }
        }
    }

    /// Writes `record` under its own date's key.
    pub fn save(&self, record: &DailyRecord) -> StoreResult<()> {
        let raw = encode_record(record).map_err(StoreError::Encode)?;
        self.store.set(&Self::key_for(record.date), &raw)
    }

    /// Dates that have a stored daily record, ascending.
    pub fn list_dates(&self) -> StoreResult<Vec<NaiveDate>> {
        let keys = self.store.keys_with_prefix(DAILY_KEY_PREFIX)?;
        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(DAILY_KEY_PREFIX))
            .filter_map(|suffix| parse_date(suffix).ok())
            .collect())
    }

    /// Moves the legacy single-slot record under its per-date key.
    ///
    /// Returns the record to activate for `today`. Prefer
    /// [`LegacyMigration::run`], which enforces the once-per-process rule.
    ///
    /// # Policy
    /// - Legacy data overwrites an existing per-date record for its date.
    /// - Undecodable legacy payloads are deleted, never retried.
    /// - A failed per-date write keeps the legacy key so no data is lost.
    pub fn migrate_legacy_if_present(&self, today: NaiveDate) -> MigrationReport {
        let raw = match self.store.get(LEGACY_DAILY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return MigrationReport {
                    outcome: MigrationOutcome::NoLegacy,
                    record: self.load(today),
                };
            }
            Err(err) => {
                warn!(
                    "event=legacy_migration module=repo status=skipped reason=read_failed error={}",
                    err
                );
                return MigrationReport {
                    outcome: MigrationOutcome::NoLegacy,
                    record: self.load(today),
                };
            }
        };

        let legacy = match decode_record::<DailyRecord>(&raw) {
            Ok(legacy) => legacy,
            Err(err) => {
                warn!(
                    "event=legacy_migration module=repo status=discarded reason=decode_failed error={}",
                    err
                );
                self.remove_legacy_key();
                return MigrationReport {
                    outcome: MigrationOutcome::DiscardedUndecodable,
                    record: self.load(today),
                };
            }
        };

        if let Err(err) = self.save(&legacy) {
            error!(
                "event=legacy_migration module=repo status=error reason=write_failed date={} error={}",
                format_date(legacy.date),
                err
            );
            let record = if legacy.date == today {
                legacy
            } else {
                self.load(today)
            };
            return MigrationReport {
                outcome: MigrationOutcome::WriteFailed,
                record,
            };
        }
        self.remove_legacy_key();

        info!(
            "event=legacy_migration module=repo status=ok date={} today={}",
            format_date(legacy.date),
            format_date(today)
        );

        if legacy.date == today {
            MigrationReport {
                outcome: MigrationOutcome::MigratedToday,
                record: legacy,
            }
        } else {
            MigrationReport {
                outcome: MigrationOutcome::MigratedOtherDate(legacy.date),
                record: self.load(today),
            }
        }
    }

    fn remove_legacy_key(&self) {
        if let Err(err) = self.store.remove(LEGACY_DAILY_KEY) {
            error!(
                "event=legacy_migration module=repo status=error reason=remove_failed error={}",
                err
            );
        }
    }
}
