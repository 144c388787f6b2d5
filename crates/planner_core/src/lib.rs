//! Core domain logic for the planner.
//! This crate owns record shapes, storage keys, autosave and migration rules.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use calendar::{format_date, parse_date, today, weekday_label, CalendarError};
pub use config::{ConfigError, PlannerConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::daily::{DailyField, DailyRecord, SCHEDULE_SLOTS};
pub use model::monthly::MonthlyRecord;
pub use model::slots::{DayTexts, MonthTexts};
pub use model::weekly::{WeekDays, WeeklyField, WeeklyRecord};
pub use model::yearly::YearlyRecord;
pub use model::RecordValidationError;
pub use repo::daily_repo::{
    DailyRecordRepository, LegacyMigration, MigrationOutcome, MigrationReport, MigrationState,
    DAILY_KEY_PREFIX, LEGACY_DAILY_KEY,
};
pub use repo::global_repo::{GlobalRecord, GlobalRecordRepository};
pub use service::autosave::FlushStatus;
pub use service::daily_controller::DailyController;
pub use service::debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use service::record_controller::RecordController;
pub use service::session::{FlushReport, PersistNotice, PlannerSession};
pub use store::codec::RecordDecodeError;
pub use store::{MemoryRecordStore, RecordStore, SqliteRecordStore, StoreError, StoreResult};
pub use view::ViewMode;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
