//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, page-level planner functions to Dart via FRB.
//! - Own the single process-wide planner session.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - At most one session is open; opening again closes (and flushes) the
//!   previous one first.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.

use chrono::{NaiveDate, Weekday};
use planner_core::calendar::{label_of, month_grid};
use planner_core::{
    core_version as core_version_inner, format_date, init_logging as init_logging_inner,
    parse_date, ping as ping_inner, today, weekday_label, DailyField, FlushReport,
    MigrationOutcome, PlannerConfig, PlannerSession, SqliteRecordStore, WeekDays, WeeklyField,
    DEFAULT_DEBOUNCE,
};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

static SESSION: Mutex<Option<OpenSession>> = Mutex::new(None);

struct OpenSession {
    session: PlannerSession<SqliteRecordStore>,
    db_path: String,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerActionResponse {
    /// Whether the edit or command was applied.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Unsaved-change warnings, one per affected view.
    pub notices: Vec<String>,
}

impl PlannerActionResponse {
    fn success(message: impl Into<String>, notices: Vec<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            notices,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            notices: Vec::new(),
        }
    }
}

/// Write counts for tick/flush/close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushResponse {
    pub ok: bool,
    pub saved: u32,
    pub failed: u32,
    /// Milliseconds until the next pending autosave, if any.
    pub next_flush_in_ms: Option<u64>,
    pub message: String,
}

impl FlushResponse {
    fn from_report(report: FlushReport, next_deadline: Option<Instant>) -> Self {
        let now = Instant::now();
        Self {
            ok: report.failed == 0,
            saved: report.saved as u32,
            failed: report.failed as u32,
            next_flush_in_ms: next_deadline
                .map(|deadline| deadline.saturating_duration_since(now).as_millis() as u64),
            message: format!("saved {} record(s), {} failed", report.saved, report.failed),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            saved: 0,
            failed: 0,
            next_flush_in_ms: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPage {
    pub date: String,
    /// `MON`..`SUN`.
    pub weekday: String,
    pub today_goal: String,
    pub todos: String,
    /// Always twelve rows.
    pub schedule: Vec<String>,
    pub checklist: String,
    pub memo: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyPageResponse {
    pub ok: bool,
    pub page: Option<DailyPage>,
    pub message: String,
    pub notices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayEntry {
    /// `MON`..`SUN`.
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyPage {
    pub week_goal: String,
    /// Monday first.
    pub days: Vec<WeekdayEntry>,
    pub todo_list: String,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCell {
    /// `None` for padding cells.
    pub day: Option<u32>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyPage {
    pub year: i32,
    /// One-based month for display.
    pub month: u32,
    /// Sunday-first grid of 35 or 42 cells.
    pub cells: Vec<MonthCell>,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlyPage {
    pub year: i32,
    /// January first, always twelve entries.
    pub months: Vec<String>,
}

/// Opens the planner session on the configured database.
///
/// `today` overrides the local date (`YYYY-MM-DD`); empty means local today.
///
/// # FFI contract
/// - Sync call, DB-backed execution; runs the legacy daily migration.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_open(today_override: Option<String>) -> PlannerActionResponse {
    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(err) => return PlannerActionResponse::failure(format!("planner_open failed: {err}")),
    };
    let db_path = config.db_path.to_string_lossy().into_owned();
    open_session(&db_path, today_override, config.debounce)
}

/// Opens the planner session on an explicit database file.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_open_at(db_path: String, today_override: Option<String>) -> PlannerActionResponse {
    let debounce = PlannerConfig::from_env()
        .map(|config| config.debounce)
        .unwrap_or(DEFAULT_DEBOUNCE);
    open_session(db_path.trim(), today_override, debounce)
}

/// Writes every pending edit and closes the session.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_close() -> FlushResponse {
    let mut guard = lock_session();
    match guard.take() {
        Some(open) => FlushResponse::from_report(open.session.close(), None),
        None => FlushResponse::failure("planner_close failed: session is not open"),
    }
}

/// Writes every record whose autosave deadline has passed.
///
/// Dart calls this from a periodic timer; `next_flush_in_ms` tells it when
/// the next call is useful.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_tick() -> FlushResponse {
    with_session(|session| {
        let report = session.tick(Instant::now());
        FlushResponse::from_report(report, session.next_deadline())
    })
    .unwrap_or_else(|err| FlushResponse::failure(format!("planner_tick failed: {err}")))
}

/// Writes every pending edit now.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_flush() -> FlushResponse {
    with_session(|session| FlushResponse::from_report(session.flush_all(), None))
        .unwrap_or_else(|err| FlushResponse::failure(format!("planner_flush failed: {err}")))
}

/// Returns the active daily page.
#[flutter_rust_bridge::frb(sync)]
pub fn daily_get() -> DailyPageResponse {
    daily_response("daily_get", |_| Ok(String::new()))
}

/// Saves the current page and activates `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn daily_switch(date: String) -> DailyPageResponse {
    daily_response("daily_switch", |session| {
        let date = parse_date(&date).map_err(|err| err.to_string())?;
        let status = session.switch_date(date);
        let active = session.daily().active_date();
        if active != date {
            return Err(format!(
                "unsaved edits for {} could not be written; staying on it",
                format_date(active)
            ));
        }
        Ok(format!("Switched to {} ({status:?}).", format_date(date)))
    })
}

/// Stored daily page dates, oldest first.
#[flutter_rust_bridge::frb(sync)]
pub fn daily_dates() -> Vec<String> {
    with_session(|session| session.daily_dates().map_err(|err| err.to_string()))
        .and_then(|result| result)
        .map(|dates| dates.into_iter().map(format_date).collect())
        .unwrap_or_else(|err| {
            log::warn!("event=ffi_call module=ffi status=error call=daily_dates error={err}");
            Vec::new()
        })
}

/// Replaces one daily text field (`todayGoal|todos|checklist|memo|summary`).
#[flutter_rust_bridge::frb(sync)]
pub fn daily_set_field(field: String, text: String) -> PlannerActionResponse {
    edit("daily_set_field", |session| {
        let field = field.parse::<DailyField>()?;
        session.set_daily_field_at(Instant::now(), field, text);
        Ok(())
    })
}

/// Replaces zero-based schedule row `index`.
#[flutter_rust_bridge::frb(sync)]
pub fn daily_set_schedule(index: u32, text: String) -> PlannerActionResponse {
    edit("daily_set_schedule", |session| {
        session
            .set_schedule_slot_at(Instant::now(), index as usize, text)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn weekly_get() -> Option<WeeklyPage> {
    with_session(|session| {
        let record = session.weekly().record();
        WeeklyPage {
            week_goal: record.week_goal.clone(),
            days: WeekDays::ORDER
                .into_iter()
                .map(|day| WeekdayEntry {
                    label: label_of(day).to_string(),
                    text: record.days.get(day).to_string(),
                })
                .collect(),
            todo_list: record.todo_list.clone(),
            memo: record.memo.clone(),
        }
    })
    .ok()
}

/// Replaces one weekly text field (`weekGoal|todoList|memo`).
#[flutter_rust_bridge::frb(sync)]
pub fn weekly_set_field(field: String, text: String) -> PlannerActionResponse {
    edit("weekly_set_field", |session| {
        let field = field.parse::<WeeklyField>()?;
        session.set_weekly_field_at(Instant::now(), field, text);
        Ok(())
    })
}

/// Replaces the text of one weekday (`mon`..`sun`).
#[flutter_rust_bridge::frb(sync)]
pub fn weekly_set_day(day: String, text: String) -> PlannerActionResponse {
    edit("weekly_set_day", |session| {
        let day = parse_weekday(&day)?;
        session.set_weekday_at(Instant::now(), day, text);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn monthly_get() -> Option<MonthlyPage> {
    with_session(|session| {
        let record = session.monthly().record();
        let cells = month_grid(record.year, record.month)
            .unwrap_or_default()
            .into_iter()
            .map(|day| MonthCell {
                day,
                text: day.map(|day| record.day_text(day)).unwrap_or("").to_string(),
            })
            .collect();
        MonthlyPage {
            year: record.year,
            month: record.month + 1,
            cells,
            memo: record.memo.clone(),
        }
    })
    .ok()
}

/// Replaces the text of `day` (1-based) in the displayed month.
#[flutter_rust_bridge::frb(sync)]
pub fn monthly_set_day(day: u32, text: String) -> PlannerActionResponse {
    edit("monthly_set_day", |session| {
        session
            .set_month_day_at(Instant::now(), day, text)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn monthly_set_memo(text: String) -> PlannerActionResponse {
    edit("monthly_set_memo", |session| {
        session.set_monthly_memo_at(Instant::now(), text);
        Ok(())
    })
}

/// Moves the displayed month by `delta` (negative goes back).
#[flutter_rust_bridge::frb(sync)]
pub fn monthly_step(delta: i32) -> PlannerActionResponse {
    edit("monthly_step", |session| {
        session
            .step_month_at(Instant::now(), delta)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn yearly_get() -> Option<YearlyPage> {
    with_session(|session| {
        let record = session.yearly().record();
        YearlyPage {
            year: record.year,
            months: (0..12)
                .map(|index| record.month_text(index).to_string())
                .collect(),
        }
    })
    .ok()
}

/// Replaces the text of zero-based month `index`.
#[flutter_rust_bridge::frb(sync)]
pub fn yearly_set_month(index: u32, text: String) -> PlannerActionResponse {
    edit("yearly_set_month", |session| {
        session
            .set_year_month_at(Instant::now(), index, text)
            .map_err(|err| err.to_string())
    })
}

/// Applies raw year input; unparseable input selects the current year.
#[flutter_rust_bridge::frb(sync)]
pub fn yearly_set_year(raw: String) -> PlannerActionResponse {
    edit("yearly_set_year", |session| {
        session.set_year_input_at(Instant::now(), &raw);
        Ok(())
    })
}

fn open_session(
    db_path: &str,
    today_override: Option<String>,
    debounce: Duration,
) -> PlannerActionResponse {
    if db_path.is_empty() {
        return PlannerActionResponse::failure("planner_open failed: db path is empty");
    }
    let today = match resolve_today(today_override) {
        Ok(today) => today,
        Err(err) => return PlannerActionResponse::failure(format!("planner_open failed: {err}")),
    };
    let store = match SqliteRecordStore::open(Path::new(db_path)) {
        Ok(store) => store,
        Err(err) => return PlannerActionResponse::failure(format!("planner_open failed: {err}")),
    };

    let mut guard = lock_session();
    if let Some(previous) = guard.take() {
        log::info!(
            "event=ffi_session_replace module=ffi status=ok previous_db={}",
            previous.db_path
        );
        previous.session.close();
    }
    let session = PlannerSession::open(store, today, debounce);
    let message = migration_message(session.migration_outcome());
    *guard = Some(OpenSession {
        session,
        db_path: db_path.to_string(),
    });
    PlannerActionResponse::success(message, Vec::new())
}

fn resolve_today(today_override: Option<String>) -> Result<NaiveDate, String> {
    match today_override.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_date(raw).map_err(|err| err.to_string()),
        _ => Ok(today()),
    }
}

fn migration_message(outcome: &MigrationOutcome) -> String {
    match outcome {
        MigrationOutcome::NoLegacy | MigrationOutcome::AlreadyDone => "Planner opened.".to_string(),
        MigrationOutcome::MigratedToday => {
            "Planner opened; legacy daily page moved to today.".to_string()
        }
        MigrationOutcome::MigratedOtherDate(date) => format!(
            "Planner opened; legacy daily page moved to {}.",
            format_date(*date)
        ),
        MigrationOutcome::DiscardedUndecodable => {
            "Planner opened; unreadable legacy daily page was discarded.".to_string()
        }
        MigrationOutcome::WriteFailed => {
            "Planner opened; legacy daily page could not be moved and was kept.".to_string()
        }
    }
}

fn parse_weekday(raw: &str) -> Result<Weekday, String> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("unknown weekday `{}`", raw.trim()))
}

fn lock_session() -> std::sync::MutexGuard<'static, Option<OpenSession>> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_session<T>(
    f: impl FnOnce(&mut PlannerSession<SqliteRecordStore>) -> T,
) -> Result<T, String> {
    let mut guard = lock_session();
    match guard.as_mut() {
        Some(open) => Ok(f(&mut open.session)),
        None => Err("session is not open".to_string()),
    }
}

fn notices(session: &PlannerSession<SqliteRecordStore>) -> Vec<String> {
    session
        .persist_notices()
        .into_iter()
        .map(|notice| notice.message)
        .collect()
}

fn edit(
    call: &str,
    f: impl FnOnce(&mut PlannerSession<SqliteRecordStore>) -> Result<(), String>,
) -> PlannerActionResponse {
    let result = with_session(|session| f(session).map(|()| notices(session)));
    match result {
        Ok(Ok(notices)) => PlannerActionResponse::success("Saved in memory.", notices),
        Ok(Err(err)) | Err(err) => {
            log::warn!("event=ffi_call module=ffi status=rejected call={call} error={err}");
            PlannerActionResponse::failure(format!("{call} failed: {err}"))
        }
    }
}

fn daily_response(
    call: &str,
    f: impl FnOnce(&mut PlannerSession<SqliteRecordStore>) -> Result<String, String>,
) -> DailyPageResponse {
    let result = with_session(|session| {
        let message = f(session)?;
        let record = session.daily().active_record();
        let page = DailyPage {
            date: format_date(record.date),
            weekday: weekday_label(record.date).to_string(),
            today_goal: record.today_goal.clone(),
            todos: record.todos.clone(),
            schedule: record.schedule.to_vec(),
            checklist: record.checklist.clone(),
            memo: record.memo.clone(),
            summary: record.summary.clone(),
        };
        Ok((page, message, notices(session)))
    });
    match result {
        Ok(Ok((page, message, notices))) => DailyPageResponse {
            ok: true,
            page: Some(page),
            message,
            notices,
        },
        Ok(Err(err)) | Err(err) => DailyPageResponse {
            ok: false,
            page: None,
            message: format!("{call} failed: {err}"),
            notices: Vec::new(),
        },
    }
}
