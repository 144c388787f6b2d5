//! Command-line front end for the planner.
//!
//! # Responsibility
//! - Open one planner session per invocation, apply a single command, then
//!   close the session so every edit is written before exit.
//! - Keep output plain text and deterministic for scripting.

use clap::{Args, Parser, Subcommand};
use planner_core::calendar::{label_of, month_grid};
use planner_core::{
    core_version, format_date, init_from_config, parse_date, ping, today, weekday_label,
    DailyField, PlannerConfig, PlannerSession, RecordStore, SqliteRecordStore, WeekDays,
    WeeklyField, SCHEDULE_SLOTS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "planner")]
#[command(about = "Daily, weekly, monthly and yearly planner", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database path (defaults to a file in the temp directory)
    #[arg(long, global = true, env = "PLANNER_DB_PATH")]
    db: Option<PathBuf>,

    /// Date treated as today, `YYYY-MM-DD` (defaults to the local date)
    #[arg(long, global = true)]
    today: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print core linkage info
    Ping,
    /// Daily page for one date
    Daily {
        #[command(subcommand)]
        action: DailyAction,
    },
    /// The single weekly page
    Weekly {
        #[command(subcommand)]
        action: WeeklyAction,
    },
    /// The single monthly page
    Monthly {
        #[command(subcommand)]
        action: MonthlyAction,
    },
    /// The single yearly page
    Yearly {
        #[command(subcommand)]
        action: YearlyAction,
    },
}

#[derive(Args, Debug)]
struct DateArg {
    /// Page date, `YYYY-MM-DD` (defaults to today)
    #[arg(short, long)]
    date: Option<String>,
}

#[derive(Subcommand, Debug)]
enum DailyAction {
    Show {
        #[command(flatten)]
        date: DateArg,
    },
    /// Replace a text field: todayGoal, todos, checklist, memo or summary
    Set {
        field: String,
        text: String,
        #[command(flatten)]
        date: DateArg,
    },
    /// Replace one schedule row (1-based)
    Schedule {
        row: usize,
        text: String,
        #[command(flatten)]
        date: DateArg,
    },
    /// List dates with a stored page
    Dates,
}

#[derive(Subcommand, Debug)]
enum WeeklyAction {
    Show,
    /// Replace a text field: weekGoal, todoList or memo
    Set { field: String, text: String },
    /// Replace one weekday's text (mon..sun)
    Day { day: String, text: String },
}

#[derive(Subcommand, Debug)]
enum MonthlyAction {
    Show,
    /// Replace the text of a day in the displayed month
    Day { day: u32, text: String },
    Memo { text: String },
    /// Show the next month
    Next,
    /// Show the previous month
    Prev,
}

#[derive(Subcommand, Debug)]
enum YearlyAction {
    Show,
    /// Replace one month's text (1-based)
    Month { month: u32, text: String },
    /// Set the displayed year; invalid input means the current year
    Year { year: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut out = String::new();
    match run(cli, config, &mut out) {
        Ok(()) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            print!("{out}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: PlannerConfig, out: &mut String) -> Result<(), String> {
    if let Command::Ping = cli.command {
        out.push_str(&format!("planner_core ping={}\n", ping()));
        out.push_str(&format!("planner_core version={}\n", core_version()));
        return Ok(());
    }

    let today = match cli.today.as_deref() {
        Some(raw) => parse_date(raw).map_err(|err| err.to_string())?,
        None => today(),
    };
    let db_path = cli.db.unwrap_or(config.db_path);
    let store = SqliteRecordStore::open(&db_path)
        .map_err(|err| format!("cannot open {}: {err}", db_path.display()))?;
    let mut session = PlannerSession::open(store, today, config.debounce);
    log::debug!(
        "event=cli_command module=cli status=start command={:?}",
        cli.command
    );

    let result = match cli.command {
        Command::Ping => Ok(()),
        Command::Daily { action } => daily(&mut session, action, out),
        Command::Weekly { action } => weekly(&mut session, action, out),
        Command::Monthly { action } => monthly(&mut session, action, out),
        Command::Yearly { action } => yearly(&mut session, action, out),
    };

    session.flush_all();
    for notice in session.persist_notices() {
        eprintln!("warning: {}", notice.message);
    }
    let report = session.close();
    if result.is_ok() && report.failed > 0 {
        return Err(format!("{} record(s) could not be saved", report.failed));
    }
    result
}

fn resolve_date<S: RecordStore>(
    session: &mut PlannerSession<S>,
    date: &DateArg,
) -> Result<(), String> {
    if let Some(raw) = date.date.as_deref() {
        let date = parse_date(raw).map_err(|err| err.to_string())?;
        if date != session.daily().active_date() {
            session.select_date(date);
            if session.daily().active_date() != date {
                return Err(format!(
                    "unsaved edits for {} could not be written; staying on it",
                    format_date(session.daily().active_date())
                ));
            }
        }
    }
    Ok(())
}

fn daily<S: RecordStore>(
    session: &mut PlannerSession<S>,
    action: DailyAction,
    out: &mut String,
) -> Result<(), String> {
    match action {
        DailyAction::Show { date } => {
            resolve_date(session, &date)?;
        }
        DailyAction::Set { field, text, date } => {
            let field = field.parse::<DailyField>()?;
            resolve_date(session, &date)?;
            session.set_daily_field_at(Instant::now(), field, text);
        }
        DailyAction::Schedule { row, text, date } => {
            if row == 0 {
                return Err(format!("schedule row must be 1..={SCHEDULE_SLOTS}"));
            }
            resolve_date(session, &date)?;
            session
                .set_schedule_slot_at(Instant::now(), row - 1, text)
                .map_err(|err| err.to_string())?;
        }
        DailyAction::Dates => {
            let dates = session.daily_dates().map_err(|err| err.to_string())?;
            for date in dates {
                out.push_str(&format!("{}\n", format_date(date)));
            }
            return Ok(());
        }
    }
    render_daily(session, out);
    Ok(())
}

fn render_daily<S: RecordStore>(session: &PlannerSession<S>, out: &mut String) {
    let record = session.daily().active_record();
    out.push_str(&format!(
        "{} {}\n",
        format_date(record.date),
        weekday_label(record.date)
    ));
    for field in [DailyField::TodayGoal, DailyField::Todos] {
        out.push_str(&format!("{field}: {}\n", record.field(field)));
    }
    out.push_str("schedule:\n");
    for (row, text) in record.schedule.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {text}\n", row + 1));
    }
    for field in [DailyField::Checklist, DailyField::Memo, DailyField::Summary] {
        out.push_str(&format!("{field}: {}\n", record.field(field)));
    }
}

fn weekly<S: RecordStore>(
    session: &mut PlannerSession<S>,
    action: WeeklyAction,
    out: &mut String,
) -> Result<(), String> {
    match action {
        WeeklyAction::Show => {}
        WeeklyAction::Set { field, text } => {
            let field = field.parse::<WeeklyField>()?;
            session.set_weekly_field_at(Instant::now(), field, text);
        }
        WeeklyAction::Day { day, text } => {
            let day = day
                .trim()
                .parse::<chrono::Weekday>()
                .map_err(|_| format!("unknown weekday `{}`", day.trim()))?;
            session.set_weekday_at(Instant::now(), day, text);
        }
    }

    let record = session.weekly().record();
    out.push_str(&format!("{}: {}\n", WeeklyField::WeekGoal, record.week_goal));
    for day in WeekDays::ORDER {
        out.push_str(&format!("{}: {}\n", label_of(day), record.days.get(day)));
    }
    out.push_str(&format!("{}: {}\n", WeeklyField::TodoList, record.todo_list));
    out.push_str(&format!("{}: {}\n", WeeklyField::Memo, record.memo));
    Ok(())
}

fn monthly<S: RecordStore>(
    session: &mut PlannerSession<S>,
    action: MonthlyAction,
    out: &mut String,
) -> Result<(), String> {
    let now = Instant::now();
    match action {
        MonthlyAction::Show => {}
        MonthlyAction::Day { day, text } => session
            .set_month_day_at(now, day, text)
            .map_err(|err| err.to_string())?,
        MonthlyAction::Memo { text } => session.set_monthly_memo_at(now, text),
        MonthlyAction::Next => session
            .step_month_at(now, 1)
            .map_err(|err| err.to_string())?,
        MonthlyAction::Prev => session
            .step_month_at(now, -1)
            .map_err(|err| err.to_string())?,
    }

    let record = session.monthly().record();
    out.push_str(&format!("{}-{:02}\n", record.year, record.month + 1));
    out.push_str(" SUN MON TUE WED THU FRI SAT\n");
    let cells = month_grid(record.year, record.month).unwrap_or_default();
    for week in cells.chunks(7) {
        for cell in week {
            match cell {
                Some(day) if !record.day_text(*day).is_empty() => {
                    out.push_str(&format!(" {day:>2}*"))
                }
                Some(day) => out.push_str(&format!(" {day:>2} ")),
                None => out.push_str("    "),
            }
        }
        out.push('\n');
    }
    for day in 1..=record.visible_days() {
        let text = record.day_text(day);
        if !text.is_empty() {
            out.push_str(&format!("{day:>2}: {text}\n"));
        }
    }
    out.push_str(&format!("memo: {}\n", record.memo));
    Ok(())
}

fn yearly<S: RecordStore>(
    session: &mut PlannerSession<S>,
    action: YearlyAction,
    out: &mut String,
) -> Result<(), String> {
    let now = Instant::now();
    match action {
        YearlyAction::Show => {}
        YearlyAction::Month { month, text } => {
            if month == 0 {
                return Err("month must be 1..=12".to_string());
            }
            session
                .set_year_month_at(now, month - 1, text)
                .map_err(|err| err.to_string())?;
        }
        YearlyAction::Year { year } => session.set_year_input_at(now, &year),
    }

    let record = session.yearly().record();
    out.push_str(&format!("{}\n", record.year));
    for index in 0..12 {
        out.push_str(&format!("{:>2}: {}\n", index + 1, record.month_text(index)));
    }
    Ok(())
}
