//! Calendar helpers consumed by the planner views.
//!
//! # Responsibility
//! - Provide "today" and `YYYY-MM-DD` parsing/formatting for date-keyed records.
//! - Compute weekday labels and month grid geometry for presentation.
//!
//! Months are zero-based throughout, matching the stored monthly record.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage/display format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const WEEKDAY_LABELS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    InvalidDate(String),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for CalendarError {}

/// Current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` string.
pub fn parse_date(value: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| CalendarError::InvalidDate(value.to_string()))
}

/// Three-letter uppercase weekday label (`MON`..`SUN`).
pub fn weekday_label(date: NaiveDate) -> &'static str {
    label_of(date.weekday())
}

/// Weekday label for a raw date string; unparseable input highlights `MON`.
pub fn weekday_label_for(value: &str) -> &'static str {
    parse_date(value).map_or(WEEKDAY_LABELS[0], weekday_label)
}

pub fn label_of(day: Weekday) -> &'static str {
    WEEKDAY_LABELS[day.num_days_from_monday() as usize]
}

/// Days in zero-based `month` of `year`; `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month + 1, 1)?;
    let next = if month == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 2, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Blank cells before day 1 in a Sunday-first grid.
pub fn leading_blanks(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month + 1, 1).map(|first| first.weekday().num_days_from_sunday())
}

/// Sunday-first month grid: `None` for blank cells, `Some(day)` otherwise.
///
/// Padded with trailing blanks to 35 cells while fewer than 35 are used,
/// otherwise to 42; a month filling exactly 35 cells still gets a sixth row.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<u32>>> {
    let blanks = leading_blanks(year, month)?;
    let days = days_in_month(year, month)?;

    let mut cells = Vec::with_capacity(42);
    cells.extend((0..blanks).map(|_| None));
    cells.extend((1..=days).map(Some));
    let target = if cells.len() < 35 { 35 } else { 42 };
    cells.resize(target.max(cells.len()), None);
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::{
        days_in_month, format_date, leading_blanks, month_grid, parse_date, weekday_label,
        weekday_label_for,
    };

    #[test]
    fn parse_and_format_round_trip() {
        let date = parse_date(" 2024-03-15 ").expect("valid date");
        assert_eq!(format_date(date), "2024-03-15");
        assert!(parse_date("2024-3-5x").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn weekday_labels_follow_iso_week() {
        assert_eq!(weekday_label(parse_date("2024-03-15").unwrap()), "FRI");
        assert_eq!(weekday_label_for("2024-03-17"), "SUN");
        assert_eq!(weekday_label_for("garbage"), "MON");
    }

    #[test]
    fn month_lengths_respect_leap_years() {
        assert_eq!(days_in_month(2024, 1), Some(29));
        assert_eq!(days_in_month(2023, 1), Some(28));
        assert_eq!(days_in_month(2024, 11), Some(31));
        assert_eq!(days_in_month(2024, 12), None);
    }

    #[test]
    fn grid_pads_to_five_or_six_weeks() {
        // March 2024 starts on a Friday: 5 blanks + 31 days spills into a sixth row.
        assert_eq!(leading_blanks(2024, 2), Some(5));
        let march = month_grid(2024, 2).unwrap();
        assert_eq!(march.len(), 42);
        assert_eq!(march[5], Some(1));

        // February 2026 starts on a Sunday and fits four rows, padded to five.
        let february = month_grid(2026, 1).unwrap();
        assert_eq!(february.len(), 35);
        assert_eq!(february[0], Some(1));
        assert_eq!(february[27], Some(28));
        assert_eq!(february[28], None);

        // January 2026: 4 blanks + 31 days fills exactly five rows.
        assert_eq!(month_grid(2026, 0).unwrap().len(), 42);
    }
}
