//! Monthly record model.
//!
//! # Invariants
//! - Exactly one monthly record exists; `year`/`month` track the displayed
//!   month and navigation mutates them in place.
//! - `month` is zero-based (`0..=11`).
//! - `dates` is shared by every displayed month.

use super::slots::DayTexts;
use super::RecordValidationError;
use crate::calendar::days_in_month;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub year: i32,
    /// Zero-based month index.
    pub month: u32,
    pub dates: DayTexts,
    pub memo: String,
}

impl MonthlyRecord {
    /// Creates an empty page showing the month that contains `today`.
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month0(),
            dates: DayTexts::new(),
            memo: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.month > 11 {
            return Err(RecordValidationError::MonthOutOfRange(self.month));
        }
        check_year(i64::from(self.year))?;
        Ok(())
    }

    /// Moves the displayed month by `delta`, carrying into the year.
    ///
    /// Leaves the record unchanged when the target year is outside the
    /// calendar range.
    pub fn step_month(&mut self, delta: i32) -> Result<(), RecordValidationError> {
        let absolute = i64::from(self.year) * 12 + i64::from(self.month) + i64::from(delta);
        let year = check_year(absolute.div_euclid(12))?;
        self.year = year;
        self.month = absolute.rem_euclid(12) as u32;
        Ok(())
    }

    pub fn previous_month(&mut self) -> Result<(), RecordValidationError> {
        self.step_month(-1)
    }

    pub fn next_month(&mut self) -> Result<(), RecordValidationError> {
        self.step_month(1)
    }

    /// Number of editable days in the displayed month.
    pub fn visible_days(&self) -> u32 {
        days_in_month(self.year, self.month).unwrap_or(31)
    }

    pub fn day_text(&self, day: u32) -> &str {
        self.dates.get(day)
    }

    /// Sets the text of `day`, which must exist in the displayed month.
    pub fn set_day_text(
        &mut self,
        day: u32,
        text: impl Into<String>,
    ) -> Result<(), RecordValidationError> {
        let max = self.visible_days();
        if day == 0 || day > max {
            return Err(RecordValidationError::IndexOutOfRange {
                field: "dates",
                index: day,
                min: 1,
                max,
            });
        }
        self.dates.set(day, text, "dates")
    }
}

fn check_year(year: i64) -> Result<i32, RecordValidationError> {
    let range = i64::from(NaiveDate::MIN.year())..=i64::from(NaiveDate::MAX.year());
    if range.contains(&year) {
        Ok(year as i32)
    } else {
        Err(RecordValidationError::YearOutOfRange(year))
    }
}

#[cfg(test)]
mod tests {
    use super::MonthlyRecord;
    use crate::model::RecordValidationError;
    use chrono::{Datelike, NaiveDate};

    fn record(year: i32, month: u32) -> MonthlyRecord {
        let mut record = MonthlyRecord::for_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        record.year = year;
        record.month = month;
        record
    }

    #[test]
    fn navigation_wraps_across_years() {
        let mut january = record(2024, 0);
        january.previous_month().unwrap();
        assert_eq!((january.year, january.month), (2023, 11));

        let mut december = record(2024, 11);
        december.next_month().unwrap();
        assert_eq!((december.year, december.month), (2025, 0));

        let mut june = record(2024, 5);
        june.step_month(-18).unwrap();
        assert_eq!((june.year, june.month), (2022, 11));
    }

    #[test]
    fn extreme_steps_are_rejected_without_moving() {
        let mut june = record(2024, 5);
        assert!(matches!(
            june.step_month(i32::MAX),
            Err(RecordValidationError::YearOutOfRange(_))
        ));
        assert!(june.step_month(i32::MIN).is_err());
        assert_eq!((june.year, june.month), (2024, 5));

        let mut last = record(NaiveDate::MAX.year(), 11);
        assert!(last.next_month().is_err());
        assert_eq!((last.year, last.month), (NaiveDate::MAX.year(), 11));
    }

    #[test]
    fn stored_year_outside_calendar_fails_validation() {
        let huge: MonthlyRecord =
            serde_json::from_str(r#"{"year":2000000000,"month":11,"dates":{},"memo":""}"#)
                .unwrap();
        assert!(matches!(
            huge.validate(),
            Err(RecordValidationError::YearOutOfRange(2_000_000_000))
        ));
    }

    #[test]
    fn day_text_is_bounded_by_displayed_month() {
        let mut february = record(2023, 1);
        assert_eq!(february.visible_days(), 28);
        february.set_day_text(28, "rent").unwrap();
        assert!(february.set_day_text(29, "leap?").is_err());

        february.year = 2024;
        february.set_day_text(29, "leap").unwrap();
        assert_eq!(february.day_text(29), "leap");
    }

    #[test]
    fn month_outside_range_fails_validation() {
        let broken: MonthlyRecord =
            serde_json::from_str(r#"{"year":2024,"month":12,"dates":{},"memo":""}"#).unwrap();
        assert!(broken.validate().is_err());
    }

    #[test]
    fn stored_shape_uses_numeric_string_keys() {
        let mut march = record(2024, 2);
        march.set_day_text(15, "review").unwrap();
        let json = serde_json::to_value(&march).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"year": 2024, "month": 2, "dates": {"15": "review"}, "memo": ""})
        );
    }
}
