//! Yearly record model.

use super::slots::MonthTexts;
use super::RecordValidationError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub year: i32,
    pub months: MonthTexts,
}

impl YearlyRecord {
    pub fn for_date(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            months: MonthTexts::new(),
        }
    }

    /// Text for zero-based month `index`.
    pub fn month_text(&self, index: u32) -> &str {
        self.months.get(index)
    }

    pub fn set_month_text(
        &mut self,
        index: u32,
        text: impl Into<String>,
    ) -> Result<(), RecordValidationError> {
        self.months.set(index, text, "months")
    }

    /// Applies a raw year edit; input with no leading integer, or zero, falls
    /// back to `today`'s year.
    pub fn set_year_input(&mut self, raw: &str, today: NaiveDate) {
        self.year = leading_year(raw)
            .filter(|year| *year != 0)
            .unwrap_or_else(|| today.year());
    }
}

/// Integer prefix of `raw` after leading whitespace, so "2031abc" reads as
/// 2031 and "12.5" as 12. `None` when no digit leads or the value overflows.
fn leading_year(raw: &str) -> Option<i32> {
    let text = raw.trim_start();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let digits = unsigned
        .find(|ch: char| !ch.is_ascii_digit())
        .map_or(unsigned, |end| &unsigned[..end]);
    if digits.is_empty() {
        return None;
    }
    let sign_len = text.len() - unsigned.len();
    text[..sign_len + digits.len()].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::YearlyRecord;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn year_input_falls_back_to_current_year() {
        let mut record = YearlyRecord::for_date(today());
        record.set_year_input("2031", today());
        assert_eq!(record.year, 2031);
        record.set_year_input("twenty", today());
        assert_eq!(record.year, 2024);
        record.set_year_input("", today());
        assert_eq!(record.year, 2024);
    }

    #[test]
    fn year_input_reads_the_leading_integer() {
        let mut record = YearlyRecord::for_date(today());
        record.set_year_input(" 2031abc", today());
        assert_eq!(record.year, 2031);
        record.set_year_input("12.5", today());
        assert_eq!(record.year, 12);
        record.set_year_input("-44 BC", today());
        assert_eq!(record.year, -44);
        record.set_year_input("abc2031", today());
        assert_eq!(record.year, 2024);
        record.set_year_input("0x10", today());
        assert_eq!(record.year, 2024);
        record.set_year_input("99999999999", today());
        assert_eq!(record.year, 2024);
    }

    #[test]
    fn month_texts_use_zero_based_keys() {
        let mut record = YearlyRecord::for_date(today());
        record.set_month_text(0, "plan").unwrap();
        record.set_month_text(11, "review").unwrap();
        assert!(record.set_month_text(12, "x").is_err());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"year": 2024, "months": {"0": "plan", "11": "review"}})
        );
    }
}
