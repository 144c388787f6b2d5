//! Daily record model.
//!
//! # Invariants
//! - `schedule` always holds exactly [`SCHEDULE_SLOTS`] entries in memory.
//! - `date` is the record's identity; it selects the storage key.

use super::RecordValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of rows in the daily schedule table.
pub const SCHEDULE_SLOTS: usize = 12;

/// One day's planner page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub today_goal: String,
    pub todos: String,
    /// Stored lists of the wrong length are padded/truncated on decode.
    #[serde(deserialize_with = "deserialize_schedule")]
    pub schedule: [String; SCHEDULE_SLOTS],
    pub checklist: String,
    pub memo: String,
    pub summary: String,
}

impl DailyRecord {
    /// Creates the empty page for `date`.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            today_goal: String::new(),
            todos: String::new(),
            schedule: std::array::from_fn(|_| String::new()),
            checklist: String::new(),
            memo: String::new(),
            summary: String::new(),
        }
    }

    /// Returns whether every text field is unset.
    pub fn is_blank(&self) -> bool {
        self.today_goal.is_empty()
            && self.todos.is_empty()
            && self.schedule.iter().all(String::is_empty)
            && self.checklist.is_empty()
            && self.memo.is_empty()
            && self.summary.is_empty()
    }

    pub fn field(&self, field: DailyField) -> &str {
        match field {
            DailyField::TodayGoal => &self.today_goal,
            DailyField::Todos => &self.todos,
            DailyField::Checklist => &self.checklist,
            DailyField::Memo => &self.memo,
            DailyField::Summary => &self.summary,
        }
    }

    pub fn set_field(&mut self, field: DailyField, text: impl Into<String>) {
        let slot = match field {
            DailyField::TodayGoal => &mut self.today_goal,
            DailyField::Todos => &mut self.todos,
            DailyField::Checklist => &mut self.checklist,
            DailyField::Memo => &mut self.memo,
            DailyField::Summary => &mut self.summary,
        };
        *slot = text.into();
    }

    /// Replaces one schedule row. `index` is zero-based.
    pub fn set_schedule_slot(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), RecordValidationError> {
        let slot = self
            .schedule
            .get_mut(index)
            .ok_or(RecordValidationError::IndexOutOfRange {
                field: "schedule",
                index: index as u32,
                min: 0,
                max: SCHEDULE_SLOTS as u32 - 1,
            })?;
        *slot = text.into();
        Ok(())
    }
}

/// Free-text fields of a daily page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyField {
    TodayGoal,
    Todos,
    Checklist,
    Memo,
    Summary,
}

impl DailyField {
    pub const ALL: [DailyField; 5] = [
        DailyField::TodayGoal,
        DailyField::Todos,
        DailyField::Checklist,
        DailyField::Memo,
        DailyField::Summary,
    ];

    /// JSON field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TodayGoal => "todayGoal",
            Self::Todos => "todos",
            Self::Checklist => "checklist",
            Self::Memo => "memo",
            Self::Summary => "summary",
        }
    }
}

impl Display for DailyField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DailyField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().replace(['_', '-'], "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                format!("unknown daily field `{value}`; expected todayGoal|todos|checklist|memo|summary")
            })
    }
}

fn deserialize_schedule<'de, D>(deserializer: D) -> Result<[String; SCHEDULE_SLOTS], D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Vec::<Option<String>>::deserialize(deserializer)?;
    let mut rows = stored.into_iter();
    Ok(std::array::from_fn(|_| {
        rows.next().flatten().unwrap_or_default()
    }))
}
