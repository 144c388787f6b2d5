//! Weekly record model.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The single global weekly page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecord {
    pub week_goal: String,
    pub days: WeekDays,
    pub todo_list: String,
    pub memo: String,
}

impl WeeklyRecord {
    pub fn field(&self, field: WeeklyField) -> &str {
        match field {
            WeeklyField::WeekGoal => &self.week_goal,
            WeeklyField::TodoList => &self.todo_list,
            WeeklyField::Memo => &self.memo,
        }
    }

    pub fn set_field(&mut self, field: WeeklyField, text: impl Into<String>) {
        let slot = match field {
            WeeklyField::WeekGoal => &mut self.week_goal,
            WeeklyField::TodoList => &mut self.todo_list,
            WeeklyField::Memo => &mut self.memo,
        };
        *slot = text.into();
    }
}

/// Per-weekday text, always all seven keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekDays {
    pub mon: String,
    pub tue: String,
    pub wed: String,
    pub thu: String,
    pub fri: String,
    pub sat: String,
    pub sun: String,
}

impl WeekDays {
    /// Display order of the weekly page, Monday first.
    pub const ORDER: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn get(&self, day: Weekday) -> &str {
        match day {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    pub fn set(&mut self, day: Weekday, text: impl Into<String>) {
        let slot = match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *slot = text.into();
    }
}

/// Free-text fields of the weekly page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyField {
    WeekGoal,
    TodoList,
    Memo,
}

impl WeeklyField {
    pub const ALL: [WeeklyField; 3] = [Self::WeekGoal, Self::TodoList, Self::Memo];

    /// JSON field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeekGoal => "weekGoal",
            Self::TodoList => "todoList",
            Self::Memo => "memo",
        }
    }
}

impl Display for WeeklyField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeeklyField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().replace(['_', '-'], "").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown weekly field `{value}`; expected weekGoal|todoList|memo"))
    }
}
