//! Planner record model.
//!
//! # Responsibility
//! - Define the four persisted record shapes (daily, weekly, monthly, yearly).
//! - Keep the JSON field names stable; they are the durable storage format.
//!
//! # Invariants
//! - The empty string is the "unset" value for every text field.
//! - Fixed key universes (12 schedule slots, 7 weekdays, 31 days, 12 months)
//!   are fixed-size arrays, never open-ended maps.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod daily;
pub mod monthly;
pub mod slots;
pub mod weekly;
pub mod yearly;

/// Validation error raised for records that decode but break an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// `month` must be a zero-based month index.
    MonthOutOfRange(u32),
    /// The year cannot be shown on a calendar.
    YearOutOfRange(i64),
    /// A slot/day/month index is outside the record's fixed range.
    IndexOutOfRange {
        field: &'static str,
        index: u32,
        min: u32,
        max: u32,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MonthOutOfRange(value) => {
                write!(f, "month must be within 0..=11, got {value}")
            }
            Self::YearOutOfRange(value) => {
                write!(f, "year {value} is outside the supported calendar range")
            }
            Self::IndexOutOfRange {
                field,
                index,
                min,
                max,
            } => write!(f, "{field} index {index} is outside {min}..={max}"),
        }
    }
}

impl Error for RecordValidationError {}
