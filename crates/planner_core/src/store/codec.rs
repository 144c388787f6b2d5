//! JSON encode/decode at the store boundary.

use crate::model::daily::DailyRecord;
use crate::model::monthly::MonthlyRecord;
use crate::model::weekly::WeeklyRecord;
use crate::model::yearly::YearlyRecord;
use crate::model::RecordValidationError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stored payload is not a valid record.
#[derive(Debug)]
pub enum RecordDecodeError {
    Json(serde_json::Error),
    Validation(RecordValidationError),
}

impl Display for RecordDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed record json: {err}"),
            Self::Validation(err) => write!(f, "invalid record: {err}"),
        }
    }
}

impl Error for RecordDecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for RecordDecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RecordValidationError> for RecordDecodeError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// A record type that can live in the store.
pub trait StoredRecord: Serialize + DeserializeOwned {
    /// Checks invariants serde cannot express.
    fn validate(&self) -> Result<(), RecordValidationError> {
        Ok(())
    }
}

impl StoredRecord for DailyRecord {}
impl StoredRecord for WeeklyRecord {}
impl StoredRecord for YearlyRecord {}

impl StoredRecord for MonthlyRecord {
    fn validate(&self) -> Result<(), RecordValidationError> {
        MonthlyRecord::validate(self)
    }
}

pub fn encode_record<R: StoredRecord>(record: &R) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

pub fn decode_record<R: StoredRecord>(raw: &str) -> Result<R, RecordDecodeError> {
    let record = serde_json::from_str::<R>(raw)?;
    record.validate()?;
    Ok(record)
}
