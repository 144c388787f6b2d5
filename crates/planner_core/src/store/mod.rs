//! Key-value record store.
//!
//! # Responsibility
//! - Persist raw JSON payloads by string key (`get`/`set`/`remove`).
//! - Keep payload encoding at the boundary (`codec`), not in the store.
//!
//! # Invariants
//! - A successful `set` is visible to every later `get` in the same process.
//! - Keys are independent; there is no atomicity across keys.
//! - Stores never inspect payload shape.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
mod memory_store;
mod sqlite_store;

pub use memory_store::MemoryRecordStore;
pub use sqlite_store::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure. Callers treat these as non-fatal.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying database rejected the operation.
    Db(DbError),
    /// The medium has no room for the payload.
    QuotaExceeded {
        key: String,
        needed_bytes: usize,
        quota_bytes: usize,
    },
    /// Record could not be encoded for storage.
    Encode(serde_json::Error),
    /// Store is not usable (e.g. required table missing).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded {
                key,
                needed_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: needs {needed_bytes} bytes, quota is {quota_bytes}"
            ),
            Self::Encode(err) => write!(f, "failed to encode record: {err}"),
            Self::Unavailable(details) => write!(f, "record store unavailable: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Textual key-value persistence used by every planner repository.
pub trait RecordStore {
    /// Returns the raw payload stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Stores `raw` under `key`, replacing any previous payload.
    fn set(&self, key: &str, raw: &str) -> StoreResult<()>;
    /// Deletes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
    /// Lists stored keys starting with `prefix`, ascending.
    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, raw: &str) -> StoreResult<()> {
        (**self).set(key, raw)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).keys_with_prefix(prefix)
    }
}
