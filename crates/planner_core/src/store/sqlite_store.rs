//! SQLite-backed record store.
//!
//! # Invariants
//! - Each `set` is a single-row upsert; `updated_at` is refreshed on write.
//! - The connection is migrated before the store is handed out.

use super::{RecordStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection};
use std::path::Path;

/// Durable store over the `records` table.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_records_table(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for SqliteRecordStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM records WHERE key = ?1;")?;
        let mut rows = stmt.query([key])?;
        let value = match rows.next()? {
            Some(row) => Some(row.get(0)?),
            None => None,
        };
        Ok(value)
    }

    fn set(&self, key: &str, raw: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO records (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, raw],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM records WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT key FROM records
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC;",
        )?;
        let mut rows = stmt.query([prefix])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get(0)?);
        }
        Ok(keys)
    }
}

fn ensure_records_table(conn: &Connection) -> StoreResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'records'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(StoreError::Unavailable(
            "missing required table `records`".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteRecordStore;
    use crate::store::{RecordStore, StoreError};
    use rusqlite::Connection;

    #[test]
    fn upsert_replaces_value() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.set("planner_weekly", "{}").unwrap();
        store.set("planner_weekly", "{\"memo\":\"x\"}").unwrap();
        assert_eq!(
            store.get("planner_weekly").unwrap().as_deref(),
            Some("{\"memo\":\"x\"}")
        );
        let rows: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM records;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn prefix_listing_does_not_treat_underscore_as_wildcard() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store.set("planner_daily_2024-01-02", "{}").unwrap();
        store.set("planner_daily_2024-01-01", "{}").unwrap();
        store.set("plannerXdailyX2024", "{}").unwrap();
        store.set("planner_daily", "{}").unwrap();
        assert_eq!(
            store.keys_with_prefix("planner_daily_").unwrap(),
            vec!["planner_daily_2024-01-01", "planner_daily_2024-01-02"]
        );
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteRecordStore::try_new(conn).err().unwrap();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
