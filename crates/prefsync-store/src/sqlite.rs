use std::{path::Path, sync::Mutex};

use rusqlite::OptionalExtension;

use crate::{RawValue, Store, StoreError};

/// A [`Store`] persisted in a single SQLite table.
///
/// Values are kept as the JSON form of [`RawValue`] so the variant survives a round trip.
pub struct SqliteStore(Mutex<rusqlite::Connection>);

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = rusqlite::Connection::open(path.as_ref())?;

        // Set WAL mode for better concurrency
        db.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;

        log::debug!("Opened sqlite store at {}", path.as_ref().display());
        Self::initialize(db)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::initialize(rusqlite::Connection::open_in_memory()?)
    }

    fn initialize(db: rusqlite::Connection) -> Result<Self, StoreError> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS entries (key TEXT PRIMARY KEY, value TEXT NOT NULL);",
            [],
        )?;
        Ok(SqliteStore(Mutex::new(db)))
    }
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<RawValue>, StoreError> {
        let conn = self.0.lock().expect("Mutex should not be poisoned");
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM entries WHERE key = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: RawValue) -> Result<(), StoreError> {
        let value = serde_json::to_string(&value)?;

        let mut conn = self.0.lock().expect("Mutex should not be poisoned");
        let transaction = conn.transaction()?;
        transaction.execute(
            "INSERT OR REPLACE INTO entries (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        transaction.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.0.lock().expect("Mutex should not be poisoned");
        let transaction = conn.transaction()?;
        transaction.execute("DELETE FROM entries WHERE key = ?1", rusqlite::params![key])?;
        transaction.commit()?;
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let conn = self.0.lock().expect("Mutex should not be poisoned");
        let found = conn
            .query_row(
                "SELECT 1 FROM entries WHERE key = ?1",
                rusqlite::params![key],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
