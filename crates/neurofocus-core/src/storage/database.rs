//! SQLite-backed key-value store.
//!
//! Values are stored as JSON text in a single `kv` table, one row per key.
//! This is the durable [`KeyValueStore`] the host hands to the controller.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use serde_json::Value;

use super::{data_dir, migrations};
use crate::error::StoreError;
use crate::platform::KeyValueStore;

/// SQLite database holding every persisted NeuroFocus value.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `<data_dir>/neurofocus.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::open_at(&dir.join("neurofocus.db"))
    }

    /// Open (or create) a database file at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the raw JSON text stored under `key`.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store raw JSON text under `key`.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn().execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_remove(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn().execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// All stored keys, sorted.
    pub fn kv_keys(&self) -> Result<Vec<String>, rusqlite::Error> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect()
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.kv_get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StoreError::Codec {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.kv_set(key, &value.to_string())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.kv_remove(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "\"hello\"").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "\"hello\"");
    }

    #[test]
    fn json_values_roundtrip_through_trait() {
        let db = Database::open_memory().unwrap();
        let value = serde_json::json!({"kind": "WORK", "remainingSeconds": 42});
        db.set("snap", value.clone()).unwrap();
        assert_eq!(db.get("snap").unwrap(), Some(value));
        db.remove("snap").unwrap();
        assert_eq!(db.get("snap").unwrap(), None);
    }

    #[test]
    fn corrupt_value_is_a_codec_error() {
        let db = Database::open_memory().unwrap();
        db.kv_set("bad", "{not json").unwrap();
        assert!(matches!(db.get("bad"), Err(StoreError::Codec { .. })));
    }

    #[test]
    fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("userSetWorkDuration", Value::from(1800)).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("userSetWorkDuration").unwrap(), Some(Value::from(1800)));
        assert_eq!(db.kv_keys().unwrap(), vec!["userSetWorkDuration".to_string()]);
    }
}
