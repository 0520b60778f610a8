//! SQLite-backed slot.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::store::slot::SlotStorage;

/// A row in a key/value table, keyed by the storage key.
pub struct SqliteSlot {
    conn: Mutex<Connection>,
    key: String,
}

impl SqliteSlot {
    /// Open (or create) the database at `path`.
    pub fn new<P: AsRef<Path>>(path: P, key: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, key)
    }

    /// An in-memory database (for testing).
    pub fn in_memory(key: &str) -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, key)
    }

    fn with_connection(conn: Connection, key: &str) -> Result<Self, StorageError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: key.to_string(),
        })
    }
}

impl SlotStorage for SqliteSlot {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![self.key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, value: &str) -> Result<(), StorageError> {
        let now = chrono::Utc::now().timestamp_millis();
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![self.key, value, now],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.conn
            .lock()
            .execute("DELETE FROM kv WHERE key = ?1", params![self.key])?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.key)
    }
}
