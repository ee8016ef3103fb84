use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use rusqlite::{Connection, params};

use crate::error::CoreError;

/// Storage slot holding the serialized profile.
pub const PROFILE_KEY: &str = "userProfile";
/// Storage slot holding the serialized ledger.
pub const LEDGER_KEY: &str = "dailyData";

/// Durable string-keyed storage, injected into the engine.
///
/// Slots are overwritten wholesale on every mutation and read back at
/// startup; the engine treats a malformed value as absent.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<bool, CoreError>;
}

/// SQLite-backed store: one `app_state` key/value table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|e| {
            CoreError::Storage(format!("Failed to open database {}: {e}", path.display()))
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), CoreError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS app_state (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let mut stmt = conn.prepare("SELECT value FROM app_state WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let now = Local::now().to_rfc3339();
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "INSERT INTO app_state (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, CoreError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let rows = conn.execute("DELETE FROM app_state WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self
            .slots
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.slots
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, CoreError> {
        Ok(self
            .slots
            .lock()
            .expect("store mutex poisoned")
            .remove(key)
            .is_some())
    }
}
