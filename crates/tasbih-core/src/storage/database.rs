//! SQLite-backed persistence gateway.
//!
//! Provides persistent storage for:
//! - Key-value session state and preferences
//! - An outbox of scheduled notifications for the host platform to deliver

use async_trait::async_trait;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{data_dir, KeyValueStore};
use crate::error::StorageError;

/// A notification waiting in the outbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: i64,
    pub body: String,
    pub fire_at: DateTime<Local>,
    pub enabled: bool,
}

/// SQLite database holding the kv table and the notification outbox.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database at `~/.config/tasbih/tasbih.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::OpenFailed {
            path: ".".into(),
            message: e.to_string(),
        })?;
        Self::open_at(&dir.join("tasbih.db"))
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|e| StorageError::OpenFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate().map_err(|e| StorageError::OpenFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::OpenFailed {
            path: ":memory:".into(),
            message: e.to_string(),
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate().map_err(|e| StorageError::OpenFailed {
            path: ":memory:".into(),
            message: e.to_string(),
        })?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS scheduled_notifications (
                id       INTEGER PRIMARY KEY,
                body     TEXT NOT NULL,
                fire_at  TEXT NOT NULL,
                enabled  INTEGER NOT NULL DEFAULT 1
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(|e| StorageError::read(key, e))?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::read(key, e)),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| StorageError::write(key, e))?;
        Ok(())
    }

    /// Set several values atomically.
    pub fn kv_set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .map_err(|e| StorageError::write("<batch>", e))?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| StorageError::write(key, e))?;
        }
        tx.commit().map_err(|e| StorageError::write("<batch>", e))?;
        Ok(())
    }

    /// Insert or replace a notification in the outbox.
    pub fn upsert_notification(&self, notification: &ScheduledNotification) -> Result<(), StorageError> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO scheduled_notifications (id, body, fire_at, enabled)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    notification.id,
                    notification.body,
                    notification.fire_at.to_rfc3339(),
                    notification.enabled,
                ],
            )
            .map_err(|e| StorageError::write("scheduled_notifications", e))?;
        Ok(())
    }

    /// Remove a notification from the outbox. Missing ids are not an error.
    pub fn delete_notification(&self, id: i64) -> Result<(), StorageError> {
        self.conn()
            .execute(
                "DELETE FROM scheduled_notifications WHERE id = ?1",
                params![id],
            )
            .map_err(|e| StorageError::write("scheduled_notifications", e))?;
        Ok(())
    }

    pub fn notification(&self, id: i64) -> Result<Option<ScheduledNotification>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, body, fire_at, enabled FROM scheduled_notifications WHERE id = ?1")
            .map_err(|e| StorageError::read("scheduled_notifications", e))?;
        let result = stmt.query_row(params![id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
            ))
        });
        let (id, body, fire_at, enabled) = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(StorageError::read("scheduled_notifications", e)),
        };
        let fire_at = DateTime::parse_from_rfc3339(&fire_at)
            .map_err(|e| StorageError::ReadFailed {
                key: "scheduled_notifications".into(),
                message: e.to_string(),
            })?
            .with_timezone(&Local);
        Ok(Some(ScheduledNotification {
            id,
            body,
            fire_at,
            enabled,
        }))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.kv_get(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.kv_set(key, value)
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        self.kv_set_many(entries)
    }
}
