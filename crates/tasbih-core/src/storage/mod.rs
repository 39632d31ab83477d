//! Persistence gateway.
//!
//! The session engine only depends on the async [`KeyValueStore`] contract.
//! Values are strings; structured values are stored as JSON.

mod config;
pub mod database;
pub mod keys;
pub mod memory;

pub use config::{Config, FeedbackConfig, ReminderSettings, SessionConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ConfigError, StorageError};

/// Durable key/value store the engine reads and writes through.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Write several keys as one logical batch.
    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }
}

/// Read `key` and parse it. Unparsable values read as absent.
pub async fn get_parsed<T: FromStr>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let raw = store.get(key).await?;
    Ok(raw.and_then(|v| match v.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %v, "ignoring unparsable stored value");
            None
        }
    }))
}

/// Returns `~/.config/tasbih[-dev]/` based on TASBIH_ENV.
///
/// Set TASBIH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TASBIH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tasbih-dev")
    } else {
        base_dir.join("tasbih")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
