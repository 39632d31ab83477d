//! Core error types for tasbih-core.
//!
//! This module defines the error hierarchy using thiserror. Validation and
//! persistence-rollback errors are returned to callers; feedback backend
//! errors never leave the feedback coordinator.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tasbih-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence gateway errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Reminder scheduling errors
    #[error("Reminder error: {0}")]
    Reminder(#[from] ReminderError),

    /// The count write behind a reset failed; the previous count was restored.
    #[error("Reset could not be saved (count restored to {restored_count}): {source}")]
    ResetFailed {
        restored_count: u32,
        #[source]
        source: StorageError,
    },

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the caller should offer a retry for this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::ResetFailed { .. } | CoreError::Storage(_) | CoreError::Reminder(_)
        )
    }
}

/// Persistence gateway errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Read failed
    #[error("Read of '{key}' failed: {message}")]
    ReadFailed { key: String, message: String },

    /// Write failed
    #[error("Write of '{key}' failed: {message}")]
    WriteFailed { key: String, message: String },

    /// Store is locked by another writer
    #[error("Store is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors, raised at the input boundary before any state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Target outside 1..=max
    #[error("Target {value} is out of range (must be between 1 and {max})")]
    TargetOutOfRange { value: i64, max: u32 },

    /// Input could not be parsed as an integer
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// Phrase id not in the catalog
    #[error("Unknown phrase: {0}")]
    UnknownPhrase(String),

    /// Catalog has no phrases
    #[error("Phrase catalog must not be empty")]
    EmptyCatalog,

    /// Catalog contains the same id twice
    #[error("Duplicate phrase id in catalog: {0}")]
    DuplicatePhrase(String),

    /// Reminder enabled without a time of day
    #[error("A reminder time is required to enable the reminder")]
    MissingReminderTime,

    /// Hour or minute out of range
    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    /// Transition delay above the allowed maximum
    #[error("Transition delay {value_ms}ms exceeds {max_ms}ms")]
    DelayOutOfRange { value_ms: u64, max_ms: u64 },
}

/// Reminder scheduler errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    /// The platform refused or failed to schedule the notification
    #[error("Failed to schedule reminder: {0}")]
    ScheduleFailed(String),

    /// Cancelling a scheduled notification failed
    #[error("Failed to cancel reminder: {0}")]
    CancelFailed(String),
}

/// Feedback backend errors. Logged and swallowed by the coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    /// Haptic engine unavailable or failed
    #[error("Vibration failed: {0}")]
    Vibration(String),

    /// Audio asset missing or playback failed
    #[error("Playback of '{cue}' failed: {message}")]
    Playback { cue: String, message: String },
}

impl StorageError {
    /// Map a SQLite failure on `key` into a read error, keeping lock contention distinct.
    pub fn read(key: &str, err: rusqlite::Error) -> Self {
        if is_locked(&err) {
            return StorageError::Locked;
        }
        StorageError::ReadFailed {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    /// Map a SQLite failure on `key` into a write error, keeping lock contention distinct.
    pub fn write(key: &str, err: rusqlite::Error) -> Self {
        if is_locked(&err) {
            return StorageError::Locked;
        }
        StorageError::WriteFailed {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

fn is_locked(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::DatabaseLocked
                || e.code == rusqlite::ErrorCode::DatabaseBusy
    )
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_failure_is_retryable() {
        let err = CoreError::ResetFailed {
            restored_count: 7,
            source: StorageError::Locked,
        };
        assert!(err.is_retryable());
        assert!(err.to_string().contains("restored to 7"));
    }

    #[test]
    fn validation_is_not_retryable() {
        let err = CoreError::from(ValidationError::TargetOutOfRange {
            value: 0,
            max: 99_999,
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_json_converts_and_is_not_retryable() {
        fn parse(raw: &str) -> Result<Vec<u32>, CoreError> {
            Ok(serde_json::from_str(raw)?)
        }
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
        assert!(!err.is_retryable());
    }
}
