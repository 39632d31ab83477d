//! # Tasbih Core Library
//!
//! This library provides the core logic for Tasbih, a dhikr counting
//! session. The `tasbih` CLI is a thin layer over it; any other front end
//! drives the same [`SessionEngine`].
//!
//! ## Architecture
//!
//! - **Session Engine**: owns the live count, auto-advances through the
//!   phrase cycle when a target is reached, and guards overlapping async
//!   operations with in-flight flags
//! - **Catalog / Targets**: the ordered phrase list and per-phrase target
//!   overrides
//! - **Feedback**: haptic pulses and audio cues with a completion watchdog
//! - **Storage**: async key/value persistence (SQLite or in-memory) and
//!   TOML-based configuration
//! - **Reminder**: daily reminder contract implemented by the host
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: Core counting state machine
//! - [`FeedbackCoordinator`]: Haptics and audio on behalf of the engine
//! - [`KeyValueStore`]: Persistence contract, with [`SqliteStore`] and [`MemoryStore`]
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod error;
pub mod events;
pub mod feedback;
pub mod reminder;
pub mod session;
pub mod storage;
pub mod targets;

pub use catalog::{PhraseCatalog, PhraseDefinition};
pub use error::{
    ConfigError, CoreError, FeedbackError, ReminderError, StorageError, ValidationError,
};
pub use events::Event;
pub use feedback::{FeedbackBackend, FeedbackCoordinator, HapticIntensity, Playback, PlaybackHandle};
pub use reminder::{ReminderConfig, ReminderScheduler, TimeOfDay, REMINDER_NOTIFICATION_ID};
pub use session::{SessionEngine, SessionSettings, SessionState, MAX_TRANSITION_DELAY_MS};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use targets::{TargetRegistry, MAX_TARGET};
