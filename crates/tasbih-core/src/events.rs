use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in a counting session produces an Event.
/// The presentation layer renders them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Counted {
        phrase_id: String,
        count: u32,
        target: u32,
        at: DateTime<Utc>,
    },
    /// Target reached and the session moved on to the next phrase in the cycle.
    PhraseAdvanced {
        from_phrase: String,
        to_phrase: String,
        target: u32,
        at: DateTime<Utc>,
    },
    PhraseSelected {
        from_phrase: String,
        to_phrase: String,
        target: u32,
        at: DateTime<Utc>,
    },
    CountReset {
        phrase_id: String,
        previous_count: u32,
        at: DateTime<Utc>,
    },
    TargetChanged {
        phrase_id: String,
        target: u32,
        count: u32,
        custom: bool,
        at: DateTime<Utc>,
    },
    PreferencesChanged {
        vibration_enabled: bool,
        sound_enabled: bool,
        transition_delay_ms: u64,
        at: DateTime<Utc>,
    },
    /// Suspend-time batch write landed.
    PreferencesFlushed {
        at: DateTime<Utc>,
    },
    ReminderScheduled {
        hour: u32,
        minute: u32,
        fire_at: DateTime<Local>,
        at: DateTime<Utc>,
    },
    ReminderDisabled {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phrase_id: String,
        display_text: String,
        native_script_text: String,
        count: u32,
        target: u32,
        custom_target: bool,
        vibration_enabled: bool,
        sound_enabled: bool,
        transition_delay_ms: u64,
        transitioning: bool,
        at: DateTime<Utc>,
    },
}
