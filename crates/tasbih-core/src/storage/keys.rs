//! Storage keys used by the session engine.

pub const CURRENT_PHRASE: &str = "current_phrase";
pub const TARGET: &str = "target";
pub const VIBRATION_ENABLED: &str = "vibration_enabled";
pub const SOUND_ENABLED: &str = "sound_enabled";
pub const IS_CUSTOM_TARGET: &str = "is_custom_target";
pub const CUSTOM_TARGETS: &str = "custom_targets";
pub const TRANSITION_DELAY_MS: &str = "transition_delay_ms";
pub const REMINDER_ENABLED: &str = "reminder_enabled";
pub const REMINDER_HOUR: &str = "reminder_hour";
pub const REMINDER_MINUTE: &str = "reminder_minute";

/// Last count for a phrase.
pub fn count(phrase_id: &str) -> String {
    format!("count.{phrase_id}")
}
