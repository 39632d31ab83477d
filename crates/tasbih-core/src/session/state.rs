use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::targets::validate_target;

/// Live counting state. `0 <= count <= target` and `target >= 1` at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phrase_id: String,
    pub count: u32,
    pub target: u32,
    pub vibration_enabled: bool,
    pub sound_enabled: bool,
    pub transition_delay_ms: u64,
}

impl SessionState {
    pub fn is_complete(&self) -> bool {
        self.count >= self.target
    }

    pub fn invariant_holds(&self) -> bool {
        self.target >= 1 && self.count <= self.target
    }

    /// Move to another phrase: count restarts, target is the phrase's.
    pub(crate) fn switch_to(&mut self, phrase_id: &str, target: u32) -> String {
        self.count = 0;
        self.target = target;
        std::mem::replace(&mut self.phrase_id, phrase_id.to_string())
    }

    /// Apply a new target, pulling the count down if it is now above it.
    pub(crate) fn retarget(&mut self, target: u32) {
        self.target = target;
        self.count = self.count.min(target);
    }
}

/// Pick target and count from raw stored values.
///
/// A stored target that is missing or out of range means the stored count
/// cannot be trusted either, so both fall back (`fallback_target`, 0).
pub(crate) fn resolve_stored(
    stored_target: Option<i64>,
    stored_count: Option<i64>,
    fallback_target: u32,
) -> (u32, u32) {
    let target = match stored_target.map(validate_target) {
        Some(Ok(target)) => target,
        Some(Err(ValidationError::TargetOutOfRange { value, .. })) => {
            tracing::warn!(value, "stored target out of range; using default");
            return (fallback_target, 0);
        }
        _ => return (fallback_target, 0),
    };
    let count = match stored_count {
        Some(c) if c >= 0 && c <= i64::from(target) => c as u32,
        Some(c) => {
            tracing::warn!(count = c, target, "stored count out of range; starting at 0");
            0
        }
        None => 0,
    };
    (target, count)
}
