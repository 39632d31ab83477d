use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::FeedbackError;

/// Opaque id for one playback, issued by the backend.
pub type PlaybackHandle = u64;

/// A started playback. `completion` resolves when the cue finishes on its own;
/// a backend that never sends leaves the coordinator's watchdog to clean up.
#[derive(Debug)]
pub struct Playback {
    pub handle: PlaybackHandle,
    pub completion: oneshot::Receiver<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticIntensity {
    Light,
    Medium,
    Heavy,
}

impl HapticIntensity {
    pub fn duration_ms(self) -> u64 {
        match self {
            HapticIntensity::Light => 10,
            HapticIntensity::Medium => 20,
            HapticIntensity::Heavy => 40,
        }
    }
}

/// Platform haptics and audio.
pub trait FeedbackBackend: Send + Sync {
    fn vibrate(&self, duration_ms: u64) -> Result<(), FeedbackError>;

    /// Whether patterned vibration is supported (as opposed to a single impact).
    fn has_vibration_capability(&self) -> bool;

    fn play_asset(&self, cue_id: &str) -> Result<Playback, FeedbackError>;

    fn stop(&self, handle: PlaybackHandle) -> Result<(), FeedbackError>;
}
