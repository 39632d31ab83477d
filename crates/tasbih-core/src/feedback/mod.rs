//! Haptic and audio feedback.
//!
//! The [`FeedbackCoordinator`] sits between the session engine and a
//! platform [`FeedbackBackend`]. Feedback is best-effort: backend failures
//! are logged here and never reach the engine.

mod backend;
mod coordinator;
#[cfg(any(test, feature = "testing"))]
pub mod recording;

pub use backend::{FeedbackBackend, HapticIntensity, Playback, PlaybackHandle};
pub use coordinator::{FeedbackCoordinator, CELEBRATION_PULSES, CELEBRATION_SPACING, COUNTER_CUE_ID};
#[cfg(any(test, feature = "testing"))]
pub use recording::RecordingBackend;
