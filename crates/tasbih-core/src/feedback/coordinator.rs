//! Feedback coordinator.
//!
//! Audio has a single busy flag. Every cue stops the previous one before it
//! starts, and every started cue arms a watchdog: if the backend never
//! reports completion, the busy flag is force-cleared once the watchdog
//! elapses. A generation number ties each waiter to the cue that armed it,
//! so a late completion never clears a newer cue's flag.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::backend::{FeedbackBackend, HapticIntensity, PlaybackHandle};

/// Cue played on every counted tap.
pub const COUNTER_CUE_ID: &str = "counter_tick";

/// Pulses in the target-reached pattern.
pub const CELEBRATION_PULSES: usize = 3;

/// Gap between target-reached pulses.
pub const CELEBRATION_SPACING: Duration = Duration::from_millis(150);

const CELEBRATION_PULSE_MS: u64 = 60;

pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(3);

struct ActiveCue {
    generation: u64,
    handle: PlaybackHandle,
    cue_id: String,
    waiter: JoinHandle<()>,
}

struct Inner {
    backend: Arc<dyn FeedbackBackend>,
    watchdog: Duration,
    busy: AtomicBool,
    generation: AtomicU64,
    active: Mutex<Option<ActiveCue>>,
    pattern: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn active(&self) -> MutexGuard<'_, Option<ActiveCue>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pattern(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pattern.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn vibrate(&self, duration_ms: u64) {
        if let Err(e) = self.backend.vibrate(duration_ms) {
            tracing::warn!(error = %e, "haptic feedback failed");
        }
    }

    /// Clear busy state for `generation` if it is still the active cue.
    fn finish(&self, generation: u64, completed: bool) {
        let mut active = self.active();
        let Some(cue) = active.as_ref() else {
            return;
        };
        if cue.generation != generation {
            return;
        }
        if completed {
            tracing::debug!(cue = %cue.cue_id, "cue finished");
        } else {
            tracing::warn!(cue = %cue.cue_id, "no completion signal; watchdog cleared busy flag");
            if let Err(e) = self.backend.stop(cue.handle) {
                tracing::warn!(error = %e, "failed to stop timed-out cue");
            }
        }
        *active = None;
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Haptics and audio cues on behalf of the session engine.
///
/// Cheap to clone; clones share the same busy state.
#[derive(Clone)]
pub struct FeedbackCoordinator {
    inner: Arc<Inner>,
}

impl FeedbackCoordinator {
    pub fn new(backend: Arc<dyn FeedbackBackend>) -> Self {
        Self::with_watchdog(backend, DEFAULT_WATCHDOG)
    }

    pub fn with_watchdog(backend: Arc<dyn FeedbackBackend>, watchdog: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                watchdog,
                busy: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                active: Mutex::new(None),
                pattern: Mutex::new(None),
            }),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Whether an audio cue is currently considered playing.
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::SeqCst)
    }

    pub fn current_cue(&self) -> Option<String> {
        self.inner.active().as_ref().map(|c| c.cue_id.clone())
    }

    // ── Haptics ──────────────────────────────────────────────────────

    pub fn pulse(&self, intensity: HapticIntensity) {
        self.inner.vibrate(intensity.duration_ms());
    }

    /// Target-reached pattern: three spaced pulses, or one heavy impact on
    /// backends without patterned vibration. Does not block the caller.
    pub fn celebrate(&self) {
        if !self.inner.backend.has_vibration_capability() {
            self.pulse(HapticIntensity::Heavy);
            return;
        }
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            for i in 0..CELEBRATION_PULSES {
                if i > 0 {
                    tokio::time::sleep(CELEBRATION_SPACING).await;
                }
                inner.vibrate(CELEBRATION_PULSE_MS);
            }
        });
        if let Some(previous) = self.inner.pattern().replace(task) {
            previous.abort();
        }
    }

    // ── Audio ────────────────────────────────────────────────────────

    /// Stop whatever is playing, then start `cue_id`.
    ///
    /// Returns whether playback started. Failures leave the coordinator idle.
    pub fn play_cue(&self, cue_id: &str) -> bool {
        self.stop_all();

        let playback = match self.inner.backend.play_asset(cue_id) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(cue = cue_id, error = %e, "audio playback failed");
                self.inner.busy.store(false, Ordering::SeqCst);
                return false;
            }
        };

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        // Hold the slot while spawning so the waiter cannot finish before it is recorded.
        let mut active = self.inner.active();
        let inner = Arc::clone(&self.inner);
        let watchdog = self.inner.watchdog;
        let completion = playback.completion;
        let waiter = tokio::spawn(async move {
            let completed = tokio::select! {
                _ = completion => true,
                _ = tokio::time::sleep(watchdog) => false,
            };
            inner.finish(generation, completed);
        });
        *active = Some(ActiveCue {
            generation,
            handle: playback.handle,
            cue_id: cue_id.to_string(),
            waiter,
        });
        self.inner.busy.store(true, Ordering::SeqCst);
        true
    }

    /// Stop the current cue, if any, and cancel its watchdog.
    pub fn stop_all(&self) {
        let previous = self.inner.active().take();
        if let Some(cue) = previous {
            cue.waiter.abort();
            if let Err(e) = self.inner.backend.stop(cue.handle) {
                tracing::warn!(cue = %cue.cue_id, error = %e, "failed to stop cue");
            }
        }
        self.inner.busy.store(false, Ordering::SeqCst);
    }

    /// Teardown: stop audio, cancel the watchdog and any running haptic pattern.
    pub fn shutdown(&self) {
        self.stop_all();
        if let Some(pattern) = self.inner.pattern().take() {
            pattern.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::RecordingBackend;

    fn coordinator(backend: &Arc<RecordingBackend>) -> FeedbackCoordinator {
        FeedbackCoordinator::new(backend.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_clears_stuck_busy_flag() {
        let backend = Arc::new(RecordingBackend::new());
        let feedback = coordinator(&backend);

        assert!(feedback.play_cue("subhanallah"));
        assert!(feedback.is_busy());

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(feedback.is_busy());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!feedback.is_busy());
        assert_eq!(backend.stopped().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_cancels_watchdog() {
        let backend = Arc::new(RecordingBackend::new());
        let feedback = coordinator(&backend);

        feedback.play_cue("alhamdulillah");
        let handle = backend.played().last().unwrap().0;
        backend.complete(handle);
        tokio::task::yield_now().await;
        assert!(!feedback.is_busy());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(backend.stopped().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_completion_does_not_clear_newer_cue() {
        let backend = Arc::new(RecordingBackend::new());
        let feedback = coordinator(&backend);

        feedback.play_cue("first");
        let first = backend.played()[0].0;
        feedback.play_cue("second");

        assert_eq!(backend.stopped(), vec![first]);
        backend.complete(first);
        tokio::task::yield_now().await;
        assert!(feedback.is_busy());
        assert_eq!(feedback.current_cue().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn playback_error_is_swallowed() {
        let backend = Arc::new(RecordingBackend::new());
        backend.set_fail_playback(true);
        let feedback = coordinator(&backend);

        assert!(!feedback.play_cue("missing"));
        assert!(!feedback.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn celebrate_pattern_and_fallback() {
        let backend = Arc::new(RecordingBackend::new());
        let feedback = coordinator(&backend);
        feedback.celebrate();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(backend.vibrations(), vec![60, 60, 60]);

        let plain = Arc::new(RecordingBackend::without_vibration_capability());
        coordinator(&plain).celebrate();
        assert_eq!(plain.vibrations(), vec![HapticIntensity::Heavy.duration_ms()]);
    }

    #[tokio::test]
    async fn vibration_error_is_swallowed() {
        let backend = Arc::new(RecordingBackend::new());
        backend.set_fail_vibration(true);
        coordinator(&backend).pulse(HapticIntensity::Light);
        assert!(backend.vibrations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_audio() {
        let backend = Arc::new(RecordingBackend::new());
        let feedback = coordinator(&backend);
        feedback.play_cue("salawat");
        feedback.shutdown();
        assert!(!feedback.is_busy());
        assert_eq!(backend.stopped().len(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.stopped().len(), 1);
    }
}
