//! Terminal feedback backend.
//!
//! Haptics become a terminal bell on stderr (only when stderr is a tty).
//! Audio cues are logged and report completion after a nominal cue length.

use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tasbih_core::{FeedbackBackend, FeedbackError, Playback, PlaybackHandle};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct ConsoleFeedback {
    cue_length: Duration,
    next_handle: AtomicU64,
    playing: Mutex<HashMap<PlaybackHandle, JoinHandle<()>>>,
}

impl ConsoleFeedback {
    pub fn new(cue_length: Duration) -> Self {
        Self {
            cue_length,
            next_handle: AtomicU64::new(1),
            playing: Mutex::new(HashMap::new()),
        }
    }

    fn playing(&self) -> MutexGuard<'_, HashMap<PlaybackHandle, JoinHandle<()>>> {
        self.playing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FeedbackBackend for ConsoleFeedback {
    fn vibrate(&self, duration_ms: u64) -> Result<(), FeedbackError> {
        tracing::debug!(duration_ms, "haptic pulse");
        let mut stderr = std::io::stderr();
        if stderr.is_terminal() {
            stderr
                .write_all(b"\x07")
                .and_then(|()| stderr.flush())
                .map_err(|e| FeedbackError::Vibration(e.to_string()))?;
        }
        Ok(())
    }

    fn has_vibration_capability(&self) -> bool {
        // A bell cannot carry a pattern.
        false
    }

    fn play_asset(&self, cue_id: &str) -> Result<Playback, FeedbackError> {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        let cue_length = self.cue_length;
        tracing::info!(cue = cue_id, handle, "playing cue");
        let task = tokio::spawn(async move {
            tokio::time::sleep(cue_length).await;
            let _ = tx.send(());
        });
        let mut playing = self.playing();
        playing.retain(|_, t| !t.is_finished());
        playing.insert(handle, task);
        Ok(Playback {
            handle,
            completion: rx,
        })
    }

    fn stop(&self, handle: PlaybackHandle) -> Result<(), FeedbackError> {
        if let Some(task) = self.playing().remove(&handle) {
            task.abort();
            tracing::debug!(handle, "cue stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn cue_completes_after_nominal_length() {
        let feedback = ConsoleFeedback::new(Duration::from_millis(800));
        let playback = feedback.play_asset("subhanallah").unwrap();
        let started = tokio::time::Instant::now();
        playback.completion.await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_cue_never_completes() {
        let feedback = ConsoleFeedback::new(Duration::from_millis(800));
        let playback = feedback.play_asset("salawat").unwrap();
        feedback.stop(playback.handle).unwrap();
        assert!(playback.completion.await.is_err());
    }
}
