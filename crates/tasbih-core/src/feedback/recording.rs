//! Backend that records calls instead of producing feedback.
//!
//! Playbacks never complete on their own; call [`RecordingBackend::complete`]
//! to deliver a completion signal, or leave it to the coordinator's watchdog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use super::backend::{FeedbackBackend, Playback, PlaybackHandle};
use crate::error::FeedbackError;

#[derive(Default)]
struct Calls {
    vibrations: Vec<u64>,
    played: Vec<(PlaybackHandle, String)>,
    stopped: Vec<PlaybackHandle>,
    pending: HashMap<PlaybackHandle, oneshot::Sender<()>>,
}

pub struct RecordingBackend {
    calls: Mutex<Calls>,
    next_handle: AtomicU64,
    vibration_capability: bool,
    fail_vibration: AtomicBool,
    fail_playback: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Calls::default()),
            next_handle: AtomicU64::new(1),
            vibration_capability: true,
            fail_vibration: AtomicBool::new(false),
            fail_playback: AtomicBool::new(false),
        }
    }

    pub fn without_vibration_capability() -> Self {
        Self {
            vibration_capability: false,
            ..Self::new()
        }
    }

    fn calls(&self) -> MutexGuard<'_, Calls> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_fail_vibration(&self, fail: bool) {
        self.fail_vibration.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_playback(&self, fail: bool) {
        self.fail_playback.store(fail, Ordering::SeqCst);
    }

    /// Deliver the completion signal for `handle`.
    pub fn complete(&self, handle: PlaybackHandle) {
        if let Some(tx) = self.calls().pending.remove(&handle) {
            let _ = tx.send(());
        }
    }

    pub fn vibrations(&self) -> Vec<u64> {
        self.calls().vibrations.clone()
    }

    pub fn played(&self) -> Vec<(PlaybackHandle, String)> {
        self.calls().played.clone()
    }

    /// Cue ids in play order.
    pub fn played_cues(&self) -> Vec<String> {
        self.calls().played.iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn stopped(&self) -> Vec<PlaybackHandle> {
        self.calls().stopped.clone()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackBackend for RecordingBackend {
    fn vibrate(&self, duration_ms: u64) -> Result<(), FeedbackError> {
        if self.fail_vibration.load(Ordering::SeqCst) {
            return Err(FeedbackError::Vibration("no haptic engine".into()));
        }
        self.calls().vibrations.push(duration_ms);
        Ok(())
    }

    fn has_vibration_capability(&self) -> bool {
        self.vibration_capability
    }

    fn play_asset(&self, cue_id: &str) -> Result<Playback, FeedbackError> {
        if self.fail_playback.load(Ordering::SeqCst) {
            return Err(FeedbackError::Playback {
                cue: cue_id.to_string(),
                message: "asset missing".into(),
            });
        }
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        let mut calls = self.calls();
        calls.played.push((handle, cue_id.to_string()));
        calls.pending.insert(handle, tx);
        Ok(Playback {
            handle,
            completion: rx,
        })
    }

    fn stop(&self, handle: PlaybackHandle) -> Result<(), FeedbackError> {
        let mut calls = self.calls();
        calls.pending.remove(&handle);
        calls.stopped.push(handle);
        Ok(())
    }
}
