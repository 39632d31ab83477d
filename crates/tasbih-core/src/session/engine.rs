//! Session engine implementation.
//!
//! All mutation of [`SessionState`] happens behind a short-lived mutex that
//! is never held across an `.await`. Overlapping async operations (a tap
//! arriving while a write or a cue-gated transition is pending) are kept
//! apart by in-flight flags rather than locks:
//!
//! - `transitioning`: at most one phrase advance at a time; increments and
//!   phrase selection are dropped while it is set.
//! - `resetting`: at most one reset at a time.
//! - `flushing`: repeated suspend signals collapse into one batch write.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = SessionEngine::new(catalog, store, feedback, reminders, settings);
//! engine.initialize().await;
//! engine.increment().await;
//! engine.flush_preferences().await?;
//! engine.shutdown();
//! ```

use chrono::{Local, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;

use super::guard::InFlight;
use super::state::{resolve_stored, SessionState};
use crate::catalog::{PhraseCatalog, PhraseDefinition};
use crate::error::{CoreError, StorageError, ValidationError};
use crate::events::Event;
use crate::feedback::{FeedbackCoordinator, HapticIntensity, COUNTER_CUE_ID};
use crate::reminder::{
    next_fire_at, ReminderConfig, ReminderScheduler, TimeOfDay, REMINDER_NOTIFICATION_ID,
};
use crate::storage::{get_parsed, keys, Config, KeyValueStore};
use crate::targets::{parse_target, validate_target, TargetRegistry};

/// Longest allowed pause between a target's completion and the phrase switch.
pub const MAX_TRANSITION_DELAY_MS: u64 = 10_000;

/// Defaults used when nothing has been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub vibration_enabled: bool,
    pub sound_enabled: bool,
    pub transition_delay_ms: u64,
    pub reminder_body: String,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            vibration_enabled: config.session.vibration,
            sound_enabled: config.session.sound,
            transition_delay_ms: config.session.transition_delay_ms.min(MAX_TRANSITION_DELAY_MS),
            reminder_body: config.reminder.body.clone(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

struct Shared {
    state: SessionState,
    registry: TargetRegistry,
    reminder: ReminderConfig,
    /// Bumped on every mutation worth flushing.
    revision: u64,
}

impl Shared {
    fn defaults(catalog: &Arc<PhraseCatalog>, settings: &SessionSettings) -> Self {
        let registry = TargetRegistry::new(Arc::clone(catalog));
        let first = catalog.first();
        Self {
            state: SessionState {
                phrase_id: first.id.clone(),
                count: 0,
                target: registry.get(&first.id),
                vibration_enabled: settings.vibration_enabled,
                sound_enabled: settings.sound_enabled,
                transition_delay_ms: settings.transition_delay_ms,
            },
            registry,
            reminder: ReminderConfig::default(),
            revision: 0,
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Keys describing the current phrase, its target and its count.
    fn phrase_entries(&self) -> Vec<(String, String)> {
        let s = &self.state;
        vec![
            (keys::CURRENT_PHRASE.to_string(), s.phrase_id.clone()),
            (keys::TARGET.to_string(), s.target.to_string()),
            (keys::count(&s.phrase_id), s.count.to_string()),
            (
                keys::IS_CUSTOM_TARGET.to_string(),
                self.registry.is_overridden(&s.phrase_id).to_string(),
            ),
        ]
    }

    fn target_entries(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut entries = self.phrase_entries();
        entries.push((keys::CUSTOM_TARGETS.to_string(), self.registry.serialize()?));
        Ok(entries)
    }

    /// Everything the suspend-time flush writes.
    fn flush_entries(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let s = &self.state;
        let mut entries = self.target_entries()?;
        entries.extend([
            (keys::VIBRATION_ENABLED.to_string(), s.vibration_enabled.to_string()),
            (keys::SOUND_ENABLED.to_string(), s.sound_enabled.to_string()),
            (keys::TRANSITION_DELAY_MS.to_string(), s.transition_delay_ms.to_string()),
        ]);
        Ok(entries)
    }
}

/// The counting session.
///
/// Collaborators are injected; the engine is the only caller of each.
pub struct SessionEngine {
    catalog: Arc<PhraseCatalog>,
    store: Arc<dyn KeyValueStore>,
    feedback: FeedbackCoordinator,
    reminders: Arc<dyn ReminderScheduler>,
    settings: SessionSettings,
    shared: Mutex<Shared>,
    transitioning: AtomicBool,
    resetting: AtomicBool,
    flushing: AtomicBool,
    flushed_revision: AtomicU64,
    /// Wakes a transition waiting on its cue when sound is switched off.
    sound_off: Notify,
}

impl SessionEngine {
    /// Create an engine holding catalog defaults. Call [`initialize`](Self::initialize)
    /// before accepting user input.
    pub fn new(
        catalog: Arc<PhraseCatalog>,
        store: Arc<dyn KeyValueStore>,
        feedback: FeedbackCoordinator,
        reminders: Arc<dyn ReminderScheduler>,
        settings: SessionSettings,
    ) -> Self {
        let shared = Shared::defaults(&catalog, &settings);
        Self {
            catalog,
            store,
            feedback,
            reminders,
            settings,
            shared: Mutex::new(shared),
            transitioning: AtomicBool::new(false),
            resetting: AtomicBool::new(false),
            flushing: AtomicBool::new(false),
            flushed_revision: AtomicU64::new(0),
            sound_off: Notify::new(),
        }
    }

    fn shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.shared().state.clone()
    }

    pub fn count(&self) -> u32 {
        self.shared().state.count
    }

    pub fn target(&self) -> u32 {
        self.shared().state.target
    }

    pub fn current_phrase(&self) -> PhraseDefinition {
        let id = self.shared().state.phrase_id.clone();
        self.catalog
            .get(&id)
            .unwrap_or_else(|| self.catalog.first())
            .clone()
    }

    pub fn vibration_enabled(&self) -> bool {
        self.shared().state.vibration_enabled
    }

    pub fn sound_enabled(&self) -> bool {
        self.shared().state.sound_enabled
    }

    pub fn transition_delay_ms(&self) -> u64 {
        self.shared().state.transition_delay_ms
    }

    pub fn is_custom_target(&self) -> bool {
        let shared = self.shared();
        shared.registry.is_overridden(&shared.state.phrase_id)
    }

    /// Effective target for any phrase, override-aware.
    pub fn target_for(&self, phrase_id: &str) -> u32 {
        self.shared().registry.get(phrase_id)
    }

    pub fn reminder(&self) -> ReminderConfig {
        self.shared().reminder
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning.load(Ordering::SeqCst)
    }

    pub fn catalog(&self) -> &PhraseCatalog {
        &self.catalog
    }

    pub fn feedback(&self) -> &FeedbackCoordinator {
        &self.feedback
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let (state, custom_target) = {
            let shared = self.shared();
            let custom = shared.registry.is_overridden(&shared.state.phrase_id);
            (shared.state.clone(), custom)
        };
        let phrase = self.catalog.get(&state.phrase_id);
        Event::StateSnapshot {
            display_text: phrase.map(|p| p.display_text.clone()).unwrap_or_default(),
            native_script_text: phrase.map(|p| p.native_script_text.clone()).unwrap_or_default(),
            phrase_id: state.phrase_id,
            count: state.count,
            target: state.target,
            custom_target,
            vibration_enabled: state.vibration_enabled,
            sound_enabled: state.sound_enabled,
            transition_delay_ms: state.transition_delay_ms,
            transitioning: self.is_transitioning(),
            at: Utc::now(),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load persisted progress and preferences.
    ///
    /// Never fails: a store that cannot be read leaves the session on
    /// catalog defaults.
    pub async fn initialize(&self) -> Event {
        let loaded = match self.load().await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved session; starting from defaults");
                Shared::defaults(&self.catalog, &self.settings)
            }
        };
        debug_assert!(loaded.state.invariant_holds());
        tracing::debug!(
            phrase = %loaded.state.phrase_id,
            count = loaded.state.count,
            target = loaded.state.target,
            "session initialized"
        );
        let revision = {
            let mut shared = self.shared();
            let revision = shared.revision;
            *shared = Shared { revision, ..loaded };
            revision
        };
        self.flushed_revision.store(revision, Ordering::SeqCst);
        self.snapshot()
    }

    async fn load(&self) -> Result<Shared, StorageError> {
        let store = self.store.as_ref();
        let mut shared = Shared::defaults(&self.catalog, &self.settings);

        if let Some(json) = store.get(keys::CUSTOM_TARGETS).await? {
            if let Err(e) = shared.registry.deserialize(&json) {
                tracing::warn!(error = %e, "ignoring unreadable target overrides");
            }
        }

        let stored_phrase = store.get(keys::CURRENT_PHRASE).await?;
        let (phrase, phrase_known) = match stored_phrase.as_deref() {
            Some(id) => match self.catalog.get(id) {
                Some(p) => (p, true),
                None => {
                    tracing::warn!(phrase = id, "saved phrase is not in the catalog");
                    (self.catalog.first(), false)
                }
            },
            None => (self.catalog.first(), false),
        };

        // The saved target belongs to the saved phrase; it means nothing for a fallback.
        let stored_target: Option<i64> = if phrase_known {
            get_parsed(store, keys::TARGET).await?
        } else {
            None
        };
        let stored_count: Option<i64> = get_parsed(store, &keys::count(&phrase.id)).await?;
        let is_custom: bool = get_parsed(store, keys::IS_CUSTOM_TARGET)
            .await?
            .unwrap_or(false);

        if is_custom && !shared.registry.is_overridden(&phrase.id) {
            if let Some(t) = stored_target.and_then(|t| validate_target(t).ok()) {
                let _ = shared.registry.set(&phrase.id, i64::from(t));
            }
        }

        let (target, count) =
            resolve_stored(stored_target, stored_count, shared.registry.get(&phrase.id));

        let vibration = get_parsed(store, keys::VIBRATION_ENABLED)
            .await?
            .unwrap_or(self.settings.vibration_enabled);
        let sound = get_parsed(store, keys::SOUND_ENABLED)
            .await?
            .unwrap_or(self.settings.sound_enabled);
        let delay = get_parsed::<u64>(store, keys::TRANSITION_DELAY_MS)
            .await?
            .filter(|d| *d <= MAX_TRANSITION_DELAY_MS)
            .unwrap_or(self.settings.transition_delay_ms);

        let reminder_enabled = get_parsed(store, keys::REMINDER_ENABLED)
            .await?
            .unwrap_or(false);
        let hour: Option<u32> = get_parsed(store, keys::REMINDER_HOUR).await?;
        let minute: Option<u32> = get_parsed(store, keys::REMINDER_MINUTE).await?;
        let time = match (hour, minute) {
            (Some(h), Some(m)) => TimeOfDay::new(h, m).ok(),
            _ => None,
        };

        shared.state = SessionState {
            phrase_id: phrase.id.clone(),
            count,
            target,
            vibration_enabled: vibration,
            sound_enabled: sound,
            transition_delay_ms: delay,
        };
        shared.reminder = ReminderConfig {
            enabled: reminder_enabled && time.is_some(),
            time,
        };
        Ok(shared)
    }

    /// Teardown: stop audio and cancel watchdogs. Pending writes are left to finish.
    pub fn shutdown(&self) {
        self.feedback.shutdown();
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Count one tap. `None` when the phrase is already complete or a
    /// transition is in flight.
    pub async fn increment(&self) -> Option<Event> {
        if self.is_transitioning() {
            return None;
        }
        let (phrase_id, count, target, vibration, sound) = {
            let mut shared = self.shared();
            if shared.state.is_complete() {
                return None;
            }
            shared.state.count += 1;
            shared.touch();
            let s = &shared.state;
            (
                s.phrase_id.clone(),
                s.count,
                s.target,
                s.vibration_enabled,
                s.sound_enabled,
            )
        };

        if vibration {
            self.feedback.pulse(HapticIntensity::Light);
        }
        if sound {
            self.feedback.play_cue(COUNTER_CUE_ID);
        }
        self.write_in_background(vec![(keys::count(&phrase_id), count.to_string())]);

        let counted = Event::Counted {
            phrase_id,
            count,
            target,
            at: Utc::now(),
        };
        if count < target {
            return Some(counted);
        }
        Some(self.complete_target().await.unwrap_or(counted))
    }

    /// Celebrate, then advance to the next phrase in the cycle.
    ///
    /// With sound on, the next phrase's cue plays and the switch waits
    /// `transition_delay_ms` so the cue is not cut off. A second trigger
    /// while this runs is dropped.
    async fn complete_target(&self) -> Option<Event> {
        let Some(_in_flight) = InFlight::acquire(&self.transitioning) else {
            tracing::debug!("transition already in flight; dropping trigger");
            return None;
        };
        let (from, vibration, sound, delay_ms) = {
            let shared = self.shared();
            let s = &shared.state;
            (
                s.phrase_id.clone(),
                s.vibration_enabled,
                s.sound_enabled,
                s.transition_delay_ms,
            )
        };

        if vibration {
            self.feedback.celebrate();
        }
        let next = self.catalog.next_after(&from).clone();
        if sound {
            self.feedback.play_cue(&next.audio_cue_id);
            self.wait_for_cue(Duration::from_millis(delay_ms)).await;
        }

        let (from, target, entries) = {
            let mut shared = self.shared();
            let target = shared.registry.get(&next.id);
            let from = shared.state.switch_to(&next.id, target);
            shared.touch();
            (from, target, shared.phrase_entries())
        };
        tracing::debug!(from = %from, to = %next.id, "phrase advanced");
        self.write_in_background(entries);

        Some(Event::PhraseAdvanced {
            from_phrase: from,
            to_phrase: next.id,
            target,
            at: Utc::now(),
        })
    }

    /// Sleep out the transition delay, returning early if sound is turned off.
    async fn wait_for_cue(&self, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        let released = self.sound_off.notified();
        tokio::pin!(released);
        let sound_on = self.shared().state.sound_enabled;
        if !sound_on {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = &mut released => {
                tracing::debug!("sound disabled mid-transition; switching now");
            }
        }
    }

    /// Jump to a phrase chosen by the user.
    ///
    /// `None` if it is already current or a transition is in flight.
    pub async fn select_phrase(&self, phrase_id: &str) -> Result<Option<Event>, CoreError> {
        let phrase = self
            .catalog
            .get(phrase_id)
            .ok_or_else(|| ValidationError::UnknownPhrase(phrase_id.to_string()))?
            .clone();
        if self.is_transitioning() {
            return Ok(None);
        }
        let sound = {
            let shared = self.shared();
            if shared.state.phrase_id == phrase.id {
                return Ok(None);
            }
            shared.state.sound_enabled
        };

        self.feedback.stop_all();
        if sound {
            self.feedback.play_cue(&phrase.audio_cue_id);
        }

        let (from, target, entries) = {
            let mut shared = self.shared();
            let target = shared.registry.get(&phrase.id);
            let from = shared.state.switch_to(&phrase.id, target);
            shared.touch();
            (from, target, shared.phrase_entries())
        };
        if let Err(e) = self.store.set_many(&entries).await {
            tracing::warn!(error = %e, "phrase change not saved; next flush will retry");
        }

        Ok(Some(Event::PhraseSelected {
            from_phrase: from,
            to_phrase: phrase.id,
            target,
            at: Utc::now(),
        }))
    }

    /// Override the current phrase's target. Out-of-range values are
    /// rejected and leave the session untouched.
    pub async fn set_target(&self, target: i64) -> Result<Event, CoreError> {
        let target = validate_target(target)?;
        let (phrase_id, count, entries) = {
            let mut shared = self.shared();
            let phrase_id = shared.state.phrase_id.clone();
            shared.registry.set(&phrase_id, i64::from(target))?;
            shared.state.retarget(target);
            shared.touch();
            (phrase_id, shared.state.count, shared.target_entries()?)
        };
        if let Err(e) = self.store.set_many(&entries).await {
            tracing::warn!(error = %e, "target change not saved; next flush will retry");
        }
        Ok(Event::TargetChanged {
            phrase_id,
            target,
            count,
            custom: true,
            at: Utc::now(),
        })
    }

    /// [`set_target`](Self::set_target) for raw text input.
    pub async fn set_target_str(&self, input: &str) -> Result<Event, CoreError> {
        let target = parse_target(input)?;
        self.set_target(i64::from(target)).await
    }

    /// Drop the current phrase's override and return to its catalog default.
    pub async fn clear_target(&self) -> Result<Event, CoreError> {
        let (phrase_id, target, count, entries) = {
            let mut shared = self.shared();
            let phrase_id = shared.state.phrase_id.clone();
            let target = shared.registry.clear(&phrase_id);
            shared.state.retarget(target);
            shared.touch();
            (phrase_id, target, shared.state.count, shared.target_entries()?)
        };
        if let Err(e) = self.store.set_many(&entries).await {
            tracing::warn!(error = %e, "target change not saved; next flush will retry");
        }
        Ok(Event::TargetChanged {
            phrase_id,
            target,
            count,
            custom: false,
            at: Utc::now(),
        })
    }

    /// Zero the count.
    ///
    /// The count drops to 0 immediately; if the write then fails, a
    /// non-zero previous count is restored and a retryable error returned.
    /// `None` while another reset is in flight.
    pub async fn reset(&self) -> Result<Option<Event>, CoreError> {
        let Some(_in_flight) = InFlight::acquire(&self.resetting) else {
            return Ok(None);
        };
        let (phrase_id, previous, vibration) = {
            let mut shared = self.shared();
            let previous = shared.state.count;
            shared.state.count = 0;
            shared.touch();
            (
                shared.state.phrase_id.clone(),
                previous,
                shared.state.vibration_enabled,
            )
        };
        if vibration {
            self.feedback.pulse(HapticIntensity::Medium);
        }

        match self.store.set(&keys::count(&phrase_id), "0").await {
            Ok(()) => Ok(Some(Event::CountReset {
                phrase_id,
                previous_count: previous,
                at: Utc::now(),
            })),
            Err(source) => {
                let restored_count = {
                    let mut shared = self.shared();
                    let untouched =
                        shared.state.phrase_id == phrase_id && shared.state.count == 0;
                    if previous > 0 && untouched {
                        shared.state.count = previous.min(shared.state.target);
                    }
                    shared.state.count
                };
                tracing::warn!(error = %source, restored_count, "reset not saved; rolled back");
                Err(CoreError::ResetFailed {
                    restored_count,
                    source,
                })
            }
        }
    }

    /// Suspend-time checkpoint: write all session fields as one batch.
    ///
    /// `None` if a flush is already running or nothing changed since the
    /// last successful one.
    pub async fn flush_preferences(&self) -> Result<Option<Event>, CoreError> {
        let Some(_in_flight) = InFlight::acquire(&self.flushing) else {
            return Ok(None);
        };
        let (revision, entries) = {
            let shared = self.shared();
            if shared.revision == self.flushed_revision.load(Ordering::SeqCst) {
                return Ok(None);
            }
            (shared.revision, shared.flush_entries()?)
        };
        self.store.set_many(&entries).await?;
        self.flushed_revision.store(revision, Ordering::SeqCst);
        tracing::debug!(revision, "session flushed");
        Ok(Some(Event::PreferencesFlushed { at: Utc::now() }))
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub async fn set_vibration_enabled(&self, enabled: bool) -> Event {
        self.shared().state.vibration_enabled = enabled;
        self.save_preference(keys::VIBRATION_ENABLED, enabled.to_string())
            .await
    }

    /// Turning sound off also stops the current cue and releases a
    /// transition waiting on it.
    pub async fn set_sound_enabled(&self, enabled: bool) -> Event {
        self.shared().state.sound_enabled = enabled;
        if !enabled {
            self.feedback.stop_all();
            self.sound_off.notify_waiters();
        }
        self.save_preference(keys::SOUND_ENABLED, enabled.to_string())
            .await
    }

    pub async fn set_transition_delay_ms(&self, delay_ms: u64) -> Result<Event, CoreError> {
        if delay_ms > MAX_TRANSITION_DELAY_MS {
            return Err(ValidationError::DelayOutOfRange {
                value_ms: delay_ms,
                max_ms: MAX_TRANSITION_DELAY_MS,
            }
            .into());
        }
        self.shared().state.transition_delay_ms = delay_ms;
        Ok(self
            .save_preference(keys::TRANSITION_DELAY_MS, delay_ms.to_string())
            .await)
    }

    async fn save_preference(&self, key: &str, value: String) -> Event {
        let (vibration, sound, delay) = {
            let mut shared = self.shared();
            shared.touch();
            let s = &shared.state;
            (s.vibration_enabled, s.sound_enabled, s.transition_delay_ms)
        };
        if let Err(e) = self.store.set(key, &value).await {
            tracing::warn!(key, error = %e, "preference not saved; next flush will retry");
        }
        Event::PreferencesChanged {
            vibration_enabled: vibration,
            sound_enabled: sound,
            transition_delay_ms: delay,
            at: Utc::now(),
        }
    }

    // ── Reminder ─────────────────────────────────────────────────────

    /// Enable (with a time) or disable the daily reminder.
    ///
    /// If the scheduler fails, any previously scheduled reminder is
    /// cancelled, the reminder is left disabled, that state is persisted,
    /// and the failure is returned.
    pub async fn configure_reminder(
        &self,
        enabled: bool,
        time: Option<TimeOfDay>,
    ) -> Result<Event, CoreError> {
        if !enabled {
            if let Err(e) = self.reminders.cancel(REMINDER_NOTIFICATION_ID).await {
                tracing::warn!(error = %e, "failed to cancel reminder");
            }
            let time = time.or(self.shared().reminder.time);
            self.store_reminder(ReminderConfig {
                enabled: false,
                time,
            })
            .await;
            return Ok(Event::ReminderDisabled { at: Utc::now() });
        }

        let time = time.ok_or(ValidationError::MissingReminderTime)?;
        let fire_at = next_fire_at(Local::now(), time)
            .ok_or_else(|| ValidationError::InvalidTimeOfDay(time.to_string()))?;

        match self
            .reminders
            .schedule(
                REMINDER_NOTIFICATION_ID,
                &self.settings.reminder_body,
                fire_at,
                true,
            )
            .await
        {
            Ok(()) => {
                self.store_reminder(ReminderConfig {
                    enabled: true,
                    time: Some(time),
                })
                .await;
                Ok(Event::ReminderScheduled {
                    hour: time.hour,
                    minute: time.minute,
                    fire_at,
                    at: Utc::now(),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "reminder scheduling failed; disabling reminder");
                // An earlier schedule may still be queued under the same id.
                if let Err(cancel) = self.reminders.cancel(REMINDER_NOTIFICATION_ID).await {
                    tracing::warn!(error = %cancel, "failed to cancel reminder");
                }
                self.store_reminder(ReminderConfig {
                    enabled: false,
                    time: Some(time),
                })
                .await;
                Err(e.into())
            }
        }
    }

    async fn store_reminder(&self, config: ReminderConfig) {
        self.shared().reminder = config;
        let mut entries = vec![(keys::REMINDER_ENABLED.to_string(), config.enabled.to_string())];
        if let Some(time) = config.time {
            entries.push((keys::REMINDER_HOUR.to_string(), time.hour.to_string()));
            entries.push((keys::REMINDER_MINUTE.to_string(), time.minute.to_string()));
        }
        if let Err(e) = self.store.set_many(&entries).await {
            tracing::warn!(error = %e, "reminder settings not saved");
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Fire-and-forget write. Intermediate writes may land out of order;
    /// the suspend flush is the durability checkpoint.
    fn write_in_background(&self, entries: Vec<(String, String)>) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.set_many(&entries).await {
                tracing::warn!(error = %e, "background write failed");
            }
        });
    }
}
