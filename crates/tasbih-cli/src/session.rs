//! Wiring shared by every engine-backed command.

use std::sync::Arc;

use serde::Serialize;
use tasbih_core::{
    Config, Event, FeedbackCoordinator, PhraseCatalog, SessionEngine, SessionSettings, SqliteStore,
};

use crate::console_feedback::ConsoleFeedback;
use crate::outbox::OutboxScheduler;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// An initialized engine over the on-disk database.
pub struct Session {
    pub engine: SessionEngine,
    pub db: Arc<SqliteStore>,
}

impl Session {
    pub async fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_or_default();
        let db = Arc::new(SqliteStore::open()?);
        let backend = Arc::new(ConsoleFeedback::new(config.feedback.cue_length()));
        let engine = SessionEngine::new(
            Arc::new(PhraseCatalog::builtin()),
            db.clone(),
            FeedbackCoordinator::with_watchdog(backend, config.feedback.watchdog()),
            Arc::new(OutboxScheduler::new(db.clone())),
            SessionSettings::from_config(&config),
        );
        engine.initialize().await;
        Ok(Self { engine, db })
    }

    /// Let background writes land, checkpoint, and tear down.
    pub async fn close(self) -> CliResult {
        tokio::task::yield_now().await;
        let flushed = self.engine.flush_preferences().await;
        self.engine.shutdown();
        flushed?;
        Ok(())
    }

    /// Print `event`, or the current snapshot when the operation was a no-op.
    pub fn print_event_or_snapshot(&self, event: Option<Event>) -> CliResult {
        let event = event.unwrap_or_else(|| self.engine.snapshot());
        print_json(&event)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
