//! Reminder scheduler that queues notifications in the SQLite outbox.
//!
//! The CLI cannot post notifications itself; whatever delivers them on the
//! host reads the `scheduled_notifications` table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tasbih_core::storage::database::ScheduledNotification;
use tasbih_core::{ReminderError, ReminderScheduler, SqliteStore};

pub struct OutboxScheduler {
    db: Arc<SqliteStore>,
}

impl OutboxScheduler {
    pub fn new(db: Arc<SqliteStore>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReminderScheduler for OutboxScheduler {
    async fn schedule(
        &self,
        id: i64,
        body: &str,
        fire_at: DateTime<Local>,
        enabled: bool,
    ) -> Result<(), ReminderError> {
        let notification = ScheduledNotification {
            id,
            body: body.to_string(),
            fire_at,
            enabled,
        };
        self.db
            .upsert_notification(&notification)
            .map_err(|e| ReminderError::ScheduleFailed(e.to_string()))?;
        tracing::debug!(id, fire_at = %fire_at, "reminder queued");
        Ok(())
    }

    async fn cancel(&self, id: i64) -> Result<(), ReminderError> {
        self.db
            .delete_notification(id)
            .map_err(|e| ReminderError::CancelFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tasbih_core::{
        CoreError, FeedbackCoordinator, PhraseCatalog, SessionEngine, SessionSettings, TimeOfDay,
        REMINDER_NOTIFICATION_ID,
    };

    use crate::console_feedback::ConsoleFeedback;

    /// Outbox whose `schedule` can be switched to fail; `cancel` always goes through.
    struct FlakyOutbox {
        inner: OutboxScheduler,
        fail: AtomicBool,
    }

    #[async_trait]
    impl ReminderScheduler for FlakyOutbox {
        async fn schedule(
            &self,
            id: i64,
            body: &str,
            fire_at: DateTime<Local>,
            enabled: bool,
        ) -> Result<(), ReminderError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ReminderError::ScheduleFailed("notifications denied".into()));
            }
            self.inner.schedule(id, body, fire_at, enabled).await
        }

        async fn cancel(&self, id: i64) -> Result<(), ReminderError> {
            self.inner.cancel(id).await
        }
    }

    #[tokio::test]
    async fn schedule_then_cancel() {
        let db = Arc::new(SqliteStore::open_memory().unwrap());
        let outbox = OutboxScheduler::new(db.clone());
        let fire_at = Local.with_ymd_and_hms(2031, 3, 1, 5, 30, 0).unwrap();

        outbox
            .schedule(REMINDER_NOTIFICATION_ID, "dhikr", fire_at, true)
            .await
            .unwrap();
        let queued = db.notification(REMINDER_NOTIFICATION_ID).unwrap().unwrap();
        assert_eq!(queued.body, "dhikr");
        assert_eq!(queued.fire_at, fire_at);

        outbox.cancel(REMINDER_NOTIFICATION_ID).await.unwrap();
        assert!(db.notification(REMINDER_NOTIFICATION_ID).unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_reschedule_clears_queued_row() {
        let db = Arc::new(SqliteStore::open_memory().unwrap());
        let outbox = Arc::new(FlakyOutbox {
            inner: OutboxScheduler::new(db.clone()),
            fail: AtomicBool::new(false),
        });
        let engine = SessionEngine::new(
            Arc::new(PhraseCatalog::builtin()),
            db.clone(),
            FeedbackCoordinator::new(Arc::new(ConsoleFeedback::new(Duration::from_millis(10)))),
            outbox.clone(),
            SessionSettings::default(),
        );
        engine.initialize().await;

        engine
            .configure_reminder(true, Some(TimeOfDay::new(5, 0).unwrap()))
            .await
            .unwrap();
        assert!(db.notification(REMINDER_NOTIFICATION_ID).unwrap().is_some());

        outbox.fail.store(true, Ordering::SeqCst);
        let err = engine
            .configure_reminder(true, Some(TimeOfDay::new(6, 0).unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Reminder(_)));
        assert!(!engine.reminder().enabled);
        assert!(db.notification(REMINDER_NOTIFICATION_ID).unwrap().is_none());
        engine.shutdown();
    }
}
