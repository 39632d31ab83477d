use clap::Subcommand;
use serde_json::json;
use tasbih_core::{TimeOfDay, REMINDER_NOTIFICATION_ID};

use crate::session::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Enable the daily reminder at a local time
    Set {
        /// Time of day as HH:MM (24-hour)
        time: TimeOfDay,
    },
    /// Disable the daily reminder
    Off,
    /// Show reminder settings and the queued notification
    Status,
}

pub async fn run(action: ReminderAction) -> CliResult {
    let session = Session::open().await?;
    let result = match action {
        ReminderAction::Set { time } => {
            match session.engine.configure_reminder(true, Some(time)).await {
                Ok(event) => print_json(&event),
                Err(e) => Err(e.into()),
            }
        }
        ReminderAction::Off => match session.engine.configure_reminder(false, None).await {
            Ok(event) => print_json(&event),
            Err(e) => Err(e.into()),
        },
        ReminderAction::Status => status(&session),
    };
    session.close().await?;
    result
}

fn status(session: &Session) -> CliResult {
    let reminder = session.engine.reminder();
    let queued = session.db.notification(REMINDER_NOTIFICATION_ID)?;
    print_json(&json!({
        "enabled": reminder.enabled,
        "time": reminder.time.map(|t| t.to_string()),
        "next_fire_at": queued.as_ref().map(|n| n.fire_at.to_rfc3339()),
    }))
}
