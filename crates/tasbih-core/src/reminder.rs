//! Daily reminder contract.
//!
//! The engine never schedules anything itself. It computes the next fire
//! time for the configured time of day and hands it to a
//! [`ReminderScheduler`] supplied by the host platform.

use async_trait::async_trait;
use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReminderError, ValidationError};

/// Notification id reserved for the daily reminder.
pub const REMINDER_NOTIFICATION_ID: i64 = 7_001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTimeOfDay(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }

    fn as_naive(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    /// Parses `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTimeOfDay(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = h.parse().map_err(|_| invalid())?;
        let minute = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

/// Reminder preference. `time` only matters while `enabled` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub time: Option<TimeOfDay>,
}

/// Next local occurrence of `time` strictly after `now`.
pub fn next_fire_at(now: DateTime<Local>, time: TimeOfDay) -> Option<DateTime<Local>> {
    let naive_time = time.as_naive()?;
    let today = now.date_naive();
    for offset in 0..=2 {
        let day = today.checked_add_days(Days::new(offset))?;
        // Skips times that fall into a DST gap on that day.
        if let Some(candidate) = Local.from_local_datetime(&day.and_time(naive_time)).earliest() {
            if candidate > now {
                return Some(candidate);
            }
        }
    }
    None
}

/// Host platform notification scheduling.
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    async fn schedule(
        &self,
        id: i64,
        body: &str,
        fire_at: DateTime<Local>,
        enabled: bool,
    ) -> Result<(), ReminderError>;

    async fn cancel(&self, id: i64) -> Result<(), ReminderError>;
}

#[cfg(any(test, feature = "testing"))]
pub use recording::{RecordingScheduler, ScheduleCall};

#[cfg(any(test, feature = "testing"))]
mod recording {
    use async_trait::async_trait;
    use chrono::{DateTime, Local};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use super::ReminderScheduler;
    use crate::error::ReminderError;

    /// A call made to a [`RecordingScheduler`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum ScheduleCall {
        Scheduled {
            id: i64,
            body: String,
            fire_at: DateTime<Local>,
        },
        Cancelled {
            id: i64,
        },
    }

    /// Scheduler double that records calls and can be told to fail.
    #[derive(Default)]
    pub struct RecordingScheduler {
        calls: Mutex<Vec<ScheduleCall>>,
        fail: AtomicBool,
    }

    impl RecordingScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        fn calls_mut(&self) -> MutexGuard<'_, Vec<ScheduleCall>> {
            self.calls.lock().unwrap_or_else(PoisonError::into_inner)
        }

        pub fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn calls(&self) -> Vec<ScheduleCall> {
            self.calls_mut().clone()
        }
    }

    #[async_trait]
    impl ReminderScheduler for RecordingScheduler {
        async fn schedule(
            &self,
            id: i64,
            body: &str,
            fire_at: DateTime<Local>,
            _enabled: bool,
        ) -> Result<(), ReminderError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ReminderError::ScheduleFailed("permission denied".into()));
            }
            self.calls_mut().push(ScheduleCall::Scheduled {
                id,
                body: body.to_string(),
                fire_at,
            });
            Ok(())
        }

        async fn cancel(&self, id: i64) -> Result<(), ReminderError> {
            self.calls_mut().push(ScheduleCall::Cancelled { id });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_and_validates_time_of_day() {
        assert_eq!("05:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(5, 30).unwrap());
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
        assert_eq!(TimeOfDay::new(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn next_fire_is_later_today_or_tomorrow() {
        let now = Local.with_ymd_and_hms(2030, 6, 10, 12, 0, 0).unwrap();

        let later = next_fire_at(now, TimeOfDay::new(18, 15).unwrap()).unwrap();
        assert_eq!(later.date_naive(), now.date_naive());
        assert_eq!((later.hour(), later.minute()), (18, 15));

        let earlier = next_fire_at(now, TimeOfDay::new(6, 0).unwrap()).unwrap();
        assert_eq!(earlier.date_naive(), now.date_naive().succ_opt().unwrap());

        let exactly_now = next_fire_at(now, TimeOfDay::new(12, 0).unwrap()).unwrap();
        assert!(exactly_now > now);
    }
}
