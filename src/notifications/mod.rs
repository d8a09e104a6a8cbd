//! Reminder scheduling on top of the platform notification service.
//!
//! [`ReminderScheduler`] turns "remind me in N seconds" and "remind me every
//! day at HH:MM" into [`NotificationRequest`]s. It never waits for the
//! platform: authorization results are only logged, and the plant store works
//! the same whether or not reminders are ever delivered.

/// Platform notification service contract
pub mod center;
/// In-memory notification center
pub mod local;

pub use center::{
    AuthorizationCallback, AuthorizationOptions, NotificationCenter, NotificationContent,
    NotificationRequest, Trigger,
};
pub use local::{AuthorizationStatus, LocalNotificationCenter};

use crate::errors::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Shortest delay for a one-shot reminder
pub const MIN_ONCE_DELAY: Duration = Duration::from_secs(5);

/// Identifier of the daily watering reminder
pub const DAILY_REMINDER_ID: &str = "daily.water.reminder";

/// Schedules and cancels local watering reminders
#[derive(Clone)]
pub struct ReminderScheduler {
    center: Arc<dyn NotificationCenter>,
}

impl ReminderScheduler {
    /// Wraps a notification center
    #[must_use]
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self { center }
    }

    /// Asks for notification permission. The outcome is logged and nothing else.
    pub fn request_authorization(&self) {
        self.center.request_authorization(
            AuthorizationOptions::default(),
            Box::new(|outcome| match outcome {
                Ok(true) => info!("Notifications granted."),
                Ok(false) => warn!("Notifications denied; reminders will not be delivered."),
                Err(e) => error!("Notification authorization error: {}", e),
            }),
        );
    }

    /// Schedules a one-shot reminder at least [`MIN_ONCE_DELAY`] from now.
    ///
    /// A fresh UUID is used when `identifier` is `None`. Returns the identifier
    /// the request was filed under.
    pub fn schedule_once(
        &self,
        after: Duration,
        title: &str,
        body: &str,
        identifier: Option<&str>,
    ) -> String {
        let identifier = identifier.map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        let after = after.max(MIN_ONCE_DELAY);
        debug!(%identifier, ?after, "Scheduling one-shot reminder");

        self.center.add(NotificationRequest {
            identifier: identifier.clone(),
            content: content(title, body),
            trigger: Trigger::Interval {
                after,
                repeats: false,
            },
        });
        identifier
    }

    /// Schedules a reminder every day at `hour:minute`, replacing any reminder
    /// with the same identifier ([`DAILY_REMINDER_ID`] when `None`).
    ///
    /// # Errors
    /// Returns [`Error::InvalidReminderTime`] for an hour above 23 or a minute above 59.
    pub fn schedule_daily(
        &self,
        hour: u32,
        minute: u32,
        title: &str,
        body: &str,
        identifier: Option<&str>,
    ) -> Result<String> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidReminderTime { hour, minute });
        }
        let identifier = identifier.unwrap_or(DAILY_REMINDER_ID).to_string();
        info!(%identifier, "Scheduling daily reminder at {:02}:{:02}", hour, minute);

        self.center.add(NotificationRequest {
            identifier: identifier.clone(),
            content: content(title, body),
            trigger: Trigger::Calendar {
                hour,
                minute,
                repeats: true,
            },
        });
        Ok(identifier)
    }

    /// Removes one pending reminder; unknown identifiers are ignored
    pub fn cancel(&self, identifier: &str) {
        debug!(%identifier, "Cancelling reminder");
        self.center.remove_pending(&[identifier.to_string()]);
    }

    /// Removes every pending reminder of this application
    pub fn cancel_all(&self) {
        info!("Cancelling all reminders");
        self.center.remove_all_pending();
    }
}

fn content(title: &str, body: &str) -> NotificationContent {
    NotificationContent {
        title: title.to_string(),
        body: body.to_string(),
        sound: true,
    }
}
