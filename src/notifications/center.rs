//! Platform notification service contract.
//!
//! [`NotificationCenter`] is the seam between the reminder scheduler and
//! whatever delivers local alerts on the device. Requests are keyed by
//! identifier: adding a request with an existing identifier replaces it.

use crate::errors::Error;
use std::time::Duration;

/// What the user sees when the alert fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    /// Alert title
    pub title: String,
    /// Alert body
    pub body: String,
    /// Play the default sound
    pub sound: bool,
}

/// When the alert fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// After a delay from the moment the request is added
    Interval {
        /// Delay before firing
        after: Duration,
        /// Fire again every `after`
        repeats: bool,
    },
    /// At a wall-clock time
    Calendar {
        /// Hour (0-23)
        hour: u32,
        /// Minute (0-59)
        minute: u32,
        /// Fire every day at this time
        repeats: bool,
    },
}

/// A pending alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Key used for replacement and cancellation
    pub identifier: String,
    /// Alert content
    pub content: NotificationContent,
    /// Firing schedule
    pub trigger: Trigger,
}

/// Permissions asked for at launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    /// Show banners
    pub alert: bool,
    /// Update the app badge
    pub badge: bool,
    /// Play sounds
    pub sound: bool,
}

impl Default for AuthorizationOptions {
    fn default() -> Self {
        Self {
            alert: true,
            badge: true,
            sound: true,
        }
    }
}

/// One-shot completion for an authorization request: granted or not, or a platform error
pub type AuthorizationCallback = Box<dyn FnOnce(Result<bool, Error>) + Send + 'static>;

/// Local notification service provided by the platform.
///
/// Every method returns immediately. Delivery is the platform's business; a
/// request added without authorization is accepted and silently never fires.
pub trait NotificationCenter: Send + Sync {
    /// Asks the user for permission. `completion` runs once, whenever the platform decides.
    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCallback,
    );

    /// Adds or replaces the pending request with the same identifier
    fn add(&self, request: NotificationRequest);

    /// Removes pending requests by identifier; unknown identifiers are ignored
    fn remove_pending(&self, identifiers: &[String]);

    /// Removes every pending request of this application
    fn remove_all_pending(&self);
}
