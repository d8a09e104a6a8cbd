//! In-process notification center.
//!
//! Keeps pending requests in memory and decides the authorization outcome up
//! front. Used by the command-line binary and throughout the tests as the
//! stand-in for the device's notification service.

use super::center::{
    AuthorizationCallback, AuthorizationOptions, NotificationCenter, NotificationRequest,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Authorization state of the local center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// Not asked yet
    NotDetermined,
    /// User allowed notifications
    Authorized,
    /// User refused notifications
    Denied,
}

#[derive(Debug)]
struct State {
    status: AuthorizationStatus,
    pending: BTreeMap<String, NotificationRequest>,
}

/// Notification center that keeps everything in memory
#[derive(Debug)]
pub struct LocalNotificationCenter {
    grant: bool,
    state: Mutex<State>,
}

impl LocalNotificationCenter {
    /// A center whose authorization prompt resolves to `grant`
    #[must_use]
    pub const fn new(grant: bool) -> Self {
        Self {
            grant,
            state: Mutex::new(State {
                status: AuthorizationStatus::NotDetermined,
                pending: BTreeMap::new(),
            }),
        }
    }

    /// Current authorization state
    #[must_use]
    pub fn status(&self) -> AuthorizationStatus {
        self.lock().status
    }

    /// Pending requests ordered by identifier
    #[must_use]
    pub fn pending(&self) -> Vec<NotificationRequest> {
        self.lock().pending.values().cloned().collect()
    }

    /// Pending request with this identifier, if any
    #[must_use]
    pub fn pending_request(&self, identifier: &str) -> Option<NotificationRequest> {
        self.lock().pending.get(identifier).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NotificationCenter for LocalNotificationCenter {
    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCallback,
    ) {
        let status = if self.grant {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        debug!(?options, ?status, "Resolving authorization request");
        self.lock().status = status;
        completion(Ok(self.grant));
    }

    fn add(&self, request: NotificationRequest) {
        let mut state = self.lock();
        if state.status != AuthorizationStatus::Authorized {
            debug!(
                identifier = %request.identifier,
                status = ?state.status,
                "Dropping notification request without authorization"
            );
            return;
        }
        state.pending.insert(request.identifier.clone(), request);
    }

    fn remove_pending(&self, identifiers: &[String]) {
        let mut state = self.lock();
        for identifier in identifiers {
            state.pending.remove(identifier);
        }
    }

    fn remove_all_pending(&self) {
        self.lock().pending.clear();
    }
}
