//! Time source for the application service.
//!
//! The store itself takes `now` as an argument; only [`crate::app::PlantBuddy`]
//! asks a [`Clock`], so tests can pin or advance the date.

use chrono::{DateTime, FixedOffset, Local};
use std::sync::{Mutex, PoisonError};

/// Provides the current time in the user's time zone
pub trait Clock: Send + Sync {
    /// Current time; its offset defines where calendar days begin
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    /// A clock stopped at `time`
    #[must_use]
    pub const fn new(time: DateTime<FixedOffset>) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Moves the clock to `time`
    pub fn set(&self, time: DateTime<FixedOffset>) {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
