//! Unified error type for `PlantBuddy`.
//!
//! Everything that can go wrong in the core (bad input, stale identifiers,
//! persistence failures) is a variant of [`Error`]. None of them is fatal:
//! callers report the error and keep using the store.

use crate::core::plant::PlantId;
use thiserror::Error;

/// Errors produced by the plant store, persistence, configuration and reminders.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Input rejected before any mutation took place
    #[error("Invalid plant: {message}")]
    Validation {
        /// Why the input was rejected
        message: String,
    },

    /// No plant with this identifier exists in the store
    #[error("Plant not found: {id}")]
    PlantNotFound {
        /// The stale identifier
        id: PlantId,
    },

    /// Two records share an identifier in a persisted snapshot
    #[error("Duplicate plant identifier: {id}")]
    DuplicatePlant {
        /// The repeated identifier
        id: PlantId,
    },

    /// An enum key (room, light, ...) that is not part of the closed set
    #[error("Invalid {kind} value: '{value}'")]
    InvalidAttribute {
        /// Attribute name, e.g. `Room`
        kind: &'static str,
        /// The rejected key
        value: String,
    },

    /// Wall-clock time outside 00:00-23:59
    #[error("Invalid reminder time {hour:02}:{minute:02}")]
    InvalidReminderTime {
        /// Requested hour
        hour: u32,
        /// Requested minute
        minute: u32,
    },

    /// Reported by the platform notification service
    #[error("Notification error: {message}")]
    Notification {
        /// Platform-provided description
        message: String,
    },

    /// `SeaORM` / `SQLite` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
