//! Shared test utilities for `PlantBuddy`.
//!
//! Helpers for in-memory databases, fixed timestamps and common plant drafts.

use crate::{
    core::plant::{Light, PlantDraft, Room, Water, WateringDays},
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer tracing subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A UTC timestamp on the hour
#[allow(clippy::unwrap_used)]
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// Basil in the kitchen, full sun, every day, 20-50 ml
pub fn basil_draft() -> PlantDraft {
    PlantDraft {
        name: "Basil".to_string(),
        room: Room::Kitchen,
        light: Light::FullSun,
        watering_days: WateringDays::EveryDay,
        water: Water::Ml20To50,
    }
}
