//! Database configuration for `PlantBuddy`.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs.

use crate::entities::{Plant, SystemState};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/plant_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Connects to the configured database and makes sure all tables exist.
#[instrument]
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    let db = Database::connect(&database_url).await?;
    create_tables(&db).await?;
    info!("Database ready.");
    Ok(db)
}

/// Creates the `plants` and `system_state` tables if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut plant_table = schema.create_table_from_entity(Plant);
    let mut system_state_table = schema.create_table_from_entity(SystemState);

    plant_table.if_not_exists();
    system_state_table.if_not_exists();

    db.execute(builder.build(&plant_table)).await?;
    db.execute(builder.build(&system_state_table)).await?;

    Ok(())
}
