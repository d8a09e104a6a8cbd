use dotenvy::dotenv;
use plant_buddy::{
    PlantBuddy, Result,
    clock::SystemClock,
    config::{self, database},
    notifications::{LocalNotificationCenter, ReminderScheduler},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect to the database and ensure tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Launch: load, seed, refresh, schedule reminders
    let scheduler = ReminderScheduler::new(Arc::new(LocalNotificationCenter::new(true)));
    let app = PlantBuddy::launch(db, &app_config, scheduler, SystemClock).await?;

    let now = app.now();
    info!("{}", app.store().status_line(&now));
    for plant in app.store().plants() {
        let mark = if plant.is_watered_today(&now) { "x" } else { " " };
        let due = if plant.is_due(&now) { " (due)" } else { "" };
        println!(
            "[{mark}] {} in {} - {}, {}, {}{due}  {}",
            plant.name,
            plant.room,
            plant.light,
            plant.water,
            plant.watering_days,
            plant.id()
        );
    }

    Ok(())
}
