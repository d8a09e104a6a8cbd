//! Application service - the single owned entry point for the presentation layer.
//!
//! [`PlantBuddy`] owns the plant store and keeps it in sync with the database
//! after every mutation. Reminders are scheduled on the side: a failing or
//! unauthorized notification service never fails a plant operation.

use crate::{
    clock::{Clock, SystemClock},
    config::{AppConfig, ReminderSettings},
    core::{
        persistence::{load_store, save_store},
        plant::{Plant, PlantDraft, PlantId},
        store::{DailyRefresh, PlantStore, Progress},
    },
    errors::{Error, Result},
    notifications::{DAILY_REMINDER_ID, ReminderScheduler},
};
use chrono::{DateTime, FixedOffset};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Plant store wired to persistence, reminders and a clock
pub struct PlantBuddy<C: Clock = SystemClock> {
    db: DatabaseConnection,
    store: PlantStore,
    scheduler: ReminderScheduler,
    clock: C,
    reminders: ReminderSettings,
}

impl<C: Clock> PlantBuddy<C> {
    /// Starts the application:
    ///
    /// 1. Loads the store from the database
    /// 2. Seeds the configured plants into a brand-new store
    /// 3. Runs the daily refresh and saves
    /// 4. Requests notification permission and schedules the daily reminder
    ///
    /// # Errors
    /// Fails on database errors or when a seed plant has a blank name.
    #[instrument(skip_all)]
    pub async fn launch(
        db: DatabaseConnection,
        config: &AppConfig,
        scheduler: ReminderScheduler,
        clock: C,
    ) -> Result<Self> {
        let mut store = load_store(&db).await?;

        if store.is_empty() && store.last_refreshed().is_none() && !config.plants.is_empty() {
            for draft in &config.plants {
                store.add(draft.clone()).map_err(|e| Error::Config {
                    message: format!("Invalid seed plant: {e}"),
                })?;
            }
            info!("Seeded {} plants from configuration.", store.len());
        }

        let now = clock.now();
        if let Some(refresh) = store.refresh_daily_state(&now) {
            log_refresh(&refresh);
        }
        save_store(&db, &store).await?;

        scheduler.request_authorization();
        let app = Self {
            db,
            store,
            scheduler,
            clock,
            reminders: config.reminders.clone(),
        };
        app.schedule_daily_reminder();

        info!("PlantBuddy ready with {} plants.", app.store.len());
        Ok(app)
    }

    /// Read access to the store
    #[must_use]
    pub const fn store(&self) -> &PlantStore {
        &self.store
    }

    /// The clock driving this instance
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Current time according to the clock
    #[must_use]
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Today's watered/total counts
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.store.progress(&self.now())
    }

    /// Re-evaluates day rollover; call on every foreground/activation event.
    #[instrument(skip(self))]
    pub async fn on_foreground(&mut self) -> Result<Option<DailyRefresh>> {
        let now = self.now();
        let mut next = self.store.clone();
        let refresh = next.refresh_daily_state(&now);
        if let Some(refresh) = &refresh {
            self.commit(next).await?;
            log_refresh(refresh);
        }
        Ok(refresh)
    }

    /// Adds a plant, saves, and schedules its add-time reminder if configured.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_plant(&mut self, draft: PlantDraft) -> Result<Plant> {
        let mut next = self.store.clone();
        let plant = next.add(draft)?;
        self.commit(next).await?;
        info!(id = %plant.id(), "Added plant '{}'", plant.name);

        if let Some(seconds) = self.reminders.on_add_delay_seconds {
            self.scheduler.schedule_once(
                Duration::from_secs(seconds),
                &self.reminders.title,
                &format!("Time to water {} 💧", plant.name),
                Some(&plant.id().to_string()),
            );
        }
        Ok(plant)
    }

    /// Replaces a plant's name and care attributes, keeping its watering state.
    #[instrument(skip(self, draft))]
    pub async fn edit_plant(&mut self, id: PlantId, draft: PlantDraft) -> Result<Plant> {
        let mut next = self.store.clone();
        let plant = next.edit(id, draft)?;
        self.commit(next).await?;
        Ok(plant)
    }

    /// Replaces a whole record.
    #[instrument(skip(self, record), fields(id = %record.id()))]
    pub async fn update_plant(&mut self, record: Plant) -> Result<()> {
        let mut next = self.store.clone();
        next.update(record)?;
        self.commit(next).await
    }

    /// Removes a plant and cancels its add-time reminder.
    #[instrument(skip(self))]
    pub async fn remove_plant(&mut self, id: PlantId) -> Result<Plant> {
        let mut next = self.store.clone();
        let plant = next.remove(id)?;
        self.commit(next).await?;
        self.scheduler.cancel(&id.to_string());
        info!("Removed plant '{}'", plant.name);
        Ok(plant)
    }

    /// Flips the plant's watered-today state.
    #[instrument(skip(self))]
    pub async fn toggle_watered(&mut self, id: PlantId) -> Result<Plant> {
        let now = self.now();
        let mut next = self.store.clone();
        let plant = next.toggle_watered(id, &now)?;
        self.commit(next).await?;
        if self.store.is_all_done(&now) {
            info!("All plants watered for {}", now.date_naive());
        }
        Ok(plant)
    }

    fn schedule_daily_reminder(&self) {
        if !self.reminders.enabled {
            self.scheduler.cancel(DAILY_REMINDER_ID);
            return;
        }
        if let Err(e) = self.scheduler.schedule_daily(
            self.reminders.daily_hour,
            self.reminders.daily_minute,
            &self.reminders.title,
            &self.reminders.body,
            None,
        ) {
            warn!("Daily reminder not scheduled: {}", e);
        }
    }

    /// Saves `next` and only then makes it the live store, so a failed save
    /// leaves memory matching the database.
    async fn commit(&mut self, next: PlantStore) -> Result<()> {
        save_store(&self.db, &next).await?;
        self.store = next;
        Ok(())
    }
}

fn log_refresh(refresh: &DailyRefresh) {
    info!(
        "New day {}: reset {} of {} plants.",
        refresh.date, refresh.reset_count, refresh.total_plants
    );
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::clock::FixedClock;
    use crate::notifications::{LocalNotificationCenter, Trigger};
    use crate::test_utils::{basil_draft, setup_test_db};
    use chrono::TimeZone;
    use sea_orm::ConnectionTrait;
    use std::sync::Arc;

    fn local_time(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 10, day, hour, 0, 0)
            .unwrap()
    }

    async fn launch_with(
        config: &AppConfig,
        grant: bool,
    ) -> Result<(PlantBuddy<FixedClock>, Arc<LocalNotificationCenter>)> {
        let db = setup_test_db().await?;
        let center = Arc::new(LocalNotificationCenter::new(grant));
        let scheduler = ReminderScheduler::new(center.clone());
        let app = PlantBuddy::launch(db, config, scheduler, FixedClock::new(local_time(27, 8)))
            .await?;
        Ok((app, center))
    }

    #[tokio::test]
    async fn test_launch_seeds_and_schedules_daily_reminder() -> Result<()> {
        let config = AppConfig {
            plants: vec![basil_draft(), PlantDraft::named("Fern")],
            ..AppConfig::default()
        };
        let (app, center) = launch_with(&config, true).await?;

        assert_eq!(app.store().len(), 2);
        assert_eq!(
            app.store().last_refreshed(),
            Some(local_time(27, 8).date_naive())
        );
        let daily = center.pending_request(DAILY_REMINDER_ID).unwrap();
        assert_eq!(
            daily.trigger,
            Trigger::Calendar {
                hour: 9,
                minute: 0,
                repeats: true
            }
        );

        let persisted = load_store(&app.db).await?;
        assert_eq!(&persisted, app.store());
        Ok(())
    }

    #[tokio::test]
    async fn test_launch_does_not_reseed_emptied_store() -> Result<()> {
        let db = setup_test_db().await?;
        let config = AppConfig {
            plants: vec![basil_draft()],
            ..AppConfig::default()
        };
        let scheduler = ReminderScheduler::new(Arc::new(LocalNotificationCenter::new(true)));

        let mut app =
            PlantBuddy::launch(db, &config, scheduler.clone(), FixedClock::new(local_time(27, 8)))
                .await?;
        let basil = app.store().plants()[0].id();
        app.remove_plant(basil).await?;

        let clock = FixedClock::new(local_time(28, 8));
        let relaunched = PlantBuddy::launch(app.db.clone(), &config, scheduler, clock).await?;
        assert!(relaunched.store().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_launch_rejects_blank_seed_plant() -> Result<()> {
        let config = AppConfig {
            plants: vec![PlantDraft::named(" ")],
            ..AppConfig::default()
        };
        let result = launch_with(&config, true).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_and_day_rollover() -> Result<()> {
        let (mut app, _) = launch_with(&AppConfig::default(), true).await?;
        let basil = app.add_plant(basil_draft()).await?;

        app.toggle_watered(basil.id()).await?;
        assert!(app.store().is_all_done(&app.now()));
        assert_eq!(app.progress(), Progress { watered: 1, total: 1 });

        app.clock().set(local_time(27, 20));
        assert!(app.on_foreground().await?.is_none());

        app.clock().set(local_time(28, 7));
        let refresh = app.on_foreground().await?.unwrap();
        assert_eq!(refresh.reset_count, 1);
        assert_eq!(app.store().progress_value(&app.now()), 0.0);

        let persisted = load_store(&app.db).await?;
        assert!(!persisted.get(basil.id()).unwrap().is_watered);
        assert_eq!(persisted.last_refreshed(), Some(local_time(28, 7).date_naive()));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_and_remove_manage_plant_reminder() -> Result<()> {
        let config = AppConfig {
            reminders: ReminderSettings {
                on_add_delay_seconds: Some(2),
                ..ReminderSettings::default()
            },
            ..AppConfig::default()
        };
        let (mut app, center) = launch_with(&config, true).await?;

        let basil = app.add_plant(basil_draft()).await?;
        let reminder = center.pending_request(&basil.id().to_string()).unwrap();
        assert!(reminder.content.body.contains("Basil"));
        assert!(matches!(
            reminder.trigger,
            Trigger::Interval { after, repeats: false } if after == Duration::from_secs(5)
        ));

        app.remove_plant(basil.id()).await?;
        assert!(center.pending_request(&basil.id().to_string()).is_none());
        assert!(center.pending_request(DAILY_REMINDER_ID).is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_denied_notifications_keep_store_usable() -> Result<()> {
        let (mut app, center) = launch_with(&AppConfig::default(), false).await?;

        let basil = app.add_plant(basil_draft()).await?;
        app.toggle_watered(basil.id()).await?;

        assert!(app.store().is_all_done(&app.now()));
        assert!(center.pending().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_disabled_daily_reminder_is_not_scheduled() -> Result<()> {
        let config = AppConfig {
            reminders: ReminderSettings {
                enabled: false,
                ..ReminderSettings::default()
            },
            ..AppConfig::default()
        };
        let (_app, center) = launch_with(&config, true).await?;
        assert!(center.pending_request(DAILY_REMINDER_ID).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_update_and_not_found() -> Result<()> {
        let (mut app, _) = launch_with(&AppConfig::default(), true).await?;
        let basil = app.add_plant(basil_draft()).await?;

        let edited = app
            .edit_plant(basil.id(), PlantDraft::named("Sweet Basil"))
            .await?;
        assert_eq!(edited.name, "Sweet Basil");

        let mut record = edited.clone();
        record.is_watered = false;
        record.name = "Genovese".to_string();
        app.update_plant(record).await?;
        assert_eq!(app.store().get(basil.id()).unwrap().name, "Genovese");

        app.remove_plant(basil.id()).await?;
        let result = app.toggle_watered(basil.id()).await;
        assert!(matches!(result, Err(Error::PlantNotFound { .. })));
        let result = app.remove_plant(basil.id()).await;
        assert!(matches!(result, Err(Error::PlantNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_leaves_store_unchanged() -> Result<()> {
        let (mut app, _) = launch_with(&AppConfig::default(), true).await?;
        let basil = app.add_plant(basil_draft()).await?;
        let before = app.store().clone();
        app.db.execute_unprepared("DROP TABLE plants").await?;

        assert!(app.add_plant(PlantDraft::named("Fern")).await.is_err());
        assert!(app.add_plant(PlantDraft::named("Fern")).await.is_err());
        assert!(app.toggle_watered(basil.id()).await.is_err());
        assert!(app.remove_plant(basil.id()).await.is_err());
        assert_eq!(app.store(), &before);

        app.clock().set(local_time(28, 7));
        assert!(app.on_foreground().await.is_err());
        assert_eq!(app.store(), &before);

        crate::config::database::create_tables(&app.db).await?;
        let refresh = app.on_foreground().await?.unwrap();
        assert_eq!(refresh.date, local_time(28, 7).date_naive());
        assert_eq!(load_store(&app.db).await?.len(), 1);
        Ok(())
    }
}
