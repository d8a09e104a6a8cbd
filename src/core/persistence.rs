//! Store persistence
//!
//! Loads and saves the whole [`PlantStore`] to `SQLite`. Plants live in the
//! `plants` table, ordered by `position`; the last-refreshed-date marker lives
//! in `system_state` under [`LAST_DAILY_REFRESH_KEY`]. Saving rewrites the
//! snapshot inside a single database transaction.

use crate::{
    core::{
        plant::{Plant, PlantId},
        store::{PlantStore, StoreSnapshot},
    },
    entities::{self, SystemState, plant, system_state},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// `system_state` key holding the last daily refresh date
pub const LAST_DAILY_REFRESH_KEY: &str = "last_daily_refresh";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Loads the store from the database.
///
/// # Errors
/// Returns an error if a query fails or a row holds an unknown attribute key.
#[instrument(skip(db))]
pub async fn load_store(db: &DatabaseConnection) -> Result<PlantStore> {
    let rows = entities::Plant::find()
        .order_by_asc(plant::Column::Position)
        .all(db)
        .await?;

    let plants = rows
        .into_iter()
        .map(Plant::try_from)
        .collect::<Result<Vec<_>>>()?;
    let last_refreshed = get_last_refresh_date(db).await?;

    debug!("Loaded {} plants, last refreshed {:?}", plants.len(), last_refreshed);
    PlantStore::from_snapshot(StoreSnapshot {
        plants,
        last_refreshed,
    })
}

/// Writes the full store snapshot, replacing what was stored before.
///
/// All rows are written in one transaction: either the whole snapshot is
/// stored or nothing changes.
#[instrument(skip(db, store), fields(plants = store.len()))]
pub async fn save_store(db: &DatabaseConnection, store: &PlantStore) -> Result<()> {
    let txn = db.begin().await?;

    entities::Plant::delete_many().exec(&txn).await?;
    for (position, record) in store.plants().iter().enumerate() {
        to_active_model(record, position)?.insert(&txn).await?;
    }

    if let Some(date) = store.last_refreshed() {
        set_last_refresh_date(&txn, date).await?;
    }

    txn.commit().await?;
    info!("Saved {} plants.", store.len());
    Ok(())
}

/// Retrieves the date of the last daily refresh from the `system_state` table.
///
/// # Returns
/// * `Ok(Some(date))` - Last refresh date if it exists
/// * `Ok(None)` - Never refreshed
pub async fn get_last_refresh_date<C>(db: &C) -> Result<Option<NaiveDate>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_DAILY_REFRESH_KEY))
        .one(db)
        .await?;

    state
        .map(|s| {
            NaiveDate::parse_from_str(&s.value, DATE_FORMAT).map_err(|e| Error::Config {
                message: format!("Failed to parse last refresh date '{}': {e}", s.value),
            })
        })
        .transpose()
}

/// Upserts the last daily refresh date in the `system_state` table.
pub async fn set_last_refresh_date<C>(db: &C, date: NaiveDate) -> Result<()>
where
    C: ConnectionTrait,
{
    let date_str = date.format(DATE_FORMAT).to_string();
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_DAILY_REFRESH_KEY))
        .one(db)
        .await?;

    if let Some(state) = existing {
        if state.value == date_str {
            return Ok(());
        }
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(date_str);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(LAST_DAILY_REFRESH_KEY.to_string()),
            value: Set(date_str),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

fn to_active_model(record: &Plant, position: usize) -> Result<plant::ActiveModel> {
    let position = i32::try_from(position).map_err(|_| Error::Validation {
        message: format!("Too many plants to store ({position})"),
    })?;

    Ok(plant::ActiveModel {
        id: Set(record.id().to_string()),
        position: Set(position),
        name: Set(record.name.clone()),
        room: Set(record.room.as_str().to_string()),
        light: Set(record.light.as_str().to_string()),
        watering_days: Set(record.watering_days.as_str().to_string()),
        water: Set(record.water.as_str().to_string()),
        last_watered_at: Set(record.last_watered_at),
        previous_watered_at: Set(record.previous_watered_at),
        is_watered: Set(record.is_watered),
    })
}

impl TryFrom<plant::Model> for Plant {
    type Error = Error;

    fn try_from(row: plant::Model) -> Result<Self> {
        Ok(Self {
            id: row.id.parse::<PlantId>()?,
            name: row.name,
            room: row.room.parse()?,
            light: row.light.parse()?,
            watering_days: row.watering_days.parse()?,
            water: row.water.parse()?,
            last_watered_at: row.last_watered_at,
            is_watered: row.is_watered,
            previous_watered_at: row.previous_watered_at,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::plant::{PlantDraft, Room, WateringDays};
    use crate::test_utils::{at, basil_draft, setup_test_db};

    #[tokio::test]
    async fn test_load_empty_database() -> Result<()> {
        let db = setup_test_db().await?;

        let store = load_store(&db).await?;
        assert!(store.is_empty());
        assert!(store.last_refreshed().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let now = at(2025, 10, 27, 9);

        let mut store = PlantStore::new();
        store.refresh_daily_state(&now);
        let basil = store.add(basil_draft())?;
        store.add(PlantDraft {
            room: Room::LivingRoom,
            watering_days: WateringDays::EveryThreeDays,
            ..PlantDraft::named("Monstera")
        })?;
        store.add(PlantDraft::named("Aloe"))?;
        store.toggle_watered(basil.id(), &now)?;

        save_store(&db, &store).await?;
        let loaded = load_store(&db).await?;

        assert_eq!(loaded, store);
        let names: Vec<&str> = loaded.plants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Basil", "Monstera", "Aloe"]);
        assert!(loaded.get(basil.id()).unwrap().is_watered_today(&now));

        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_removed_plants() -> Result<()> {
        let db = setup_test_db().await?;

        let mut store = PlantStore::new();
        let basil = store.add(basil_draft())?;
        store.add(PlantDraft::named("Fern"))?;
        save_store(&db, &store).await?;

        store.remove(basil.id())?;
        save_store(&db, &store).await?;

        let loaded = load_store(&db).await?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.plants()[0].name, "Fern");

        Ok(())
    }

    #[tokio::test]
    async fn test_set_and_get_last_refresh_date() -> Result<()> {
        let db = setup_test_db().await?;

        let first = NaiveDate::from_ymd_opt(2025, 10, 26).unwrap();
        set_last_refresh_date(&db, first).await?;
        let second = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap();
        set_last_refresh_date(&db, second).await?;

        assert_eq!(get_last_refresh_date(&db).await?, Some(second));

        let count = SystemState::find()
            .filter(system_state::Column::Key.eq(LAST_DAILY_REFRESH_KEY))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_room() -> Result<()> {
        let db = setup_test_db().await?;

        let mut store = PlantStore::new();
        let basil = store.add(basil_draft())?;
        save_store(&db, &store).await?;

        let row = entities::Plant::find_by_id(basil.id().to_string())
            .one(&db)
            .await?
            .unwrap();
        let mut active_model: plant::ActiveModel = row.into();
        active_model.room = Set("greenhouse".to_string());
        active_model.update(&db).await?;

        let result = load_store(&db).await;
        assert!(matches!(
            result,
            Err(Error::InvalidAttribute { kind: "Room", .. })
        ));

        Ok(())
    }
}
