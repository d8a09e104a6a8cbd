//! Plant entity - one row per tracked plant.
//!
//! Attribute enums are stored as their stable string keys and `position`
//! keeps the display order of the in-memory store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Plant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plants")]
pub struct Model {
    /// UUID of the plant, as text
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Zero-based display position
    pub position: i32,
    /// Display name
    pub name: String,
    /// Room key (e.g. `"kitchen"`)
    pub room: String,
    /// Light key (e.g. `"full_sun"`)
    pub light: String,
    /// Watering policy key (e.g. `"every_3_days"`)
    pub watering_days: String,
    /// Water amount key (e.g. `"ml_20_to_50"`)
    pub water: String,
    /// Last confirmed watering
    pub last_watered_at: Option<DateTimeUtc>,
    /// Timestamp restored when today's watering is undone
    pub previous_watered_at: Option<DateTimeUtc>,
    /// Watered in the current daily cycle
    pub is_watered: bool,
}

/// Plants have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
