//! Core business logic - framework-agnostic plant records, the plant store,
//! and its persistence.

/// Store persistence through `SeaORM`
pub mod persistence;
/// Plant record and its attribute enums
pub mod plant;
/// The ordered plant collection and derived daily state
pub mod store;

pub use plant::{Light, Plant, PlantDraft, PlantId, Room, Water, WateringDays};
pub use store::{DailyRefresh, PlantStore, Progress, StoreSnapshot};
