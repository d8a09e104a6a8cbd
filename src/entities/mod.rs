//! Entity module - `SeaORM` entity definitions for the plant database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod plant;
pub mod system_state;

pub use plant::{Column as PlantColumn, Entity as Plant, Model as PlantModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
