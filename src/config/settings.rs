//! Application settings loaded from `config.toml`
//!
//! The file configures the daily watering reminder and an optional list of
//! plants used to seed an empty database on first launch. A missing file is
//! not an error: the defaults below apply.

use crate::core::plant::PlantDraft;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Reminder settings
    #[serde(default)]
    pub reminders: ReminderSettings,
    /// Plants to seed on first launch
    #[serde(default)]
    pub plants: Vec<PlantDraft>,
}

/// Daily and add-time reminder settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    /// Whether the daily reminder is scheduled at launch
    pub enabled: bool,
    /// Hour of the daily reminder (0-23)
    pub daily_hour: u32,
    /// Minute of the daily reminder (0-59)
    pub daily_minute: u32,
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
    /// Delay of the one-shot reminder scheduled when a plant is added, if any
    pub on_add_delay_seconds: Option<u64>,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_hour: 9,
            daily_minute: 0,
            title: "Planto".to_string(),
            body: "Time to water your plants 🌱".to_string(),
            on_add_delay_seconds: None,
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the application configuration from `PLANT_BUDDY_CONFIG` (default
/// `./config.toml`), falling back to defaults when the file does not exist.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("PLANT_BUDDY_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        info!("No configuration file at {}, using defaults.", path);
        return Ok(AppConfig::default());
    }

    let config = load_config(&path)?;
    info!(
        "Loaded configuration from {} ({} seed plants).",
        path,
        config.plants.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::plant::{Light, Room, Water, WateringDays};

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [reminders]
            enabled = true
            daily_hour = 18
            daily_minute = 30
            title = "Planto"
            body = "Evening watering"
            on_add_delay_seconds = 3600

            [[plants]]
            name = "Basil"
            room = "kitchen"
            light = "full_sun"
            watering_days = "every_day"
            water = "ml_20_to_50"

            [[plants]]
            name = "Cactus"
            watering_days = "every_2_weeks"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.reminders.daily_hour, 18);
        assert_eq!(config.reminders.daily_minute, 30);
        assert_eq!(config.reminders.on_add_delay_seconds, Some(3600));
        assert_eq!(config.plants.len(), 2);
        assert_eq!(config.plants[0].room, Room::Kitchen);
        assert_eq!(config.plants[1].watering_days, WateringDays::EveryTwoWeeks);
        assert_eq!(config.plants[1].room, Room::Bedroom);
        assert_eq!(config.plants[1].light, Light::FullSun);
        assert_eq!(config.plants[1].water, Water::Ml20To50);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.reminders.enabled);
        assert_eq!(config.reminders.daily_hour, 9);
    }

    #[test]
    fn test_unknown_room_is_config_error() {
        let toml_str = r#"
            [[plants]]
            name = "Fern"
            room = "garage"
        "#;
        assert!(matches!(parse_config(toml_str), Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
