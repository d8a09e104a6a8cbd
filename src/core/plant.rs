//! Plant record - one tracked plant, its care attributes and watering state.
//!
//! Records are plain values. Callers read clones out of the store and hand
//! modified copies back; the watering fields are only flipped by the store.
//! Calendar days are always taken in the time zone of the `now` argument.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Declares a closed attribute enum with a persistence key and a display title per variant.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal, $title:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $key)] $variant, )+
        }

        impl $name {
            /// Every variant, in form order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable key used in the database and in `config.toml`
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $key, )+
                }
            }

            /// Human-readable label
            #[must_use]
            pub const fn title(self) -> &'static str {
                match self {
                    $( Self::$variant => $title, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.title())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $( $key => Ok(Self::$variant), )+
                    other => Err(Error::InvalidAttribute {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

labelled_enum! {
    /// Where the plant lives
    #[derive(Default)]
    Room {
        /// Bedroom
        #[default]
        Bedroom => "bedroom", "Bedroom";
        /// Living room
        LivingRoom => "living_room", "Living Room";
        /// Kitchen
        Kitchen => "kitchen", "Kitchen";
        /// Balcony
        Balcony => "balcony", "Balcony";
        /// Bathroom
        Bathroom => "bathroom", "Bathroom";
    }
}

labelled_enum! {
    /// How much light the plant needs
    #[derive(Default)]
    Light {
        /// Direct sun most of the day
        #[default]
        FullSun => "full_sun", "Full sun";
        /// A few hours of sun
        PartialSun => "partial_sun", "Partial sun";
        /// Shade or indirect light
        LowLight => "low_light", "Low light";
    }
}

labelled_enum! {
    /// Watering frequency policy
    #[derive(Default)]
    WateringDays {
        /// Every day
        #[default]
        EveryDay => "every_day", "Every day";
        /// Every second day
        EveryTwoDays => "every_2_days", "Every 2 days";
        /// Every third day
        EveryThreeDays => "every_3_days", "Every 3 days";
        /// Once a week
        OnceAWeek => "once_a_week", "Once a week";
        /// Every ten days
        EveryTenDays => "every_10_days", "Every 10 days";
        /// Every two weeks
        EveryTwoWeeks => "every_2_weeks", "Every 2 weeks";
    }
}

labelled_enum! {
    /// Water amount per watering. A label, not a measurement.
    #[derive(Default)]
    Water {
        /// 20 to 50 ml
        #[default]
        Ml20To50 => "ml_20_to_50", "20-50 ml";
        /// 50 to 100 ml
        Ml50To100 => "ml_50_to_100", "50-100 ml";
        /// 100 to 200 ml
        Ml100To200 => "ml_100_to_200", "100-200 ml";
        /// 200 to 300 ml
        Ml200To300 => "ml_200_to_300", "200-300 ml";
    }
}

impl WateringDays {
    /// Days between two due days
    #[must_use]
    pub const fn interval_days(self) -> u32 {
        match self {
            Self::EveryDay => 1,
            Self::EveryTwoDays => 2,
            Self::EveryThreeDays => 3,
            Self::OnceAWeek => 7,
            Self::EveryTenDays => 10,
            Self::EveryTwoWeeks => 14,
        }
    }

    /// Whether `today` is a due day given the last day the plant was watered.
    /// A plant that was never watered is always due.
    #[must_use]
    pub fn is_due(self, last_watered: Option<NaiveDate>, today: NaiveDate) -> bool {
        last_watered.is_none_or(|last| {
            today.signed_duration_since(last).num_days() >= i64::from(self.interval_days())
        })
    }
}

/// Unique plant identifier, assigned by the store and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(Uuid);

impl PlantId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlantId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s).map(Self).map_err(|_| Error::InvalidAttribute {
            kind: "PlantId",
            value: s.to_string(),
        })
    }
}

/// Add/edit form payload. Defaults mirror a blank form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantDraft {
    /// Display name
    pub name: String,
    /// Location
    #[serde(default)]
    pub room: Room,
    /// Light requirement
    #[serde(default)]
    pub light: Light,
    /// Watering frequency
    #[serde(default)]
    pub watering_days: WateringDays,
    /// Water amount
    #[serde(default)]
    pub water: Water,
}

impl PlantDraft {
    /// Starts a draft with the given name and default attributes
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One tracked plant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub(crate) id: PlantId,
    /// Display name, never empty
    pub name: String,
    /// Location
    pub room: Room,
    /// Light requirement
    pub light: Light,
    /// Watering frequency
    pub watering_days: WateringDays,
    /// Water amount
    pub water: Water,
    /// Last confirmed watering, `None` if never watered
    pub last_watered_at: Option<DateTime<Utc>>,
    /// Watered as of the most recent daily cycle
    pub is_watered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) previous_watered_at: Option<DateTime<Utc>>,
}

impl Plant {
    pub(crate) fn from_draft(id: PlantId, draft: PlantDraft) -> Result<Self> {
        Ok(Self {
            id,
            name: normalized_name(&draft.name)?,
            room: draft.room,
            light: draft.light,
            watering_days: draft.watering_days,
            water: draft.water,
            last_watered_at: None,
            is_watered: false,
            previous_watered_at: None,
        })
    }

    /// Stable identifier
    #[must_use]
    pub const fn id(&self) -> PlantId {
        self.id
    }

    /// Care attributes as a form draft, for prefilling an edit form
    #[must_use]
    pub fn draft(&self) -> PlantDraft {
        PlantDraft {
            name: self.name.clone(),
            room: self.room,
            light: self.light,
            watering_days: self.watering_days,
            water: self.water,
        }
    }

    /// Calendar day of the last watering, seen from `tz`
    #[must_use]
    pub fn last_watered_day<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.last_watered_at
            .map(|at| at.with_timezone(tz).date_naive())
    }

    /// True iff flagged as watered and the last watering falls on `now`'s calendar day
    #[must_use]
    pub fn is_watered_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.is_watered && self.last_watered_day(&now.timezone()) == Some(now.date_naive())
    }

    /// Whether the watering policy calls for water on `now`'s calendar day
    #[must_use]
    pub fn is_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.watering_days
            .is_due(self.last_watered_day(&now.timezone()), now.date_naive())
    }

    pub(crate) fn mark_watered(&mut self, at: DateTime<Utc>) {
        self.previous_watered_at = self.last_watered_at;
        self.last_watered_at = Some(at);
        self.is_watered = true;
    }

    pub(crate) fn unmark_watered(&mut self) {
        self.last_watered_at = self.previous_watered_at.take();
        self.is_watered = false;
    }
}

/// Trims a plant name and rejects empty or whitespace-only input.
pub(crate) fn normalized_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: "Plant name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
