//! Plant store - the ordered plant collection and everything derived from it.
//!
//! The store is a plain owned value. Reads hand out clones or shared references,
//! writes go through the mutation methods below. Derived state (progress,
//! "all done") is recomputed on every call from the supplied `now`; the only
//! cached piece of time is the last-refreshed calendar date used to detect
//! day rollover.

use crate::{
    core::plant::{Plant, PlantDraft, PlantId, normalized_name},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

/// Durable representation of a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Plants in display order
    pub plants: Vec<Plant>,
    /// Calendar date of the last daily refresh
    pub last_refreshed: Option<NaiveDate>,
}

/// Summary of a daily refresh that crossed a day boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRefresh {
    /// The new current day
    pub date: NaiveDate,
    /// Records whose watered flag was cleared
    pub reset_count: usize,
    /// Records in the store at refresh time
    pub total_plants: usize,
}

/// Watered and total counts behind the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Plants watered today
    pub watered: usize,
    /// All plants
    pub total: usize,
}

impl Progress {
    /// Non-empty and everything watered
    #[must_use]
    pub const fn is_all_done(&self) -> bool {
        self.total > 0 && self.watered == self.total
    }

    /// Watered fraction in `[0, 1]`, zero for an empty store
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.watered as f64 / self.total as f64
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            f.write_str("No plants yet")
        } else if self.is_all_done() {
            f.write_str("All reminders completed")
        } else if self.watered == 0 {
            write!(f, "Your plants are waiting for a sip: 0 of {} watered", self.total)
        } else {
            write!(f, "{} of {} plants watered", self.watered, self.total)
        }
    }
}

/// Owns the plant records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantStore {
    plants: Vec<Plant>,
    last_refreshed: Option<NaiveDate>,
}

impl PlantStore {
    /// An empty store that has never been refreshed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted state, rejecting duplicate identifiers.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut seen = HashSet::with_capacity(snapshot.plants.len());
        for plant in &snapshot.plants {
            if !seen.insert(plant.id) {
                return Err(Error::DuplicatePlant { id: plant.id });
            }
        }
        Ok(Self {
            plants: snapshot.plants,
            last_refreshed: snapshot.last_refreshed,
        })
    }

    /// Copies the current state into its durable form
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            plants: self.plants.clone(),
            last_refreshed: self.last_refreshed,
        }
    }

    /// Plants in insertion order
    #[must_use]
    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    /// Looks up a plant by identifier
    #[must_use]
    pub fn get(&self, id: PlantId) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id == id)
    }

    /// Number of plants
    #[must_use]
    pub fn len(&self) -> usize {
        self.plants.len()
    }

    /// Whether there are no plants yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Calendar date of the last refresh that crossed a day boundary
    #[must_use]
    pub const fn last_refreshed(&self) -> Option<NaiveDate> {
        self.last_refreshed
    }

    /// Appends a new, unwatered plant with a fresh identifier.
    ///
    /// Blank names are rejected with [`Error::Validation`] and leave the store untouched.
    pub fn add(&mut self, draft: PlantDraft) -> Result<Plant> {
        let plant = Plant::from_draft(self.fresh_id(), draft)?;
        self.plants.push(plant.clone());
        Ok(plant)
    }

    /// Replaces the record with the same identifier.
    ///
    /// Watering state is owned by [`Self::toggle_watered`] and
    /// [`Self::refresh_daily_state`], so the stored values win over the
    /// record's.
    pub fn update(&mut self, mut record: Plant) -> Result<()> {
        record.name = normalized_name(&record.name)?;
        let slot = self.slot_mut(record.id)?;
        record.is_watered = slot.is_watered;
        record.last_watered_at = slot.last_watered_at;
        record.previous_watered_at = slot.previous_watered_at;
        *slot = record;
        Ok(())
    }

    /// Replaces name and care attributes, keeping identity and watering state.
    pub fn edit(&mut self, id: PlantId, draft: PlantDraft) -> Result<Plant> {
        let name = normalized_name(&draft.name)?;
        let slot = self.slot_mut(id)?;
        slot.name = name;
        slot.room = draft.room;
        slot.light = draft.light;
        slot.watering_days = draft.watering_days;
        slot.water = draft.water;
        Ok(slot.clone())
    }

    /// Deletes a plant and returns it.
    pub fn remove(&mut self, id: PlantId) -> Result<Plant> {
        let index = self
            .plants
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::PlantNotFound { id })?;
        Ok(self.plants.remove(index))
    }

    /// Flips "watered today": waters an unwatered plant, or undoes today's watering.
    ///
    /// Undo restores the timestamp the watering replaced, so two toggles on the
    /// same day leave the record exactly as it was.
    pub fn toggle_watered<Tz: TimeZone>(
        &mut self,
        id: PlantId,
        now: &DateTime<Tz>,
    ) -> Result<Plant> {
        let slot = self.slot_mut(id)?;
        if slot.is_watered_today(now) {
            slot.unmark_watered();
        } else {
            slot.mark_watered(now.with_timezone(&Utc));
        }
        Ok(slot.clone())
    }

    /// Clears stale watered flags when `now` falls on a later calendar day than the
    /// last refresh. Returns `None` when the day has not advanced.
    pub fn refresh_daily_state<Tz: TimeZone>(
        &mut self,
        now: &DateTime<Tz>,
    ) -> Option<DailyRefresh> {
        let today = now.date_naive();
        if self.last_refreshed.is_some_and(|last| today <= last) {
            return None;
        }

        let mut reset_count = 0;
        for plant in &mut self.plants {
            if plant.is_watered && !plant.is_watered_today(now) {
                plant.is_watered = false;
                plant.previous_watered_at = None;
                reset_count += 1;
            }
        }
        self.last_refreshed = Some(today);

        Some(DailyRefresh {
            date: today,
            reset_count,
            total_plants: self.plants.len(),
        })
    }

    /// Watered and total counts for `now`'s day
    #[must_use]
    pub fn progress<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Progress {
        Progress {
            watered: self.plants.iter().filter(|p| p.is_watered_today(now)).count(),
            total: self.plants.len(),
        }
    }

    /// True iff the store is non-empty and every plant is watered today
    #[must_use]
    pub fn is_all_done<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.progress(now).is_all_done()
    }

    /// Watered fraction in `[0, 1]`
    #[must_use]
    pub fn progress_value<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> f64 {
        self.progress(now).fraction()
    }

    /// Short summary for the progress header
    #[must_use]
    pub fn status_line<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        self.progress(now).to_string()
    }

    /// Plants whose watering policy calls for water today
    #[must_use]
    pub fn due_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<&Plant> {
        self.plants.iter().filter(|p| p.is_due(now)).collect()
    }

    fn slot_mut(&mut self, id: PlantId) -> Result<&mut Plant> {
        self.plants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::PlantNotFound { id })
    }

    fn fresh_id(&self) -> PlantId {
        loop {
            let id = PlantId::generate();
            if self.get(id).is_none() {
                return id;
            }
        }
    }
}
