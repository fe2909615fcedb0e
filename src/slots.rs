//! Génération des créneaux d'une journée pour une équipe.

use crate::model::Slot;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("invalid time range: end must be after start")]
    InvalidTimeRange,
    #[error("invalid slot duration: {0} minutes (must be >= 1)")]
    InvalidDuration(i64),
}

/// Pause déjeuner : aucun créneau ne la chevauche.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunchBreak {
    pub start: NaiveTime,
    pub minutes: u32,
}

/// Paramètres validés d'une journée de créneaux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlan {
    day: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    duration: Duration,
    lunch: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl SlotPlan {
    /// Valide la plage horaire et la durée. Une pause de 0 minute est ignorée.
    pub fn new(
        day: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        slot_minutes: i64,
        lunch: Option<LunchBreak>,
    ) -> Result<Self, SlotError> {
        let duration = Duration::try_minutes(slot_minutes)
            .filter(|d| *d > Duration::zero())
            .ok_or(SlotError::InvalidDuration(slot_minutes))?;
        if end <= start {
            return Err(SlotError::InvalidTimeRange);
        }
        let lunch = lunch.filter(|l| l.minutes > 0).map(|l| {
            let from = day.and_time(l.start);
            (from, from + Duration::minutes(i64::from(l.minutes)))
        });
        Ok(Self {
            day,
            start,
            end,
            duration,
            lunch,
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Séquence paresseuse ; chaque appel repart du début.
    pub fn iter(&self) -> SlotIter {
        SlotIter {
            cursor: self.day.and_time(self.start),
            end: self.day.and_time(self.end),
            duration: self.duration,
            lunch: self.lunch,
        }
    }

    pub fn slots(&self) -> Vec<Slot> {
        self.iter().collect()
    }
}

impl IntoIterator for &SlotPlan {
    type Item = Slot;
    type IntoIter = SlotIter;

    fn into_iter(self) -> SlotIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SlotIter {
    cursor: NaiveDateTime,
    end: NaiveDateTime,
    duration: Duration,
    lunch: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl Iterator for SlotIter {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        let mut slot_end = self.cursor.checked_add_signed(self.duration)?;
        if let Some((lunch_start, lunch_end)) = self.lunch {
            // un créneau qui déborderait sur la pause est repoussé après elle
            if self.cursor < lunch_end && slot_end > lunch_start {
                self.cursor = lunch_end;
                slot_end = self.cursor.checked_add_signed(self.duration)?;
            }
        }
        if slot_end > self.end {
            return None;
        }
        let slot = Slot::new(self.cursor);
        self.cursor = slot_end;
        Some(slot)
    }
}

/// Raccourci : génère directement la liste des créneaux.
pub fn generate_slots(
    day: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    slot_minutes: i64,
    lunch: Option<LunchBreak>,
) -> Result<Vec<Slot>, SlotError> {
    Ok(SlotPlan::new(day, start, end, slot_minutes, lunch)?.slots())
}
