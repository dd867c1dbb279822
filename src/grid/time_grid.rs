//! Slot lattice of the grid and slot ↔ clock conversions.
//!
//! Every other grid module asks this one how many rows exist and how many rows
//! a duration covers, so rendering height and collision checks always agree.

use chrono::{NaiveTime, Timelike};

use super::error::GridError;
use crate::models::settings::GridSettings;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Fixed slot lattice for a single day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    /// Minutes since midnight of slot 0
    start_minute: u32,
    slot_minutes: u32,
    slot_count: usize,
}

impl TimeGrid {
    /// Build a grid covering `[start, end)` in `slot_minutes` steps.
    pub fn new(start: NaiveTime, end: NaiveTime, slot_minutes: u32) -> Result<Self, GridError> {
        if slot_minutes == 0 {
            return Err(GridError::InvalidConfig(
                "slot size must be at least one minute".to_string(),
            ));
        }
        if end <= start {
            return Err(GridError::InvalidConfig(
                "end time must be after start time".to_string(),
            ));
        }

        let start_minute = start.num_seconds_from_midnight() / 60;
        let end_minute = end.num_seconds_from_midnight() / 60;
        let window = end_minute - start_minute;
        if window % slot_minutes != 0 {
            return Err(GridError::InvalidConfig(format!(
                "{} minute slots do not divide a {} minute day",
                slot_minutes, window
            )));
        }

        Ok(Self {
            start_minute,
            slot_minutes,
            slot_count: (window / slot_minutes) as usize,
        })
    }

    pub fn from_settings(settings: &GridSettings) -> Result<Self, GridError> {
        settings.validate().map_err(GridError::InvalidConfig)?;
        let start = settings.start_time().map_err(GridError::InvalidConfig)?;
        let end = settings.end_time().map_err(GridError::InvalidConfig)?;
        Self::new(start, end, settings.slot_minutes)
    }

    /// 08:00–18:00 in 15 minute slots (40 rows).
    pub fn reference() -> Self {
        Self {
            start_minute: 8 * 60,
            slot_minutes: 15,
            slot_count: 40,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn contains_slot(&self, slot: usize) -> bool {
        slot < self.slot_count
    }

    /// Minutes since midnight at which `slot` begins (may exceed one day for
    /// slots past the end of the grid).
    pub fn slot_start_minute(&self, slot: usize) -> i64 {
        self.start_minute as i64 + slot as i64 * self.slot_minutes as i64
    }

    pub fn slot_start_time(&self, slot: usize) -> NaiveTime {
        let minute = self.slot_start_minute(slot).rem_euclid(MINUTES_PER_DAY);
        NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    pub fn slot_to_label(&self, slot: usize) -> String {
        format_minutes(self.slot_start_minute(slot))
    }

    /// Add `minutes` to an "HH:MM" label, wrapping around midnight.
    ///
    /// A label that does not parse is returned unchanged.
    pub fn add_minutes(label: &str, minutes: i64) -> String {
        match NaiveTime::parse_from_str(label.trim(), "%H:%M") {
            Ok(time) => {
                let base = (time.num_seconds_from_midnight() / 60) as i64;
                format_minutes(base + minutes)
            }
            Err(_) => {
                log::warn!("Cannot add minutes to malformed time label '{}'", label);
                label.to_string()
            }
        }
    }

    /// Number of rows a duration covers: `max(1, round(minutes / slot))`.
    ///
    /// Halves round up, so at 15 minute slots 22 minutes is one row and 23 is two.
    pub fn slots_for_duration(&self, duration_minutes: u32) -> usize {
        let slot = self.slot_minutes as u64;
        let rounded = (duration_minutes as u64 + slot / 2) / slot;
        rounded.max(1) as usize
    }

    /// "HH:MM" at which an appointment starting at `start_slot` ends.
    pub fn end_label(&self, start_slot: usize, duration_minutes: u32) -> String {
        Self::add_minutes(&self.slot_to_label(start_slot), duration_minutes as i64)
    }

    /// The slot containing `time`, or `None` outside the grid window.
    pub fn slot_for_time(&self, time: NaiveTime) -> Option<usize> {
        let minute = (time.num_seconds_from_midnight() / 60) as i64;
        let offset = minute - self.start_minute as i64;
        if offset < 0 {
            return None;
        }
        let slot = (offset / self.slot_minutes as i64) as usize;
        self.contains_slot(slot).then_some(slot)
    }
}

fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
