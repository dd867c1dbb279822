// Placement module
// A proposed (day, start slot, duration) triple on the grid

use chrono::NaiveDate;

/// Where an appointment sits, or would sit, on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub day: NaiveDate,
    pub start_slot: usize,
    pub duration_minutes: u32,
}

impl Placement {
    pub fn new(day: NaiveDate, start_slot: usize, duration_minutes: u32) -> Self {
        Self {
            day,
            start_slot,
            duration_minutes,
        }
    }

    /// Same duration, different cell
    pub fn moved_to(self, day: NaiveDate, start_slot: usize) -> Self {
        Self {
            day,
            start_slot,
            ..self
        }
    }

    /// Same cell, different duration
    pub fn resized_to(self, duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            ..self
        }
    }
}

/// A single (day column, slot row) cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub day: usize,
    pub slot: usize,
}

impl GridCell {
    pub fn new(day: usize, slot: usize) -> Self {
        Self { day, slot }
    }
}
