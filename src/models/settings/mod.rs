// Settings module
// Grid configuration, fixed for the lifetime of a grid

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::appointment::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

/// Grid configuration persisted as TOML.
///
/// Missing keys fall back to the reference configuration: 15 minute slots
/// from 08:00 to 18:00, resize snapped to 5 minutes, Monday-first weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub day_start: String,
    pub day_end: String,
    pub slot_minutes: u32,
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    pub resize_snap_minutes: u32,
    pub default_duration_minutes: u32,
    /// 0 = Sunday, 1 = Monday, etc.
    pub first_day_of_week: u8,
    pub cell_width: f32,
    pub cell_height: f32,
    pub header_height: f32,
    pub label_column_width: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            day_start: "08:00".to_string(),
            day_end: "18:00".to_string(),
            slot_minutes: 15,
            min_duration_minutes: MIN_DURATION_MINUTES,
            max_duration_minutes: MAX_DURATION_MINUTES,
            resize_snap_minutes: 5,
            default_duration_minutes: 30,
            first_day_of_week: 1,
            cell_width: 120.0,
            cell_height: 24.0,
            header_height: 32.0,
            label_column_width: 56.0,
        }
    }
}

impl GridSettings {
    pub fn start_time(&self) -> Result<NaiveTime, String> {
        parse_clock(&self.day_start)
    }

    pub fn end_time(&self) -> Result<NaiveTime, String> {
        parse_clock(&self.day_end)
    }

    /// Validate ranges and the slot lattice.
    pub fn validate(&self) -> Result<(), String> {
        let start = self.start_time()?;
        let end = self.end_time()?;

        if end <= start {
            return Err("Grid end time must be after start time".to_string());
        }

        if self.slot_minutes == 0 {
            return Err("Slot size must be at least one minute".to_string());
        }

        let window = (end - start).num_minutes();
        if window % self.slot_minutes as i64 != 0 {
            return Err(format!(
                "Slot size of {} minutes does not divide the {} minute day",
                self.slot_minutes, window
            ));
        }

        if self.min_duration_minutes == 0 || self.min_duration_minutes > self.max_duration_minutes {
            return Err("Minimum duration must be positive and not exceed the maximum".to_string());
        }

        if self.resize_snap_minutes == 0 {
            return Err("Resize snap must be at least one minute".to_string());
        }

        if self.default_duration_minutes < self.min_duration_minutes
            || self.default_duration_minutes > self.max_duration_minutes
        {
            return Err("Default duration must lie between the minimum and maximum".to_string());
        }

        if self.first_day_of_week > 6 {
            return Err("First day of week must be between 0 (Sunday) and 6".to_string());
        }

        let geometry = [
            self.cell_width,
            self.cell_height,
            self.header_height,
            self.label_column_width,
        ];
        if geometry.iter().any(|v| !v.is_finite() || *v < 0.0)
            || self.cell_width <= 0.0
            || self.cell_height <= 0.0
        {
            return Err("Cell geometry must be positive".to_string());
        }

        Ok(())
    }
}

fn parse_clock(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", value))
}
