use chrono::{NaiveDate, NaiveTime};
use rusqlite::{self, Row};

use crate::grid::TimeGrid;
use crate::models::appointment::Appointment;

pub(crate) const DAY_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M";

pub(crate) const SELECT_COLUMNS: &str =
    "SELECT id, day, start_time, duration_minutes, label, color FROM appointments";

/// Raw row before the start time has been mapped onto the grid.
pub(crate) struct AppointmentRow {
    pub id: i64,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: u32,
    pub label: String,
    pub color: Option<String>,
}

impl AppointmentRow {
    /// `None` when the start time falls outside the grid window.
    pub fn into_appointment(self, grid: &TimeGrid) -> Option<Appointment> {
        let Some(start_slot) = grid.slot_for_time(self.start_time) else {
            log::warn!(
                "Skipping appointment {}: {} is outside the grid window",
                self.id,
                self.start_time.format(TIME_FORMAT)
            );
            return None;
        };

        Some(Appointment {
            id: Some(self.id),
            day: self.day,
            start_slot,
            duration_minutes: self.duration_minutes,
            label: self.label,
            color: self.color,
        })
    }
}

pub(crate) fn map_appointment_row(row: &Row) -> rusqlite::Result<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get(0)?,
        day: parse_day(row.get::<_, String>(1)?)?,
        start_time: parse_time(row.get::<_, String>(2)?)?,
        duration_minutes: row.get(3)?,
        label: row.get(4)?,
        color: row.get(5)?,
    })
}

pub(crate) fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub(crate) fn format_slot(grid: &TimeGrid, slot: usize) -> String {
    grid.slot_start_time(slot).format(TIME_FORMAT).to_string()
}

fn parse_day(value: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, DAY_FORMAT)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn parse_time(value: String) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(&value, TIME_FORMAT)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
