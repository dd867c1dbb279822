use super::shared::{format_day, map_appointment_row, SELECT_COLUMNS};
use super::AppointmentService;
use crate::grid::WeekColumns;
use crate::models::appointment::Appointment;
use anyhow::{Context, Result};

impl<'a> AppointmentService<'a> {
    /// Appointments on the displayed week, ordered by day then start.
    pub fn list_for_week(&self, columns: &WeekColumns) -> Result<Vec<Appointment>> {
        let query = format!(
            "{} WHERE day >= ?1 AND day <= ?2 ORDER BY day ASC, start_time ASC, id ASC",
            SELECT_COLUMNS
        );
        let mut stmt = self
            .conn
            .prepare(&query)
            .context("Failed to prepare week query")?;

        let rows = stmt
            .query_map(
                [format_day(columns.first()), format_day(columns.last())],
                map_appointment_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.into_appointment(&self.grid))
            .collect())
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))
            .context("Failed to count appointments")?;
        Ok(count)
    }
}
