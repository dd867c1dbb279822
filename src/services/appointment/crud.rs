use super::shared::{format_day, format_slot, map_appointment_row, SELECT_COLUMNS};
use super::AppointmentService;
use crate::grid::CommitRequest;
use crate::models::appointment::Appointment;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{self, params};

impl<'a> AppointmentService<'a> {
    /// Insert a new appointment and return it with its id.
    pub fn create(&self, mut appointment: Appointment) -> Result<Appointment> {
        self.check_storable(&appointment)?;

        self.conn
            .execute(
                "INSERT INTO appointments (day, start_time, duration_minutes, label, color)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    format_day(appointment.day),
                    format_slot(&self.grid, appointment.start_slot),
                    appointment.duration_minutes,
                    appointment.label,
                    appointment.color,
                ],
            )
            .context("Failed to insert appointment")?;

        appointment.id = Some(self.conn.last_insert_rowid());
        log::info!(
            "Created appointment {:?} '{}' on {}",
            appointment.id,
            appointment.label,
            appointment.day
        );
        Ok(appointment)
    }

    /// Retrieve an appointment by id. Rows outside the grid window read as `None`.
    pub fn get(&self, id: i64) -> Result<Option<Appointment>> {
        let query = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let result = self.conn.query_row(&query, [id], map_appointment_row);

        match result {
            Ok(row) => Ok(row.into_appointment(&self.grid)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite every field of a saved appointment.
    pub fn update(&self, appointment: &Appointment) -> Result<()> {
        let id = appointment
            .id
            .ok_or_else(|| anyhow!("Cannot update an appointment without an id"))?;
        self.check_storable(appointment)?;

        let rows = self
            .conn
            .execute(
                "UPDATE appointments
                 SET day = ?, start_time = ?, duration_minutes = ?, label = ?, color = ?,
                     updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                params![
                    format_day(appointment.day),
                    format_slot(&self.grid, appointment.start_slot),
                    appointment.duration_minutes,
                    appointment.label,
                    appointment.color,
                    id,
                ],
            )
            .context("Failed to update appointment")?;

        if rows == 0 {
            return Err(anyhow!("Appointment {} not found", id));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])
            .context("Failed to delete appointment")?;
        log::info!("Deleted appointment {}", id);
        Ok(())
    }

    /// Move a saved appointment, keeping its duration.
    pub fn move_to(&self, id: i64, day: NaiveDate, start_slot: usize) -> Result<Appointment> {
        self.modify(id, |current| {
            current.with_placement(current.placement().moved_to(day, start_slot))
        })
    }

    /// Change a saved appointment's duration, keeping its start.
    pub fn resize(&self, id: i64, duration_minutes: u32) -> Result<Appointment> {
        self.modify(id, |current| {
            current.with_placement(current.placement().resized_to(duration_minutes))
        })
    }

    /// Persist a committed gesture and return the stored result.
    pub fn apply(&self, request: &CommitRequest) -> Result<Appointment> {
        let result = match *request {
            CommitRequest::Move {
                id,
                day,
                start_slot,
            } => self.move_to(id, day, start_slot),
            CommitRequest::Resize {
                id,
                duration_minutes,
            } => self.resize(id, duration_minutes),
        };
        result.with_context(|| format!("Failed to apply {:?}", request))
    }

    fn modify(&self, id: i64, change: impl FnOnce(&Appointment) -> Appointment) -> Result<Appointment> {
        let current = self
            .get(id)?
            .ok_or_else(|| anyhow!("Appointment {} not found", id))?;

        let updated = change(&current);
        self.update(&updated)?;
        Ok(updated)
    }

    fn check_storable(&self, appointment: &Appointment) -> Result<()> {
        appointment.validate().map_err(|e| anyhow!(e))?;
        if !self.grid.contains_slot(appointment.start_slot) {
            return Err(anyhow!(
                "Slot {} is outside the {} slot grid",
                appointment.start_slot,
                self.grid.slot_count()
            ));
        }
        Ok(())
    }
}
