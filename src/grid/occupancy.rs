//! Which (slot, day) cells are covered, and by which appointment.

use super::time_grid::TimeGrid;
use super::week::WeekColumns;
use crate::models::appointment::Appointment;

/// Occupancy snapshot of one week, built from an appointment slice.
///
/// Owners are indices into the slice the index was built from. The snapshot
/// never changes after `build`; a new appointment set needs a new index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyIndex {
    columns: WeekColumns,
    slot_count: usize,
    /// Column-major: `cells[day * slot_count + slot]`
    cells: Vec<Option<usize>>,
}

impl OccupancyIndex {
    /// Mark every cell covered by `appointments`, skipping `exclude_id`.
    ///
    /// Appointments outside the week or running past the last slot contribute
    /// only their in-range cells. Where two appointments overlap the earlier
    /// one in the slice keeps ownership.
    pub fn build(
        grid: &TimeGrid,
        columns: &WeekColumns,
        appointments: &[Appointment],
        exclude_id: Option<i64>,
    ) -> Self {
        let slot_count = grid.slot_count();
        let mut cells = vec![None; columns.len() * slot_count];

        for (owner, appointment) in appointments.iter().enumerate() {
            if exclude_id.is_some() && appointment.id == exclude_id {
                continue;
            }

            let Some(day) = columns.column_of(appointment.day) else {
                log::debug!(
                    "Skipping appointment {:?} on {}: outside displayed week",
                    appointment.id,
                    appointment.day
                );
                continue;
            };

            let span = grid.slots_for_duration(appointment.duration_minutes);
            let end = appointment.start_slot.saturating_add(span);
            if end > slot_count {
                log::debug!(
                    "Appointment {:?} runs {} slot(s) past the grid, clipping",
                    appointment.id,
                    end - slot_count.max(appointment.start_slot)
                );
            }

            for slot in appointment.start_slot..end.min(slot_count) {
                let cell = &mut cells[day * slot_count + slot];
                if cell.is_none() {
                    *cell = Some(owner);
                }
            }
        }

        Self {
            columns: *columns,
            slot_count,
            cells,
        }
    }

    pub fn columns(&self) -> &WeekColumns {
        &self.columns
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn day_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the appointment covering the cell, if any.
    pub fn owner(&self, slot: usize, day: usize) -> Option<usize> {
        if slot >= self.slot_count || day >= self.day_count() {
            return None;
        }
        self.cells[day * self.slot_count + slot]
    }

    pub fn is_occupied(&self, slot: usize, day: usize) -> bool {
        self.owner(slot, day).is_some()
    }

    /// True iff every cell of `[slot, slot + count)` in `day` exists and is unmarked.
    pub fn is_free(&self, slot: usize, day: usize, count: usize) -> bool {
        let Some(end) = slot.checked_add(count) else {
            return false;
        };
        if day >= self.day_count() || end > self.slot_count {
            return false;
        }
        (slot..end).all(|s| self.cells[day * self.slot_count + s].is_none())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}
