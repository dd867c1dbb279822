//! Appointment store.
//! Persists grid appointments in SQLite, converting between grid slots and
//! the wall-clock start times kept in the database.

use rusqlite::Connection;

use crate::grid::TimeGrid;

pub mod crud;
pub mod queries;
mod shared;

/// Service for appointments stored in SQLite.
///
/// Slots only mean something relative to a `TimeGrid`, so the service is
/// bound to the grid the rows are read into.
pub struct AppointmentService<'a> {
    pub(crate) conn: &'a Connection,
    pub(crate) grid: TimeGrid,
}

impl<'a> AppointmentService<'a> {
    pub fn new(conn: &'a Connection, grid: TimeGrid) -> Self {
        Self { conn, grid }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }
}
