// Test fixtures - reusable test data
// Shared weeks, appointments and controllers for the integration tests

#![allow(dead_code)]

use appointment_grid::grid::{GridController, WeekColumns};
use appointment_grid::models::appointment::Appointment;
use appointment_grid::models::placement::GridCell;
use appointment_grid::models::settings::GridSettings;
use appointment_grid::services::database::Database;
use chrono::NaiveDate;
use egui::Pos2;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday 2024-01-08, first column of the reference week
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    pub fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()
    }

    pub fn reference_week() -> WeekColumns {
        WeekColumns::starting(monday())
    }
}

/// Sample appointments for testing
pub mod appointments {
    use super::*;

    /// A stored appointment with `id` and label "a{id}"
    pub fn saved(id: i64, day: NaiveDate, start_slot: usize, minutes: u32) -> Appointment {
        let mut appointment =
            Appointment::new(format!("a{}", id), day, start_slot, minutes).unwrap();
        appointment.id = Some(id);
        appointment
    }
}

/// Reference controller: 08:00-18:00, 15 minute slots, 5 minute resize snap
pub fn controller() -> GridController {
    GridController::from_settings(&GridSettings::default()).unwrap()
}

/// Centre of a cell in screen coordinates
pub fn center(controller: &GridController, day: usize, slot: usize) -> Pos2 {
    controller
        .geometry()
        .cell_rect(GridCell::new(day, slot))
        .center()
}

/// File-backed database with the schema applied
pub fn temp_database(dir: &tempfile::TempDir) -> (Database, String) {
    let path = dir.path().join("appointments.db");
    let path = path.to_str().unwrap().to_string();
    let db = Database::new(&path).unwrap();
    db.initialize_schema().unwrap();
    (db, path)
}
