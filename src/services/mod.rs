// Service module exports
// Storage, configuration and commit handling around the grid

pub mod appointment;
pub mod commit;
pub mod database;
pub mod settings;
