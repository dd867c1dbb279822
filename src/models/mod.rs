// Module exports for models

pub mod appointment;
pub mod placement;
pub mod settings;
