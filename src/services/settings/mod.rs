// Settings service module
// Loads and saves the grid configuration file

mod service;

pub use service::SettingsService;
