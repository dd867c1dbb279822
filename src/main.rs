// Appointment Grid Application
// Main entry point

use anyhow::Context;
use appointment_grid::models::settings::GridSettings;
use appointment_grid::services::database::Database;
use appointment_grid::services::settings::SettingsService;
use appointment_grid::ui_egui::SchedulerApp;
#[cfg(not(debug_assertions))]
use directories::ProjectDirs;

type AppCreationError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting Appointment Grid");

    let settings = load_settings_or_default();
    let database = match open_database() {
        Ok(database) => database,
        Err(err) => {
            log::error!("{:#}", err);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("Appointment Grid"),
        ..Default::default()
    };

    eframe::run_native(
        "Appointment Grid",
        options,
        Box::new(
            move |cc: &eframe::CreationContext<'_>| -> Result<Box<dyn eframe::App>, AppCreationError> {
                let app = SchedulerApp::new(cc, database, settings)?;
                Ok(Box::new(app))
            },
        ),
    )
}

fn load_settings_or_default() -> GridSettings {
    let loaded = SettingsService::from_default_location().and_then(|service| service.load());
    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to load settings: {:#}, using defaults", e);
            GridSettings::default()
        }
    }
}

fn open_database() -> anyhow::Result<Database> {
    let db_path = resolve_db_path()?;
    log::info!("Using database at {}", db_path);

    let database = Database::new(&db_path)?;
    database
        .initialize_schema()
        .context("Failed to initialize database schema")?;
    Ok(database)
}

fn resolve_db_path() -> anyhow::Result<String> {
    #[cfg(debug_assertions)]
    {
        Ok("appointments.db".to_string())
    }

    #[cfg(not(debug_assertions))]
    {
        let dirs = ProjectDirs::from("com", "AppointmentGrid", "AppointmentGrid")
            .context("Could not determine the data directory")?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        Ok(data_dir.join("appointments.db").to_string_lossy().to_string())
    }
}
