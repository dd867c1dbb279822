mod commits;
mod navigation;
mod panels;

use anyhow::{Context, Result};
use chrono::Local;

use crate::grid::{GridController, WeekColumns};
use crate::models::appointment::Appointment;
use crate::models::settings::GridSettings;
use crate::services::appointment::AppointmentService;
use crate::services::commit::{AppointmentCommitter, BackgroundCommitter, PendingCommit};
use crate::services::database::Database;
use crate::ui_egui::grid_view::show_week_grid;
use crate::ui_egui::palette::GridPalette;

/// eframe host for the weekly appointment grid.
pub struct SchedulerApp {
    database: Database,
    settings: GridSettings,
    controller: GridController,
    committer: Box<dyn AppointmentCommitter>,
    week: WeekColumns,
    /// Snapshot of the displayed week with in-flight commits applied
    appointments: Vec<Appointment>,
    pending: Vec<PendingCommit>,
    /// A commit finished and the snapshot has not been reloaded since
    snapshot_stale: bool,
    status: Option<String>,
}

impl eframe::App for SchedulerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_commits(ctx);
        self.handle_shortcuts(ctx);

        self.render_toolbar(ctx);
        self.render_status_bar(ctx);

        let palette = GridPalette::from_visuals(&ctx.style().visuals);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let result = show_week_grid(
                    ui,
                    &mut self.controller,
                    &self.week,
                    &self.appointments,
                    &palette,
                );
                for event in result.events {
                    self.handle_grid_event(event);
                }
            });
        });
    }
}

impl SchedulerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        database: Database,
        settings: GridSettings,
    ) -> Result<Self> {
        let app = Self::open(database, settings)?;
        cc.egui_ctx.request_repaint();
        Ok(app)
    }

    /// Build the app without a window, committing on a worker thread.
    pub fn open(database: Database, settings: GridSettings) -> Result<Self> {
        let controller =
            GridController::from_settings(&settings).context("Invalid grid settings")?;
        let committer = BackgroundCommitter::new(database.path(), *controller.grid());
        Self::with_committer(database, settings, controller, Box::new(committer))
    }

    pub fn with_committer(
        database: Database,
        settings: GridSettings,
        controller: GridController,
        committer: Box<dyn AppointmentCommitter>,
    ) -> Result<Self> {
        let week = WeekColumns::containing(Local::now().date_naive(), settings.first_day_of_week);
        let mut app = Self {
            database,
            settings,
            controller,
            committer,
            week,
            appointments: Vec::new(),
            pending: Vec::new(),
            snapshot_stale: false,
            status: None,
        };
        app.reload()?;
        Ok(app)
    }

    pub fn week(&self) -> &WeekColumns {
        &self.week
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn appointment_service(&self) -> AppointmentService<'_> {
        AppointmentService::new(self.database.connection(), *self.controller.grid())
    }

    /// Re-read the displayed week from the store.
    pub fn reload(&mut self) -> Result<()> {
        let appointments = self
            .appointment_service()
            .list_for_week(&self.week)
            .context("Failed to load appointments")?;
        log::debug!(
            "Loaded {} appointment(s) for week of {}",
            appointments.len(),
            self.week.first()
        );
        self.appointments = appointments;
        Ok(())
    }

    fn reload_or_report(&mut self) {
        if let Err(err) = self.reload() {
            log::error!("{:#}", err);
            self.status = Some(format!("{:#}", err));
        }
    }
}
