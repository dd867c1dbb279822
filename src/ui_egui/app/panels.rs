use super::SchedulerApp;
use egui::RichText;

impl SchedulerApp {
    pub(super) fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("◀ Previous").clicked() {
                    self.navigate_previous();
                }
                if ui.button("Today").clicked() {
                    self.jump_to_today();
                }
                if ui.button("Next ▶").clicked() {
                    self.navigate_next();
                }

                ui.separator();
                ui.label(
                    RichText::new(format!(
                        "{} to {}",
                        self.week.first().format("%d %b %Y"),
                        self.week.last().format("%d %b %Y")
                    ))
                    .strong(),
                );
            });
        });
    }

    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(format!("{} appointment(s)", self.appointments.len()));
                    if !self.pending.is_empty() {
                        ui.separator();
                        ui.spinner();
                        ui.label("Saving...");
                    }
                    if let Some(status) = &self.status {
                        ui.separator();
                        ui.label(status.as_str());
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new("Drag to move, drag bottom edge to resize, Esc cancels")
                                .weak(),
                        );
                    });
                });
            });
    }
}
