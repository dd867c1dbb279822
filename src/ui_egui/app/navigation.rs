use super::SchedulerApp;
use crate::grid::WeekColumns;
use chrono::Local;

impl SchedulerApp {
    pub fn navigate_previous(&mut self) {
        self.show_week(self.week.previous_week());
    }

    pub fn navigate_next(&mut self) {
        self.show_week(self.week.next_week());
    }

    pub fn jump_to_today(&mut self) {
        let today = Local::now().date_naive();
        self.show_week(WeekColumns::containing(
            today,
            self.settings.first_day_of_week,
        ));
    }

    fn show_week(&mut self, week: WeekColumns) {
        if self.controller.is_active() {
            // The session's occupancy belongs to the old week
            self.controller.cancel();
        }
        self.week = week;
        self.refresh_snapshot();
    }

    pub(super) fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.controller.is_active() || ctx.wants_keyboard_input() {
            return;
        }

        let (previous, next, today) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::T),
            )
        });

        if previous {
            self.navigate_previous();
        } else if next {
            self.navigate_next();
        } else if today {
            self.jump_to_today();
        }
    }
}
