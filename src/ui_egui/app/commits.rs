use std::time::Duration;

use super::SchedulerApp;
use crate::grid::{CommitRequest, GestureOutcome};
use crate::models::appointment::Appointment;
use crate::services::commit::{submit_outcome, CommitPoll};
use crate::ui_egui::grid_view::GridEvent;
use chrono::NaiveDate;

const NEW_APPOINTMENT_LABEL: &str = "New appointment";

impl SchedulerApp {
    pub fn handle_grid_event(&mut self, event: GridEvent) {
        match event {
            GridEvent::CellClicked { day, slot } => self.create_at(day, slot),
            GridEvent::Commit(request) => self.submit(request),
        }
    }

    /// Hand a commit to the worker and show it optimistically.
    fn submit(&mut self, request: CommitRequest) {
        let Some(pending) = submit_outcome(
            self.committer.as_ref(),
            GestureOutcome::Committed(request),
        ) else {
            return;
        };

        apply_optimistic(&mut self.appointments, request);
        self.pending.push(pending);
    }

    /// Drain finished commits. Any result marks the snapshot stale; the
    /// reload that follows also rolls back a failed commit's optimistic update.
    pub fn poll_finished(&mut self) -> usize {
        let mut finished = 0;
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for pending in self.pending.drain(..) {
            match pending.poll() {
                CommitPoll::Pending => still_pending.push(pending),
                CommitPoll::Done(Ok(saved)) => {
                    finished += 1;
                    self.status = Some(format!("Saved '{}'", saved.label));
                }
                CommitPoll::Done(Err(err)) => {
                    finished += 1;
                    log::error!("Commit {:?} failed: {}", pending.request(), err);
                    self.status = Some(format!("Could not save change: {}", err));
                }
            }
        }
        self.pending = still_pending;

        if finished > 0 {
            self.snapshot_stale = true;
        }
        // Swapping the snapshot under a live gesture would move its subject
        if self.snapshot_stale && !self.controller.is_active() {
            self.refresh_snapshot();
        }
        finished
    }

    /// Reload the week and re-apply commits still in flight.
    pub(super) fn refresh_snapshot(&mut self) {
        self.snapshot_stale = false;
        self.reload_or_report();
        for pending in &self.pending {
            apply_optimistic(&mut self.appointments, pending.request());
        }
    }

    pub(super) fn poll_commits(&mut self, ctx: &egui::Context) {
        self.poll_finished();
        if !self.pending.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// Create a default-length appointment at an empty cell, if it fits.
    pub fn create_at(&mut self, day: NaiveDate, slot: usize) {
        let minutes = self.settings.default_duration_minutes;
        if !self
            .controller
            .can_create(&self.week, &self.appointments, day, slot, minutes)
        {
            self.status = Some(format!(
                "No room for a {} minute appointment at {}",
                minutes,
                self.controller.grid().slot_to_label(slot)
            ));
            return;
        }

        let created = Appointment::new(NEW_APPOINTMENT_LABEL, day, slot, minutes)
            .map_err(anyhow::Error::msg)
            .and_then(|appointment| self.appointment_service().create(appointment));
        match created {
            Ok(appointment) => {
                self.status = Some(format!(
                    "Created appointment at {} on {}",
                    self.controller.grid().slot_to_label(appointment.start_slot),
                    appointment.day.format("%a %d %b")
                ));
                self.refresh_snapshot();
            }
            Err(err) => {
                log::error!("Failed to create appointment: {:#}", err);
                self.status = Some(format!("Could not create appointment: {:#}", err));
            }
        }
    }
}

fn apply_optimistic(appointments: &mut [Appointment], request: CommitRequest) {
    if let Some(appointment) = appointments
        .iter_mut()
        .find(|appointment| appointment.id == Some(request.id()))
    {
        *appointment = request.apply_to(appointment);
    }
}
