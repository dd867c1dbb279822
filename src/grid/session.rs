// Drag Session
//
// Tracks an in-progress move or resize gesture on the grid.
// - Move: block follows the pointer cell by cell, duration unchanged
// - Resize: bottom edge follows the pointer vertically, snapped to minutes
//
// The controller owns at most one session. Nothing is written back to the
// appointment set here; a successful release yields a `CommitRequest` for the
// host to persist.

use chrono::NaiveDate;
use egui::{Pos2, Vec2};

use super::collision;
use super::error::{GestureError, GridError};
use super::occupancy::OccupancyIndex;
use super::pointer::GridGeometry;
use super::time_grid::TimeGrid;
use super::week::WeekColumns;
use crate::models::appointment::{Appointment, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use crate::models::placement::{GridCell, Placement};
use crate::models::settings::GridSettings;

/// Snapping and limits applied to resize gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRules {
    pub snap_minutes: u32,
    pub min_minutes: u32,
    pub max_minutes: u32,
}

impl Default for ResizeRules {
    fn default() -> Self {
        Self {
            snap_minutes: 5,
            min_minutes: MIN_DURATION_MINUTES,
            max_minutes: MAX_DURATION_MINUTES,
        }
    }
}

impl ResizeRules {
    pub fn from_settings(settings: &GridSettings) -> Self {
        Self {
            snap_minutes: settings.resize_snap_minutes.max(1),
            min_minutes: settings.min_duration_minutes,
            max_minutes: settings.max_duration_minutes,
        }
    }

    /// Round to the nearest snap increment, then clamp into `[min, max]`.
    pub fn quantize(&self, raw_minutes: f32) -> u32 {
        let min = self.min_minutes as f32;
        let max = self.max_minutes as f32;
        if raw_minutes.is_nan() {
            return self.min_minutes;
        }
        let snap = self.snap_minutes as f32;
        let snapped = (raw_minutes / snap).round() * snap;
        snapped.clamp(min, max) as u32
    }
}

/// What the gesture changes, plus what was captured when it started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragKind {
    /// Offset of the pointer from the block's top-left corner
    Move { pointer_offset: Vec2 },
    /// Pointer y at gesture start
    Resize { origin_y: f32 },
}

impl DragKind {
    pub fn is_move(&self) -> bool {
        matches!(self, DragKind::Move { .. })
    }

    pub fn is_resize(&self) -> bool {
        matches!(self, DragKind::Resize { .. })
    }
}

/// A placement the host should persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitRequest {
    Move {
        id: i64,
        day: NaiveDate,
        start_slot: usize,
    },
    Resize {
        id: i64,
        duration_minutes: u32,
    },
}

impl CommitRequest {
    pub fn id(&self) -> i64 {
        match self {
            CommitRequest::Move { id, .. } | CommitRequest::Resize { id, .. } => *id,
        }
    }

    /// `appointment` with this request applied.
    pub fn apply_to(&self, appointment: &Appointment) -> Appointment {
        let placement = appointment.placement();
        let placement = match *self {
            CommitRequest::Move { day, start_slot, .. } => placement.moved_to(day, start_slot),
            CommitRequest::Resize {
                duration_minutes, ..
            } => placement.resized_to(duration_minutes),
        };
        appointment.with_placement(placement)
    }
}

/// How a gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// No session was active
    Idle,
    Committed(CommitRequest),
    /// Released where it started; nothing to persist
    Unchanged,
    /// Released on an illegal candidate, discarded
    Rejected(Placement),
    Cancelled,
}

/// State of one move or resize gesture.
#[derive(Debug, Clone)]
pub struct DragSession {
    kind: DragKind,
    subject_id: i64,
    origin: Placement,
    candidate: Placement,
    legal: bool,
    pointer_pos: Option<Pos2>,
    hovered_cell: Option<GridCell>,
    /// Occupancy of everything except the subject, frozen at gesture start
    index: OccupancyIndex,
}

impl DragSession {
    fn start(
        kind: DragKind,
        subject: &Appointment,
        subject_id: i64,
        grid: &TimeGrid,
        columns: &WeekColumns,
        appointments: &[Appointment],
        pointer: Pos2,
    ) -> Self {
        let index = OccupancyIndex::build(grid, columns, appointments, Some(subject_id));
        let origin = subject.placement();
        let legal = collision::can_place(grid, &index, &origin);

        Self {
            kind,
            subject_id,
            origin,
            candidate: origin,
            legal,
            pointer_pos: Some(pointer),
            hovered_cell: columns
                .column_of(origin.day)
                .map(|day| GridCell::new(day, origin.start_slot)),
            index,
        }
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn origin(&self) -> Placement {
        self.origin
    }

    pub fn candidate(&self) -> Placement {
        self.candidate
    }

    pub fn is_legal(&self) -> bool {
        self.legal
    }

    pub fn pointer_pos(&self) -> Option<Pos2> {
        self.pointer_pos
    }

    /// Cell the candidate currently starts in
    pub fn hovered_cell(&self) -> Option<GridCell> {
        self.hovered_cell
    }

    /// Occupancy without the subject, as used for every legality check.
    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.index
    }

    pub fn is_changed(&self) -> bool {
        self.candidate != self.origin
    }

    fn update_move(&mut self, grid: &TimeGrid, geometry: &GridGeometry, pointer: Pos2) {
        let DragKind::Move { pointer_offset } = self.kind else {
            return;
        };
        self.pointer_pos = Some(pointer);

        // Map the centre of the block's first row, not the raw pointer, so a
        // block grabbed by its middle keeps its position relative to the pointer
        let anchor = pointer - pointer_offset
            + Vec2::new(geometry.cell_width / 2.0, geometry.cell_height / 2.0);
        let Some(cell) = geometry.pointer_to_cell(anchor) else {
            return;
        };
        let Some(day) = self.index.columns().date(cell.day) else {
            return;
        };

        self.hovered_cell = Some(cell);
        self.candidate = self.candidate.moved_to(day, cell.slot);
        self.legal = collision::can_place(grid, &self.index, &self.candidate);
    }

    fn update_resize(
        &mut self,
        grid: &TimeGrid,
        geometry: &GridGeometry,
        rules: &ResizeRules,
        pointer: Pos2,
    ) {
        let DragKind::Resize { origin_y } = self.kind else {
            return;
        };
        if !pointer.y.is_finite() {
            return;
        }
        self.pointer_pos = Some(pointer);

        // cell_height pixels == one slot of minutes
        let delta_y = pointer.y - origin_y;
        let delta_minutes = delta_y * grid.slot_minutes() as f32 / geometry.cell_height;
        let duration = rules.quantize(self.origin.duration_minutes as f32 + delta_minutes);

        self.candidate = self.candidate.resized_to(duration);
        self.legal = collision::can_place(grid, &self.index, &self.candidate);
    }

    fn finish(self) -> GestureOutcome {
        if !self.legal {
            log::debug!(
                "Discarding illegal placement {:?} for appointment {}",
                self.candidate,
                self.subject_id
            );
            return GestureOutcome::Rejected(self.candidate);
        }
        if !self.is_changed() {
            return GestureOutcome::Unchanged;
        }

        let request = match self.kind {
            DragKind::Move { .. } => CommitRequest::Move {
                id: self.subject_id,
                day: self.candidate.day,
                start_slot: self.candidate.start_slot,
            },
            DragKind::Resize { .. } => CommitRequest::Resize {
                id: self.subject_id,
                duration_minutes: self.candidate.duration_minutes,
            },
        };
        GestureOutcome::Committed(request)
    }
}

/// Owner of the grid configuration and the single active gesture.
#[derive(Debug, Clone)]
pub struct GridController {
    grid: TimeGrid,
    geometry: GridGeometry,
    rules: ResizeRules,
    session: Option<DragSession>,
}

impl GridController {
    pub fn new(grid: TimeGrid, geometry: GridGeometry, rules: ResizeRules) -> Self {
        Self {
            grid,
            geometry,
            rules,
            session: None,
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Result<Self, GridError> {
        let grid = TimeGrid::from_settings(settings)?;
        let geometry = GridGeometry::from_settings(settings, &grid);
        Ok(Self::new(grid, geometry, ResizeRules::from_settings(settings)))
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn rules(&self) -> &ResizeRules {
        &self.rules
    }

    /// Move the grid on screen (scrolling, window resize). Cell size is fixed.
    pub fn set_origin(&mut self, origin: Pos2) {
        self.geometry = self.geometry.with_origin(origin);
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn begin_move(
        &mut self,
        columns: &WeekColumns,
        appointments: &[Appointment],
        subject_id: i64,
        pointer: Pos2,
    ) -> Result<(), GestureError> {
        self.ensure_idle()?;
        let subject = find_subject(appointments, subject_id)?;
        let day = columns
            .column_of(subject.day)
            .ok_or(GestureError::NotInWeek(subject_id))?;

        let span = self
            .grid
            .slots_for_duration(subject.duration_minutes)
            .min(self.grid.slot_count().saturating_sub(subject.start_slot))
            .max(1);
        let block = self.geometry.block_rect(day, subject.start_slot, span);
        let offset = (pointer - block.min).clamp(Vec2::ZERO, block.size());

        log::debug!("Begin move of appointment {}", subject_id);
        self.session = Some(DragSession::start(
            DragKind::Move {
                pointer_offset: offset,
            },
            subject,
            subject_id,
            &self.grid,
            columns,
            appointments,
            pointer,
        ));
        Ok(())
    }

    pub fn begin_resize(
        &mut self,
        columns: &WeekColumns,
        appointments: &[Appointment],
        subject_id: i64,
        pointer: Pos2,
    ) -> Result<(), GestureError> {
        self.ensure_idle()?;
        let subject = find_subject(appointments, subject_id)?;
        if !columns.contains(subject.day) {
            return Err(GestureError::NotInWeek(subject_id));
        }

        log::debug!("Begin resize of appointment {}", subject_id);
        self.session = Some(DragSession::start(
            DragKind::Resize {
                origin_y: pointer.y,
            },
            subject,
            subject_id,
            &self.grid,
            columns,
            appointments,
            pointer,
        ));
        Ok(())
    }

    /// Feed a pointer-move event to the active session, if any.
    pub fn update(&mut self, pointer: Pos2) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.kind() {
            DragKind::Move { .. } => session.update_move(&self.grid, &self.geometry, pointer),
            DragKind::Resize { .. } => {
                session.update_resize(&self.grid, &self.geometry, &self.rules, pointer)
            }
        }
    }

    /// End the gesture on pointer release.
    pub fn release(&mut self) -> GestureOutcome {
        match self.session.take() {
            Some(session) => {
                let outcome = session.finish();
                if let GestureOutcome::Committed(request) = outcome {
                    log::info!("Committing {:?}", request);
                }
                outcome
            }
            None => GestureOutcome::Idle,
        }
    }

    /// Abort the gesture (Escape, pointer lost). The candidate is discarded.
    pub fn cancel(&mut self) -> GestureOutcome {
        match self.session.take() {
            Some(session) => {
                log::debug!("Cancelled gesture on appointment {}", session.subject_id);
                GestureOutcome::Cancelled
            }
            None => GestureOutcome::Idle,
        }
    }

    /// The empty cell under `point`, for click-to-create. `None` during a
    /// gesture, off-grid, or over an occupied cell.
    pub fn empty_cell_at(
        &self,
        columns: &WeekColumns,
        appointments: &[Appointment],
        point: Pos2,
    ) -> Option<(NaiveDate, usize)> {
        if self.is_active() {
            return None;
        }
        let cell = self.geometry.pointer_to_cell(point)?;
        let index = OccupancyIndex::build(&self.grid, columns, appointments, None);
        if index.is_occupied(cell.slot, cell.day) {
            return None;
        }
        Some((columns.date(cell.day)?, cell.slot))
    }

    /// Whether a new appointment of `duration_minutes` fits at the cell.
    pub fn can_create(
        &self,
        columns: &WeekColumns,
        appointments: &[Appointment],
        day: NaiveDate,
        start_slot: usize,
        duration_minutes: u32,
    ) -> bool {
        let index = OccupancyIndex::build(&self.grid, columns, appointments, None);
        collision::can_place(
            &self.grid,
            &index,
            &Placement::new(day, start_slot, duration_minutes),
        )
    }

    fn ensure_idle(&self) -> Result<(), GestureError> {
        match &self.session {
            Some(active) => {
                log::warn!(
                    "Ignoring new gesture: appointment {} is already being dragged",
                    active.subject_id
                );
                Err(GestureError::SessionActive {
                    active: active.subject_id,
                })
            }
            None => Ok(()),
        }
    }
}

fn find_subject(appointments: &[Appointment], id: i64) -> Result<&Appointment, GestureError> {
    appointments
        .iter()
        .find(|appointment| appointment.id == Some(id))
        .ok_or(GestureError::UnknownAppointment(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn controller() -> GridController {
        GridController::from_settings(&GridSettings::default()).unwrap()
    }

    fn saved(id: i64, day: NaiveDate, start_slot: usize, minutes: u32) -> Appointment {
        let mut appointment = Appointment::new(format!("a{}", id), day, start_slot, minutes).unwrap();
        appointment.id = Some(id);
        appointment
    }

    fn center(controller: &GridController, day: usize, slot: usize) -> Pos2 {
        controller.geometry().cell_rect(GridCell::new(day, slot)).center()
    }

    #[test]
    fn test_quantize_snaps_and_clamps() {
        let rules = ResizeRules::default();
        assert_eq!(rules.quantize(32.4), 30);
        assert_eq!(rules.quantize(32.6), 35);
        assert_eq!(rules.quantize(-40.0), 5);
        assert_eq!(rules.quantize(0.0), 5);
        assert_eq!(rules.quantize(10_000.0), 720);
        assert_eq!(rules.quantize(f32::NAN), 5);
    }

    #[test]
    fn test_move_keeps_grab_offset() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 60)];

        // Grab the 4-slot block by its third row
        controller
            .begin_move(&week, &appointments, 1, center(&controller, 0, 2))
            .unwrap();
        controller.update(center(&controller, 2, 12));

        let session = controller.session().unwrap();
        assert_eq!(session.candidate().start_slot, 10);
        assert_eq!(session.candidate().day, monday() + chrono::Duration::days(2));
        assert!(session.is_legal());
    }

    #[test]
    fn test_pointer_off_grid_keeps_candidate() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30)];

        controller
            .begin_move(&week, &appointments, 1, center(&controller, 0, 0))
            .unwrap();
        controller.update(center(&controller, 3, 5));
        let before = controller.session().unwrap().candidate();

        controller.update(Pos2::new(-1000.0, -1000.0));
        assert_eq!(controller.session().unwrap().candidate(), before);
    }

    #[test]
    fn test_resize_down_and_up() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30)];
        let height = controller.geometry().cell_height;
        let start = center(&controller, 0, 1);

        controller.begin_resize(&week, &appointments, 1, start).unwrap();

        // One row down == one slot (15 minutes) longer
        controller.update(start + Vec2::new(0.0, height));
        assert_eq!(controller.session().unwrap().candidate().duration_minutes, 45);

        // A third of a row snaps to the nearest 5 minutes
        controller.update(start + Vec2::new(0.0, height / 3.0));
        assert_eq!(controller.session().unwrap().candidate().duration_minutes, 35);

        controller.update(start - Vec2::new(0.0, height));
        assert_eq!(controller.session().unwrap().candidate().duration_minutes, 15);
    }

    #[test]
    fn test_resize_keeps_illegal_candidate() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30), saved(2, monday(), 3, 15)];
        let height = controller.geometry().cell_height;
        let start = center(&controller, 0, 1);

        controller.begin_resize(&week, &appointments, 1, start).unwrap();
        controller.update(start + Vec2::new(0.0, 2.0 * height));

        let session = controller.session().unwrap();
        assert_eq!(session.candidate().duration_minutes, 60);
        assert!(!session.is_legal());

        assert_eq!(
            controller.release(),
            GestureOutcome::Rejected(Placement::new(monday(), 0, 60))
        );
        assert!(!controller.is_active());
    }

    #[test]
    fn test_second_gesture_is_rejected() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30), saved(2, monday(), 8, 30)];

        controller
            .begin_move(&week, &appointments, 1, center(&controller, 0, 0))
            .unwrap();
        let result = controller.begin_resize(&week, &appointments, 2, center(&controller, 0, 9));

        assert_eq!(result, Err(GestureError::SessionActive { active: 1 }));
        let session = controller.session().unwrap();
        assert_eq!(session.subject_id(), 1);
        assert!(session.kind().is_move());
    }

    #[test]
    fn test_unsaved_or_unknown_subject() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![Appointment::new("unsaved", monday(), 0, 30).unwrap()];

        assert_eq!(
            controller.begin_move(&week, &appointments, 9, Pos2::ZERO),
            Err(GestureError::UnknownAppointment(9))
        );
        assert!(!controller.is_active());
    }

    #[test]
    fn test_subject_outside_week() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let next_week = monday() + chrono::Duration::days(7);
        let appointments = vec![saved(4, next_week, 0, 30)];

        assert_eq!(
            controller.begin_resize(&week, &appointments, 4, Pos2::ZERO),
            Err(GestureError::NotInWeek(4))
        );
    }

    #[test]
    fn test_release_in_place_is_unchanged() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30)];

        controller
            .begin_move(&week, &appointments, 1, center(&controller, 0, 0))
            .unwrap();
        controller.update(center(&controller, 0, 0));
        assert_eq!(controller.release(), GestureOutcome::Unchanged);
    }

    #[test]
    fn test_cancel_and_idle_release() {
        let mut controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30)];

        assert_eq!(controller.cancel(), GestureOutcome::Idle);
        assert_eq!(controller.release(), GestureOutcome::Idle);

        controller
            .begin_move(&week, &appointments, 1, center(&controller, 0, 0))
            .unwrap();
        controller.update(center(&controller, 1, 4));
        assert_eq!(controller.cancel(), GestureOutcome::Cancelled);
        assert_eq!(controller.release(), GestureOutcome::Idle);
    }

    #[test]
    fn test_empty_cell_at() {
        let controller = controller();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30)];

        assert_eq!(
            controller.empty_cell_at(&week, &appointments, center(&controller, 0, 1)),
            None
        );
        assert_eq!(
            controller.empty_cell_at(&week, &appointments, center(&controller, 0, 2)),
            Some((monday(), 2))
        );
    }

    #[test]
    fn test_commit_request_apply_to() {
        let appointment = saved(1, monday(), 0, 30);
        let tuesday = monday().succ_opt().unwrap();

        let moved = CommitRequest::Move {
            id: 1,
            day: tuesday,
            start_slot: 4,
        }
        .apply_to(&appointment);
        assert_eq!(moved.placement(), Placement::new(tuesday, 4, 30));

        let resized = CommitRequest::Resize {
            id: 1,
            duration_minutes: 50,
        }
        .apply_to(&appointment);
        assert_eq!(resized.placement(), Placement::new(monday(), 0, 50));
    }
}
