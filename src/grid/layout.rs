//! Span-aware layout of one week, consumed by the renderer.
//!
//! A block covering several rows is laid out once. The rows below its first
//! row stay in the cell list as `Covered` drop targets so a drag passing over
//! a long appointment still resolves to a cell instead of hitting a dead zone.

use egui::Rect;

use super::occupancy::OccupancyIndex;
use super::pointer::GridGeometry;
use super::session::{DragKind, DragSession};
use super::time_grid::TimeGrid;
use super::week::WeekColumns;
use crate::models::appointment::Appointment;
use crate::models::placement::{GridCell, Placement};

/// What a single grid cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Empty,
    /// First row of a block; the block itself is drawn from `GridLayout::blocks`
    BlockStart { appointment: usize },
    /// Later row of a block: no content of its own, still a drop target
    Covered { appointment: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    pub cell: GridCell,
    pub rect: Rect,
    pub role: CellRole,
    /// Covered cells to the left in the same row. Renderers that flow cells
    /// left to right (skipping covered ones) add this many column widths to
    /// keep drop targets aligned with their column.
    pub spans_to_left: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    /// Index into the appointment slice
    pub appointment: usize,
    pub id: Option<i64>,
    pub rect: Rect,
    pub column: usize,
    pub start_slot: usize,
    pub span: usize,
    /// True when the block was cut off at the last slot
    pub clipped: bool,
    /// True for the appointment currently being dragged
    pub is_subject: bool,
    pub start_label: String,
    pub end_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewLayout {
    pub rect: Rect,
    pub placement: Placement,
    pub legal: bool,
    pub is_resize: bool,
    pub start_label: String,
    pub end_label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridLayout {
    /// One entry per (day, slot), column by column
    pub cells: Vec<CellLayout>,
    pub blocks: Vec<BlockLayout>,
    pub preview: Option<PreviewLayout>,
    /// Highlighted cell under an active move
    pub drop_target: Option<GridCell>,
}

impl GridLayout {
    pub fn cell(&self, cell: GridCell, slot_count: usize) -> Option<&CellLayout> {
        self.cells.get(cell.day * slot_count + cell.slot)
    }

    /// Topmost block under `point`, if any.
    pub fn block_at(&self, point: egui::Pos2) -> Option<&BlockLayout> {
        self.blocks.iter().rev().find(|block| block.rect.contains(point))
    }
}

/// Lay out `appointments` for `columns`, including the live preview of `session`.
pub fn layout_week(
    grid: &TimeGrid,
    geometry: &GridGeometry,
    columns: &WeekColumns,
    appointments: &[Appointment],
    session: Option<&DragSession>,
) -> GridLayout {
    let slot_count = grid.slot_count();
    let index = OccupancyIndex::build(grid, columns, appointments, None);

    let mut cells = Vec::with_capacity(columns.len() * slot_count);
    for day in 0..columns.len() {
        for slot in 0..slot_count {
            let cell = GridCell::new(day, slot);
            let role = cell_role(&index, appointments, cell);
            let spans_to_left = (0..day)
                .filter(|left| {
                    matches!(
                        cell_role(&index, appointments, GridCell::new(*left, slot)),
                        CellRole::Covered { .. }
                    )
                })
                .count();
            cells.push(CellLayout {
                cell,
                rect: geometry.cell_rect(cell),
                role,
                spans_to_left,
            });
        }
    }

    let subject_id = session.map(|s| s.subject_id());
    let blocks = appointments
        .iter()
        .enumerate()
        .filter_map(|(i, appointment)| {
            let column = columns.column_of(appointment.day)?;
            if !grid.contains_slot(appointment.start_slot) {
                return None;
            }
            let full_span = grid.slots_for_duration(appointment.duration_minutes);
            let span = full_span.min(slot_count - appointment.start_slot);
            Some(BlockLayout {
                appointment: i,
                id: appointment.id,
                rect: geometry.block_rect(column, appointment.start_slot, span),
                column,
                start_slot: appointment.start_slot,
                span,
                clipped: span < full_span,
                is_subject: subject_id.is_some() && appointment.id == subject_id,
                start_label: grid.slot_to_label(appointment.start_slot),
                end_label: grid.end_label(appointment.start_slot, appointment.duration_minutes),
            })
        })
        .collect();

    let preview = session.and_then(|session| preview_for(grid, geometry, columns, session));
    let drop_target = session
        .filter(|session| session.kind().is_move())
        .and_then(|session| session.hovered_cell());

    GridLayout {
        cells,
        blocks,
        preview,
        drop_target,
    }
}

fn cell_role(index: &OccupancyIndex, appointments: &[Appointment], cell: GridCell) -> CellRole {
    match index.owner(cell.slot, cell.day) {
        None => CellRole::Empty,
        Some(owner) if appointments[owner].start_slot == cell.slot => {
            CellRole::BlockStart { appointment: owner }
        }
        Some(owner) => CellRole::Covered { appointment: owner },
    }
}

fn preview_for(
    grid: &TimeGrid,
    geometry: &GridGeometry,
    columns: &WeekColumns,
    session: &DragSession,
) -> Option<PreviewLayout> {
    let placement = session.candidate();
    let column = columns.column_of(placement.day)?;
    if !grid.contains_slot(placement.start_slot) {
        return None;
    }
    let span = grid
        .slots_for_duration(placement.duration_minutes)
        .min(grid.slot_count() - placement.start_slot);

    Some(PreviewLayout {
        rect: geometry.block_rect(column, placement.start_slot, span),
        placement,
        legal: session.is_legal(),
        is_resize: matches!(session.kind(), DragKind::Resize { .. }),
        start_label: grid.slot_to_label(placement.start_slot),
        end_label: grid.end_label(placement.start_slot, placement.duration_minutes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::session::GridController;
    use crate::models::settings::GridSettings;
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn saved(id: i64, day: NaiveDate, start_slot: usize, minutes: u32) -> Appointment {
        let mut appointment = Appointment::new(format!("a{}", id), day, start_slot, minutes).unwrap();
        appointment.id = Some(id);
        appointment
    }

    fn layout(appointments: &[Appointment], session: Option<&DragSession>) -> GridLayout {
        let settings = GridSettings::default();
        let controller = GridController::from_settings(&settings).unwrap();
        layout_week(
            controller.grid(),
            controller.geometry(),
            &WeekColumns::starting(monday()),
            appointments,
            session,
        )
    }

    #[test]
    fn test_multi_slot_block_is_laid_out_once() {
        let appointments = [saved(1, monday(), 2, 45)];
        let layout = layout(&appointments, None);

        assert_eq!(layout.blocks.len(), 1);
        let block = &layout.blocks[0];
        assert_eq!(block.span, 3);
        assert_eq!(block.rect.height(), 3.0 * 24.0);
        assert_eq!(block.start_label, "08:30");
        assert_eq!(block.end_label, "09:15");
        assert!(!block.clipped);
    }

    #[test]
    fn test_every_row_of_a_block_keeps_its_own_cell() {
        let appointments = [saved(1, monday(), 2, 45)];
        let layout = layout(&appointments, None);

        let start = layout.cell(GridCell::new(0, 2), 40).unwrap();
        assert_eq!(start.role, CellRole::BlockStart { appointment: 0 });
        // The first row is a pointer target like any other cell
        assert_eq!(start.rect.height(), 24.0);

        for slot in 3..5 {
            let covered = layout.cell(GridCell::new(0, slot), 40).unwrap();
            assert_eq!(covered.role, CellRole::Covered { appointment: 0 });
            assert_eq!(covered.rect.top(), start.rect.top() + (slot - 2) as f32 * 24.0);
        }

        assert_eq!(layout.cell(GridCell::new(0, 5), 40).unwrap().role, CellRole::Empty);
        assert_eq!(layout.cells.len(), 7 * 40);
    }

    #[test]
    fn test_spans_to_left_counts_covered_cells_in_row() {
        let tuesday = monday().succ_opt().unwrap();
        let appointments = [saved(1, monday(), 0, 60), saved(2, tuesday, 1, 30)];
        let layout = layout(&appointments, None);

        // Row 2: Monday covered, Tuesday covered
        let wednesday_row_2 = layout.cell(GridCell::new(2, 2), 40).unwrap();
        assert_eq!(wednesday_row_2.spans_to_left, 2);
        // Row 1: Monday covered, Tuesday is a block start
        let wednesday_row_1 = layout.cell(GridCell::new(2, 1), 40).unwrap();
        assert_eq!(wednesday_row_1.spans_to_left, 1);
        // Drop target rects stay on their column regardless
        assert_eq!(wednesday_row_2.rect.left(), 56.0 + 2.0 * 120.0);
    }

    #[test]
    fn test_block_past_grid_end_is_clipped() {
        let appointments = [saved(1, monday(), 38, 60)];
        let layout = layout(&appointments, None);

        assert_eq!(layout.blocks[0].span, 2);
        assert!(layout.blocks[0].clipped);
    }

    #[test]
    fn test_out_of_week_appointments_are_not_laid_out() {
        let appointments = [saved(1, monday() + chrono::Duration::days(7), 0, 30)];
        assert!(layout(&appointments, None).blocks.is_empty());
    }

    #[test]
    fn test_preview_follows_session() {
        let settings = GridSettings::default();
        let mut controller = GridController::from_settings(&settings).unwrap();
        let week = WeekColumns::starting(monday());
        let appointments = vec![saved(1, monday(), 0, 30), saved(2, monday(), 6, 30)];

        let grab = controller.geometry().cell_rect(GridCell::new(0, 0)).center();
        controller.begin_move(&week, &appointments, 1, grab).unwrap();
        let over_other = controller.geometry().cell_rect(GridCell::new(0, 5)).center();
        controller.update(over_other);

        let layout = layout_week(
            controller.grid(),
            controller.geometry(),
            &week,
            &appointments,
            controller.session(),
        );
        let preview = layout.preview.unwrap();
        assert_eq!(preview.placement, Placement::new(monday(), 5, 30));
        assert!(!preview.legal);
        assert!(!preview.is_resize);
        assert_eq!(preview.start_label, "09:15");
        assert_eq!(preview.end_label, "09:45");
        assert_eq!(layout.drop_target, Some(GridCell::new(0, 5)));
        assert!(layout.blocks[0].is_subject);
        assert!(!layout.blocks[1].is_subject);
    }

    #[test]
    fn test_block_at_prefers_topmost() {
        let appointments = [saved(1, monday(), 0, 60)];
        let layout = layout(&appointments, None);
        let inside = layout.blocks[0].rect.center();

        assert_eq!(layout.block_at(inside).and_then(|b| b.id), Some(1));
        assert!(layout.block_at(egui::Pos2::new(-10.0, -10.0)).is_none());
    }
}
