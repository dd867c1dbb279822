//! egui renderer for the week grid.
//!
//! Each frame the view turns egui's response into a `PointerInput`, feeds it
//! to the `GridController`, then paints the span-aware layout. Nothing is
//! persisted here: commits and cell clicks are handed back as `GridEvent`s.

use chrono::{Local, NaiveDate};
use egui::{Align2, CursorIcon, FontId, Painter, Pos2, Rect, Rounding, Sense, Stroke, Vec2};

use super::palette::GridPalette;
use super::resize;
use crate::grid::layout::{BlockLayout, CellRole, PreviewLayout};
use crate::grid::{
    layout_week, CommitRequest, DragKind, GestureOutcome, GridController, GridLayout, WeekColumns,
};
use crate::models::appointment::Appointment;
use crate::utils::date::{format_column_header, is_weekend};

const BLOCK_ROUNDING: f32 = 4.0;
const TEXT_PADDING: f32 = 4.0;

/// Something the host has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// Click on an empty cell
    CellClicked { day: NaiveDate, slot: usize },
    Commit(CommitRequest),
}

#[derive(Debug, Default)]
pub struct GridViewResult {
    pub events: Vec<GridEvent>,
}

/// Pointer state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// Where the primary button went down
    pub press_origin: Option<Pos2>,
    /// Current pointer position while interacting
    pub pos: Option<Pos2>,
    pub drag_started: bool,
    pub drag_stopped: bool,
    pub clicked: bool,
    pub escape: bool,
}

/// Draw the grid and handle this frame's pointer input.
pub fn show_week_grid(
    ui: &mut egui::Ui,
    controller: &mut GridController,
    columns: &WeekColumns,
    appointments: &[Appointment],
    palette: &GridPalette,
) -> GridViewResult {
    let size = controller.geometry().total_size();
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
    controller.set_origin(rect.min);

    let input = PointerInput {
        press_origin: ui.input(|i| i.pointer.press_origin()),
        pos: response.interact_pointer_pos(),
        drag_started: response.drag_started(),
        drag_stopped: response.drag_stopped(),
        clicked: response.clicked(),
        escape: ui.input(|i| i.key_pressed(egui::Key::Escape)),
    };
    let events = handle_input(controller, columns, appointments, input);

    let layout = layout_week(
        controller.grid(),
        controller.geometry(),
        columns,
        appointments,
        controller.session(),
    );
    let hover = response.hover_pos();
    let painter = ui.painter_at(rect);

    painter.rect_filled(rect, 0.0, palette.background);
    paint_header(&painter, controller, columns, palette);
    paint_labels(&painter, controller, palette);
    paint_cells(&painter, controller, columns, &layout, hover, palette);
    paint_blocks(&painter, controller, appointments, &layout, hover, palette);
    if let Some(preview) = &layout.preview {
        paint_preview(&painter, preview, palette);
    }

    if let Some(icon) = cursor_for(controller, &layout, hover) {
        ui.ctx().set_cursor_icon(icon);
    }

    GridViewResult { events }
}

/// Apply one frame of pointer input to the controller.
pub fn handle_input(
    controller: &mut GridController,
    columns: &WeekColumns,
    appointments: &[Appointment],
    input: PointerInput,
) -> Vec<GridEvent> {
    let mut events = Vec::new();

    if input.drag_started {
        if let Some(origin) = input.press_origin.or(input.pos) {
            begin_gesture(controller, columns, appointments, origin);
        }
    }

    if controller.is_active() {
        if input.escape {
            controller.cancel();
            return events;
        }
        if let Some(pos) = input.pos {
            controller.update(pos);
        }
    }

    if input.drag_stopped {
        match controller.release() {
            GestureOutcome::Committed(request) => events.push(GridEvent::Commit(request)),
            GestureOutcome::Rejected(placement) => {
                log::info!("Drop on {:?} rejected, nothing committed", placement)
            }
            _ => {}
        }
    } else if input.clicked && !controller.is_active() {
        let cell = input
            .pos
            .and_then(|pos| controller.empty_cell_at(columns, appointments, pos));
        if let Some((day, slot)) = cell {
            events.push(GridEvent::CellClicked { day, slot });
        }
    }

    events
}

fn begin_gesture(
    controller: &mut GridController,
    columns: &WeekColumns,
    appointments: &[Appointment],
    origin: Pos2,
) {
    let layout = layout_week(
        controller.grid(),
        controller.geometry(),
        columns,
        appointments,
        None,
    );
    let Some(block) = layout.block_at(origin) else {
        return;
    };
    let Some(id) = block.id else {
        log::debug!("Ignoring drag on unsaved appointment");
        return;
    };

    let result = if resize::hits_handle(block.rect, origin) {
        controller.begin_resize(columns, appointments, id, origin)
    } else {
        controller.begin_move(columns, appointments, id, origin)
    };
    if let Err(err) = result {
        log::warn!("Could not start gesture: {}", err);
    }
}

fn paint_header(
    painter: &Painter,
    controller: &GridController,
    columns: &WeekColumns,
    palette: &GridPalette,
) {
    let today = Local::now().date_naive();
    let geometry = controller.geometry();

    for (column, date) in columns.days().iter().enumerate() {
        let rect = geometry.header_rect(column);
        let fill = if *date == today {
            palette.today_header_bg
        } else {
            palette.header_bg
        };
        painter.rect_filled(rect, 0.0, fill);
        painter.line_segment(
            [rect.right_top(), rect.right_bottom()],
            Stroke::new(1.0, palette.hour_line),
        );
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            format_column_header(*date),
            FontId::proportional(13.0),
            palette.header_text,
        );
    }
}

fn paint_labels(painter: &Painter, controller: &GridController, palette: &GridPalette) {
    let grid = controller.grid();
    let geometry = controller.geometry();

    for slot in 0..grid.slot_count() {
        let on_hour = grid.slot_start_minute(slot) % 60 == 0;
        // Quarter labels only when rows are tall enough to read them
        if !on_hour && geometry.cell_height < 18.0 {
            continue;
        }
        let rect = geometry.label_rect(slot);
        painter.text(
            Pos2::new(rect.right() - TEXT_PADDING, rect.top()),
            Align2::RIGHT_TOP,
            grid.slot_to_label(slot),
            FontId::proportional(if on_hour { 12.0 } else { 10.0 }),
            palette.label_text,
        );
    }
}

fn paint_cells(
    painter: &Painter,
    controller: &GridController,
    columns: &WeekColumns,
    layout: &GridLayout,
    hover: Option<Pos2>,
    palette: &GridPalette,
) {
    let grid = controller.grid();
    let idle = !controller.is_active();

    for cell in &layout.cells {
        let weekend = columns.date(cell.cell.day).map_or(false, is_weekend);
        let fill = if weekend {
            palette.weekend_bg
        } else {
            palette.regular_bg
        };
        painter.rect_filled(cell.rect, 0.0, fill);

        let line = if grid.slot_start_minute(cell.cell.slot) % 60 == 0 {
            palette.hour_line
        } else {
            palette.slot_line
        };
        painter.line_segment(
            [cell.rect.left_top(), cell.rect.right_top()],
            Stroke::new(1.0, line),
        );
        painter.line_segment(
            [cell.rect.right_top(), cell.rect.right_bottom()],
            Stroke::new(1.0, palette.hour_line),
        );

        if layout.drop_target == Some(cell.cell) {
            painter.rect_filled(cell.rect, 0.0, palette.drop_target);
        } else if idle
            && cell.role == CellRole::Empty
            && hover.map_or(false, |pos| cell.rect.contains(pos))
        {
            painter.rect_filled(cell.rect, 0.0, palette.hover_overlay);
        }
    }
}

fn paint_blocks(
    painter: &Painter,
    controller: &GridController,
    appointments: &[Appointment],
    layout: &GridLayout,
    hover: Option<Pos2>,
    palette: &GridPalette,
) {
    let idle = !controller.is_active();
    let hovered_block = hover.and_then(|pos| layout.block_at(pos));

    for block in &layout.blocks {
        let Some(appointment) = appointments.get(block.appointment) else {
            continue;
        };
        let rect = block.rect.shrink2(Vec2::new(2.0, 1.0));

        if block.is_subject {
            // Original position stays visible while the preview moves
            painter.rect_filled(rect, Rounding::same(BLOCK_ROUNDING), palette.ghost);
            painter.rect_stroke(
                rect,
                Rounding::same(BLOCK_ROUNDING),
                Stroke::new(1.0, palette.slot_line),
            );
            continue;
        }

        let fill = palette.block_fill(appointment.color.as_deref());
        painter.rect_filled(rect, Rounding::same(BLOCK_ROUNDING), fill);
        if block.clipped {
            painter.line_segment(
                [rect.left_bottom(), rect.right_bottom()],
                Stroke::new(2.0, palette.preview_illegal),
            );
        }
        paint_block_text(painter, block, &appointment.label, rect, palette);

        let hovered = hovered_block.map_or(false, |h| h.appointment == block.appointment);
        if idle && hovered && block.id.is_some() {
            let on_handle = hover.map_or(false, |pos| resize::hits_handle(block.rect, pos));
            resize::draw_handle(painter, rect, on_handle, palette.block_text);
        }
    }
}

fn paint_block_text(
    painter: &Painter,
    block: &BlockLayout,
    label: &str,
    rect: Rect,
    palette: &GridPalette,
) {
    let clipped = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    let top_left = rect.left_top() + Vec2::new(TEXT_PADDING, 2.0);

    clipped.text(
        top_left,
        Align2::LEFT_TOP,
        label,
        FontId::proportional(12.0),
        palette.block_text,
    );
    if block.span > 1 {
        clipped.text(
            top_left + Vec2::new(0.0, 14.0),
            Align2::LEFT_TOP,
            format!("{} - {}", block.start_label, block.end_label),
            FontId::proportional(10.0),
            palette.block_text,
        );
    }
}

fn paint_preview(painter: &Painter, preview: &PreviewLayout, palette: &GridPalette) {
    let fill = if preview.legal {
        palette.preview_legal
    } else {
        palette.preview_illegal
    };
    let rect = preview.rect.shrink2(Vec2::new(2.0, 1.0));

    painter.rect_filled(rect, Rounding::same(BLOCK_ROUNDING), fill);
    painter.rect_stroke(
        rect,
        Rounding::same(BLOCK_ROUNDING),
        Stroke::new(1.5, fill.to_opaque()),
    );
    painter.text(
        rect.left_top() + Vec2::new(TEXT_PADDING, 2.0),
        Align2::LEFT_TOP,
        format!("{} - {}", preview.start_label, preview.end_label),
        FontId::proportional(11.0),
        palette.header_text,
    );
}

fn cursor_for(
    controller: &GridController,
    layout: &GridLayout,
    hover: Option<Pos2>,
) -> Option<CursorIcon> {
    if let Some(session) = controller.session() {
        return Some(match session.kind() {
            DragKind::Move { .. } => CursorIcon::Grabbing,
            DragKind::Resize { .. } => resize::CURSOR,
        });
    }

    let pos = hover?;
    let block = layout.block_at(pos)?;
    block.id?;
    if resize::hits_handle(block.rect, pos) {
        Some(resize::CURSOR)
    } else {
        Some(CursorIcon::Grab)
    }
}
