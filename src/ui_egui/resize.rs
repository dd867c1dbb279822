// Resize handle
//
// Appointment blocks are resized from their bottom edge only; the start slot
// never changes during a resize.

use egui::{Color32, CursorIcon, Painter, Pos2, Rect, Stroke, Vec2};

/// Height of the bottom hit zone on blocks taller than `SMALL_BLOCK_HEIGHT`
pub const HANDLE_ZONE: f32 = 8.0;
/// Blocks shorter than this give their lower half to the handle
pub const SMALL_BLOCK_HEIGHT: f32 = 30.0;

pub const CURSOR: CursorIcon = CursorIcon::ResizeVertical;

/// Hit zone of the bottom resize handle for a block.
pub fn handle_rect(block: Rect) -> Rect {
    let zone = if block.height() < SMALL_BLOCK_HEIGHT {
        block.height() / 2.0
    } else {
        HANDLE_ZONE
    };

    Rect::from_min_size(
        Pos2::new(block.left(), block.bottom() - zone),
        Vec2::new(block.width(), zone),
    )
}

pub fn hits_handle(block: Rect, pos: Pos2) -> bool {
    handle_rect(block).contains(pos)
}

/// Short horizontal bar centred on the bottom edge.
pub fn draw_handle(painter: &Painter, block: Rect, hovered: bool, color: Color32) {
    let zone = handle_rect(block);
    let bar_width = zone.width().min(40.0);
    let y = zone.bottom() - 3.0;
    let x = zone.center().x;

    painter.line_segment(
        [
            Pos2::new(x - bar_width / 2.0, y),
            Pos2::new(x + bar_width / 2.0, y),
        ],
        Stroke::new(
            if hovered { 3.0 } else { 2.0 },
            if hovered {
                Color32::WHITE
            } else {
                Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 180)
            },
        ),
    );
}
