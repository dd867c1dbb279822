//! Pointer coordinates ↔ grid cells.

use egui::{Pos2, Rect, Vec2};

use super::time_grid::TimeGrid;
use super::week::DAYS_PER_WEEK;
use crate::models::placement::GridCell;
use crate::models::settings::GridSettings;

/// Fixed cell geometry of the rendered grid.
///
/// The grid is laid out as a header row on top, a time label column on the
/// left, and `day_count × slot_count` equally sized cells below/right of them.
/// `origin` is the screen position of the grid's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub origin: Pos2,
    pub label_column_width: f32,
    pub header_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub day_count: usize,
    pub slot_count: usize,
}

impl GridGeometry {
    pub fn from_settings(settings: &GridSettings, grid: &TimeGrid) -> Self {
        Self {
            origin: Pos2::ZERO,
            label_column_width: settings.label_column_width,
            header_height: settings.header_height,
            cell_width: settings.cell_width,
            cell_height: settings.cell_height,
            day_count: DAYS_PER_WEEK,
            slot_count: grid.slot_count(),
        }
    }

    pub fn with_origin(self, origin: Pos2) -> Self {
        Self { origin, ..self }
    }

    /// The cell under `point`, or `None` over the header, the label column,
    /// outside the grid, or for non-finite coordinates.
    pub fn pointer_to_cell(&self, point: Pos2) -> Option<GridCell> {
        let rel = point - self.origin;
        if !rel.x.is_finite() || !rel.y.is_finite() {
            return None;
        }
        if self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return None;
        }
        if rel.y < self.header_height || rel.x < self.label_column_width {
            return None;
        }

        let day = ((rel.x - self.label_column_width) / self.cell_width).floor();
        let slot = ((rel.y - self.header_height) / self.cell_height).floor();
        if day >= self.day_count as f32 || slot >= self.slot_count as f32 {
            return None;
        }

        Some(GridCell::new(day as usize, slot as usize))
    }

    pub fn column_left(&self, day: usize) -> f32 {
        self.origin.x + self.label_column_width + day as f32 * self.cell_width
    }

    pub fn row_top(&self, slot: usize) -> f32 {
        self.origin.y + self.header_height + slot as f32 * self.cell_height
    }

    pub fn cell_rect(&self, cell: GridCell) -> Rect {
        self.block_rect(cell.day, cell.slot, 1)
    }

    /// One rect covering `span` rows of a column, starting at `start_slot`.
    pub fn block_rect(&self, day: usize, start_slot: usize, span: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.column_left(day), self.row_top(start_slot)),
            Vec2::new(self.cell_width, span as f32 * self.cell_height),
        )
    }

    pub fn header_rect(&self, day: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.column_left(day), self.origin.y),
            Vec2::new(self.cell_width, self.header_height),
        )
    }

    pub fn label_rect(&self, slot: usize) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.origin.x, self.row_top(slot)),
            Vec2::new(self.label_column_width, self.cell_height),
        )
    }

    /// Full size including header and label column.
    pub fn total_size(&self) -> Vec2 {
        Vec2::new(
            self.label_column_width + self.day_count as f32 * self.cell_width,
            self.header_height + self.slot_count as f32 * self.cell_height,
        )
    }

    /// The cell area only (no header, no labels).
    pub fn cells_rect(&self) -> Rect {
        Rect::from_min_max(
            Pos2::new(self.column_left(0), self.row_top(0)),
            self.origin + self.total_size(),
        )
    }
}
