//! Weekly appointment grid: slot lattice, occupancy, collision checks,
//! pointer mapping and drag gestures.
//!
//! Everything in here is synchronous and free of I/O. The egui renderer in
//! `ui_egui::grid_view` drives it and the services layer persists what it
//! commits.

pub mod collision;
pub mod error;
pub mod layout;
pub mod occupancy;
pub mod pointer;
pub mod session;
pub mod time_grid;
pub mod week;

pub use collision::{can_place, PlacementRejection};
pub use error::{GestureError, GridError};
pub use layout::{layout_week, CellRole, GridLayout};
pub use occupancy::OccupancyIndex;
pub use pointer::GridGeometry;
pub use session::{CommitRequest, DragKind, DragSession, GestureOutcome, GridController, ResizeRules};
pub use time_grid::TimeGrid;
pub use week::WeekColumns;
