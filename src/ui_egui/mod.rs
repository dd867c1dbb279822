mod app;
pub mod grid_view;
pub mod palette;
pub mod resize;

pub use app::SchedulerApp;
