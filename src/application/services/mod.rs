//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod chart;
mod loader;

pub use chart::{
    ChartRequest, ChartResponse, ChartService, MOVE_SUCCESS, REDO_SUCCESS, UNDO_SUCCESS,
};
pub use loader::{ChartFormat, ChartLoader};
