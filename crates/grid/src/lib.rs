//! City grid: square cell layout, occupancy and building heights.
//!
//! # Invariants
//! - The grid is square; every cell has a 2×2 footprint in world units.
//! - A cell id is only ever produced for coordinates inside the grid, so
//!   occupancy and height storage is never indexed out of range.
//! - The model is read-only once built.

mod error;
mod model;

pub use error::GridError;
pub use model::{CELL_SIZE, CellCoord, CellId, GridModel, MAX_SIDE_LENGTH, validate_side_length};

pub fn crate_info() -> &'static str {
    "skyline-grid v0.1.0"
}
