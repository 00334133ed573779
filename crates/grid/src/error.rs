use crate::model::CellCoord;

/// Errors raised while building a grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("grid side length must be positive, got {0}")]
    InvalidGridSize(i64),
    #[error("grid side length {requested} exceeds the maximum of {max}")]
    GridTooLarge { requested: i64, max: u32 },
    #[error("building at {coord:?} has non-positive height {height}")]
    InvalidHeight { coord: CellCoord, height: f32 },
}
