use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Edge length of one cell in world units.
pub const CELL_SIZE: f32 = 2.0;

/// Largest accepted side length. Keeps `side²` storage bounded.
pub const MAX_SIDE_LENGTH: u32 = 4096;

/// Column (`x`) and row (`z`) of a cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: u32,
    pub z: u32,
}

impl CellCoord {
    pub fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// World-space corner with the smallest `x` and `z`.
    pub fn origin(&self) -> (f32, f32) {
        (self.x as f32 * CELL_SIZE, self.z as f32 * CELL_SIZE)
    }

    /// World-space center of the footprint.
    pub fn center(&self) -> (f32, f32) {
        let (x, z) = self.origin();
        (x + CELL_SIZE / 2.0, z + CELL_SIZE / 2.0)
    }
}

/// Flat index of a cell: `column · side + row`.
///
/// Only [`GridModel`] hands these out, and only for cells inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellId(u32);

impl CellId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Check an operator-supplied side length.
pub fn validate_side_length(requested: i64) -> Result<u32, GridError> {
    if requested <= 0 {
        return Err(GridError::InvalidGridSize(requested));
    }
    if requested > MAX_SIDE_LENGTH as i64 {
        return Err(GridError::GridTooLarge {
            requested,
            max: MAX_SIDE_LENGTH,
        });
    }
    Ok(requested as u32)
}

/// Square city layout with one optional building per cell.
///
/// Cells are addressed by `floor(x / CELL_SIZE) · side + floor(z / CELL_SIZE)`.
/// The world spans `[0, 2·side]` on both horizontal axes.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    side_length: u32,
    /// Roof height per cell; `None` for open ground.
    roofs: Vec<Option<f32>>,
}

impl GridModel {
    /// Build a grid by asking `roof` for every cell in id order
    /// (column-major over `x`, then `z`).
    pub fn from_fn<F>(side_length: i64, mut roof: F) -> Result<Self, GridError>
    where
        F: FnMut(CellCoord) -> Option<f32>,
    {
        let side = validate_side_length(side_length)?;
        let mut roofs = Vec::with_capacity((side as usize) * (side as usize));
        for x in 0..side {
            for z in 0..side {
                let coord = CellCoord::new(x, z);
                let height = roof(coord);
                if let Some(h) = height {
                    if !(h > 0.0 && h.is_finite()) {
                        return Err(GridError::InvalidHeight { coord, height: h });
                    }
                }
                roofs.push(height);
            }
        }
        tracing::trace!(side, cells = roofs.len(), "grid built");
        Ok(Self {
            side_length: side,
            roofs,
        })
    }

    /// A grid with no buildings.
    pub fn empty(side_length: i64) -> Result<Self, GridError> {
        Self::from_fn(side_length, |_| None)
    }

    pub fn side_length(&self) -> u32 {
        self.side_length
    }

    pub fn cell_count(&self) -> usize {
        self.roofs.len()
    }

    /// World extent along each horizontal axis.
    pub fn extent(&self) -> f32 {
        self.side_length as f32 * CELL_SIZE
    }

    /// Whether `(x, z)` lies on the map, edges included.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let extent = self.extent();
        (0.0..=extent).contains(&x) && (0.0..=extent).contains(&z)
    }

    /// Cell under a world position, or `None` off the grid.
    ///
    /// The far edges (`x == extent` or `z == extent`) are on the map but
    /// belong to no cell.
    pub fn cell_id(&self, x: f32, z: f32) -> Option<CellId> {
        if !(x >= 0.0 && z >= 0.0) {
            return None;
        }
        let col = (x / CELL_SIZE).floor();
        let row = (z / CELL_SIZE).floor();
        let side = self.side_length as f32;
        if col >= side || row >= side {
            return None;
        }
        self.id_of(CellCoord::new(col as u32, row as u32))
    }

    pub fn id_of(&self, coord: CellCoord) -> Option<CellId> {
        if coord.x >= self.side_length || coord.z >= self.side_length {
            return None;
        }
        Some(CellId(coord.x * self.side_length + coord.z))
    }

    pub fn coord(&self, id: CellId) -> CellCoord {
        CellCoord::new(id.0 / self.side_length, id.0 % self.side_length)
    }

    pub fn is_occupied(&self, id: CellId) -> bool {
        matches!(self.roofs.get(id.index()), Some(Some(_)))
    }

    /// Roof height of an occupied cell; `None` for open ground.
    pub fn height_of(&self, id: CellId) -> Option<f32> {
        self.roofs.get(id.index()).copied().flatten()
    }

    /// Roof height under a world position, if any.
    pub fn roof_at(&self, x: f32, z: f32) -> Option<f32> {
        self.cell_id(x, z).and_then(|id| self.height_of(id))
    }

    pub fn occupied_count(&self) -> usize {
        self.roofs.iter().filter(|r| r.is_some()).count()
    }

    pub fn max_height(&self) -> f32 {
        self.roofs.iter().flatten().copied().fold(0.0, f32::max)
    }

    /// Every cell in id order.
    pub fn cells(&self) -> impl Iterator<Item = (CellId, Option<f32>)> + '_ {
        self.roofs
            .iter()
            .enumerate()
            .map(|(i, roof)| (CellId(i as u32), *roof))
    }

    /// Occupied cells with their roof height, in id order.
    pub fn buildings(&self) -> impl Iterator<Item = (CellId, f32)> + '_ {
        self.cells()
            .filter_map(|(id, roof)| roof.map(|height| (id, height)))
    }
}
