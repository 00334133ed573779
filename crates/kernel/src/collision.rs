use glam::Vec3;
use serde::Serialize;
use skyline_grid::{CellId, GridModel};

/// How a proposed translation was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Committed as proposed.
    Accepted,
    /// Committed with the eye lifted to ground clearance.
    Clamped,
    /// Horizontal part reverted at the map edge. A ground clamp still applies.
    OutOfBounds { clamped: bool },
    /// Candidate was inside a building; the pre-move position is kept.
    Blocked { cell: CellId },
}

impl Verdict {
    /// Whether any part of the proposal was refused.
    pub fn is_rejection(self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::Blocked { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub position: Vec3,
    pub verdict: Verdict,
}

/// Decides whether a translation keeps the eye out of solid geometry.
///
/// Checks run in a fixed order: ground clamp, map bounds, building volume.
/// The cell under the eye is only looked up once the bounds check has passed
/// or reverted the horizontal position, so no lookup is made off the map.
#[derive(Debug, Clone, Copy)]
pub struct CollisionValidator<'a> {
    grid: &'a GridModel,
    ground_clearance: f32,
}

impl<'a> CollisionValidator<'a> {
    pub fn new(grid: &'a GridModel, ground_clearance: f32) -> Self {
        Self {
            grid,
            ground_clearance,
        }
    }

    pub fn ground_clearance(&self) -> f32 {
        self.ground_clearance
    }

    /// Settle a move from `from` to `candidate`.
    pub fn resolve(&self, from: Vec3, candidate: Vec3) -> Resolution {
        let mut next = candidate;

        // NaN heights clamp as well.
        let clamped = !(next.y >= self.ground_clearance);
        if clamped {
            next.y = self.ground_clearance;
        }

        let in_bounds = self.grid.contains(next.x, next.z);
        if !in_bounds {
            next.x = from.x;
            next.z = from.z;
        }

        if let Some(cell) = self.solid_cell(next) {
            tracing::debug!(?from, ?candidate, cell = cell.raw(), "move blocked by building");
            return Resolution {
                position: from,
                verdict: Verdict::Blocked { cell },
            };
        }

        let verdict = if !in_bounds {
            tracing::debug!(?from, ?candidate, "move leaves the map");
            Verdict::OutOfBounds { clamped }
        } else if clamped {
            Verdict::Clamped
        } else {
            Verdict::Accepted
        };
        tracing::trace!(position = ?next, ?verdict, "move settled");
        Resolution {
            position: next,
            verdict,
        }
    }

    /// Whether `position` satisfies every viewpoint invariant.
    pub fn is_legal(&self, position: Vec3) -> bool {
        position.y >= self.ground_clearance
            && self.grid.contains(position.x, position.z)
            && self.solid_cell(position).is_none()
    }

    /// Occupied cell whose volume contains `position`. Off-grid positions
    /// (including the far map edges) are never inside a building.
    fn solid_cell(&self, position: Vec3) -> Option<CellId> {
        let cell = self.grid.cell_id(position.x, position.z)?;
        let roof = self.grid.height_of(cell)?;
        (position.y < roof).then_some(cell)
    }
}
