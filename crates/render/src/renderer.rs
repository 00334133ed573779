use glam::{Mat4, Vec3};
use skyline_common::Viewpoint;
use skyline_grid::CellCoord;
use skyline_kernel::City;

use crate::batch::{BatchError, StaticBatch};

/// Camera configuration for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from_viewpoint(&Viewpoint::default())
    }
}

impl RenderView {
    pub fn from_viewpoint(viewpoint: &Viewpoint) -> Self {
        Self {
            eye: viewpoint.position,
            target: viewpoint.target(),
            up: viewpoint.up(),
            fov_degrees: 60.0,
            aspect: 4.0 / 3.0,
            near: 0.01,
            far: 2000.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// World → clip transform for the current eye. Rendering only; collision
    /// never reads it.
    pub fn eye_transform(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A backend batches the city once in [`prepare`](Self::prepare), then
/// produces a frame each time a redraw has been requested. It never mutates
/// the city or the viewpoint.
pub trait RenderAdapter {
    /// The output type produced for one frame.
    type Frame;

    /// Build static geometry for `city`. Called once before the first frame.
    fn prepare(&mut self, city: &City) -> Result<(), BatchError>;

    /// Mark the next [`frame`](Self::frame) call as needing a draw.
    fn request_redraw(&mut self);

    fn redraw_pending(&self) -> bool;

    /// Draw from `view` if a redraw is pending, clearing the request.
    fn frame(&mut self, view: &RenderView) -> Option<Self::Frame>;
}

/// Debug text renderer, standing in for a GPU backend.
///
/// Produces a camera summary plus a top-down height map of the city, with
/// the cell under the eye marked `@`. Rows run from the far edge (largest
/// `z`) down to `z = 0`; columns run along `x`.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    batch: Option<StaticBatch>,
    /// Map glyphs per grid row, `z` descending.
    rows: Vec<Vec<char>>,
    side: u32,
    extent: f32,
    redraw: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self) -> Option<&StaticBatch> {
        self.batch.as_ref()
    }

    /// Single map glyph for a roof height: whole units, `+` from 10 up.
    fn glyph(height: Option<f32>) -> char {
        match height {
            None => '.',
            Some(h) if h >= 10.0 => '+',
            Some(h) => char::from_digit(h as u32, 10).unwrap_or('+'),
        }
    }

    fn eye_cell(&self, eye: Vec3) -> Option<CellCoord> {
        if !(eye.x >= 0.0 && eye.z >= 0.0 && eye.x < self.extent && eye.z < self.extent) {
            return None;
        }
        let size = skyline_grid::CELL_SIZE;
        Some(CellCoord::new((eye.x / size) as u32, (eye.z / size) as u32))
    }

    fn draw(&self, view: &RenderView) -> String {
        let mut out = String::new();
        let quads = self.batch.as_ref().map_or(0, StaticBatch::quad_count);
        out.push_str(&format!(
            "=== City {0}x{0} ({quads} quads) ===\n",
            self.side
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        let eye_cell = self.eye_cell(view.eye);
        for (i, row) in self.rows.iter().enumerate() {
            let z = self.side - 1 - i as u32;
            let line: String = row
                .iter()
                .enumerate()
                .map(|(x, c)| {
                    if eye_cell == Some(CellCoord::new(x as u32, z)) {
                        '@'
                    } else {
                        *c
                    }
                })
                .collect();
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl RenderAdapter for DebugTextRenderer {
    type Frame = String;

    fn prepare(&mut self, city: &City) -> Result<(), BatchError> {
        let grid = city.grid();
        let side = grid.side_length();
        self.batch = Some(StaticBatch::build(city)?);
        self.side = side;
        self.extent = grid.extent();
        self.rows = (0..side)
            .rev()
            .map(|z| {
                (0..side)
                    .map(|x| {
                        let roof = grid
                            .id_of(CellCoord::new(x, z))
                            .and_then(|id| grid.height_of(id));
                        Self::glyph(roof)
                    })
                    .collect()
            })
            .collect();
        self.redraw = true;
        Ok(())
    }

    fn request_redraw(&mut self) {
        self.redraw = true;
    }

    fn redraw_pending(&self) -> bool {
        self.redraw
    }

    fn frame(&mut self, view: &RenderView) -> Option<String> {
        if !self.redraw {
            return None;
        }
        self.redraw = false;
        Some(self.draw(view))
    }
}
