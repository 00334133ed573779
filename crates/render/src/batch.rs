use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use skyline_kernel::City;

use crate::textures::TextureSlot;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Contiguous run of indices drawn with one texture bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub slot: TextureSlot,
    pub first_index: u32,
    pub index_count: u32,
}

impl DrawRange {
    pub fn quad_count(&self) -> u32 {
        self.index_count / INDICES_PER_QUAD
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("batch needs {0} vertices, more than 32-bit indices can address")]
    TooManyVertices(usize),
}

const INDICES_PER_QUAD: u32 = 6;

/// Textured rectangle: `origin`, `origin + u`, `origin + u + v`, `origin + v`.
/// `u × v` points out of the visible side.
#[derive(Debug, Clone, Copy)]
struct Quad {
    origin: Vec3,
    u: Vec3,
    v: Vec3,
}

impl Quad {
    fn normal(&self) -> Vec3 {
        self.u.cross(self.v).normalize()
    }

    /// Texture coordinates span `[0, 1]` across the face whatever its size.
    fn vertices(&self) -> [Vertex; 4] {
        let n = self.normal().to_array();
        let corner = |p: Vec3, uv: [f32; 2]| Vertex {
            position: p.to_array(),
            normal: n,
            uv,
        };
        [
            corner(self.origin, [0.0, 0.0]),
            corner(self.origin + self.u, [1.0, 0.0]),
            corner(self.origin + self.u + self.v, [1.0, 1.0]),
            corner(self.origin + self.v, [0.0, 1.0]),
        ]
    }
}

/// All static city geometry: ground plane, four walls and a roof per
/// building, grouped by texture so each texture is bound once per frame.
#[derive(Debug, Clone, Default)]
pub struct StaticBatch {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    ranges: Vec<DrawRange>,
}

impl StaticBatch {
    pub fn build(city: &City) -> Result<Self, BatchError> {
        let _span = tracing::info_span!("build_static_batch", buildings = city.building_count()).entered();

        let grid = city.grid();
        let extent = grid.extent();
        let mut buckets: BTreeMap<TextureSlot, Vec<Quad>> = BTreeMap::new();

        buckets.entry(TextureSlot::Ground).or_default().push(Quad {
            origin: Vec3::new(0.0, 0.0, extent),
            u: Vec3::X * extent,
            v: -Vec3::Z * extent,
        });

        for building in city.buildings() {
            let (x0, z0) = building.coord.origin();
            let size = skyline_grid::CELL_SIZE;
            let (x1, z1) = (x0 + size, z0 + size);
            let up = Vec3::Y * building.height;

            let walls = buckets.entry(TextureSlot::Wall(building.facade)).or_default();
            walls.extend([
                Quad { origin: Vec3::new(x0, 0.0, z1), u: Vec3::X * size, v: up },
                Quad { origin: Vec3::new(x1, 0.0, z0), u: -Vec3::X * size, v: up },
                Quad { origin: Vec3::new(x1, 0.0, z1), u: -Vec3::Z * size, v: up },
                Quad { origin: Vec3::new(x0, 0.0, z0), u: Vec3::Z * size, v: up },
            ]);
            buckets.entry(TextureSlot::Roof).or_default().push(Quad {
                origin: Vec3::new(x0, building.height, z1),
                u: Vec3::X * size,
                v: -Vec3::Z * size,
            });
        }

        let quads: usize = buckets.values().map(Vec::len).sum();
        let vertex_count = quads * 4;
        if u32::try_from(vertex_count).is_err() {
            return Err(BatchError::TooManyVertices(vertex_count));
        }

        let mut batch = Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(quads * INDICES_PER_QUAD as usize),
            ranges: Vec::with_capacity(buckets.len()),
        };
        for (slot, quads) in buckets {
            let first_index = batch.indices.len() as u32;
            for quad in &quads {
                batch.push_quad(quad);
            }
            batch.ranges.push(DrawRange {
                slot,
                first_index,
                index_count: batch.indices.len() as u32 - first_index,
            });
        }

        tracing::debug!(
            vertices = batch.vertices.len(),
            indices = batch.indices.len(),
            ranges = batch.ranges.len(),
            "static batch built"
        );
        Ok(batch)
    }

    fn push_quad(&mut self, quad: &Quad) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(quad.vertices());
        self.indices
            .extend([0, 1, 2, 0, 2, 3].into_iter().map(|i| base + i));
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn ranges(&self) -> &[DrawRange] {
        &self.ranges
    }

    pub fn range(&self, slot: TextureSlot) -> Option<&DrawRange> {
        self.ranges.iter().find(|r| r.slot == slot)
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / INDICES_PER_QUAD as usize
    }

    /// Vertex data ready for a GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
