//! Vertex data for scene meshes.

use glam::Vec3;

/// Indexed triangle geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list, counter-clockwise front faces
    pub indices: Vec<u32>,
}

impl Geometry {
    /// A single-segment plane in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        Self::plane_segmented(width, height, 1, 1)
    }

    /// A plane in the XY plane facing +Z, centered on the origin and split
    /// into a grid of `width_segments × height_segments` quads.
    ///
    /// Rows are emitted top to bottom; UV `(0, 1)` is the top-left corner.
    pub fn plane_segmented(
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> Self {
        let grid_x = width_segments.max(1);
        let grid_y = height_segments.max(1);
        let grid_x1 = grid_x + 1;
        let grid_y1 = grid_y + 1;

        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;
        let half_width = width / 2.0;
        let half_height = height / 2.0;

        let vertex_count = (grid_x1 * grid_y1) as usize;
        let mut geometry = Self {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity((grid_x * grid_y * 6) as usize),
        };

        for iy in 0..grid_y1 {
            let y = iy as f32 * segment_height - half_height;
            for ix in 0..grid_x1 {
                let x = ix as f32 * segment_width - half_width;
                geometry.positions.push(Vec3::new(x, -y, 0.0));
                geometry.normals.push(Vec3::Z);
                geometry.uvs.push([
                    ix as f32 / grid_x as f32,
                    1.0 - iy as f32 / grid_y as f32,
                ]);
            }
        }

        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + grid_x1 * iy;
                let b = ix + grid_x1 * (iy + 1);
                let c = (ix + 1) + grid_x1 * (iy + 1);
                let d = (ix + 1) + grid_x1 * iy;
                geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        geometry
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}
