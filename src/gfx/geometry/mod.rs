//! # Procedural Geometry Generation
//!
//! This module provides functions to generate the shapes the scene presets
//! are built from, so no external model file is needed for them.
//!
//! ## Supported Primitives
//!
//! - **Box**: Indexed box with shared face corners (engine box)
//! - **Custom box**: Hand-written unindexed unit box with explicit normals
//! - **Torus knot**: (p, q) torus knot with a circular tube
//! - **Helpers**: Line geometry for axes and directional lights
//!
//! ## Usage
//!
//! ```rust
//! use tattie::gfx::geometry::{generate_box, generate_torus_knot};
//!
//! let cube = generate_box(1.0, 1.0, 1.0);
//! let knot = generate_torus_knot(1.0, 0.4, 80, 20, 2, 3);
//! assert_eq!(cube.triangle_count(), 12);
//! assert!(knot.vertex_count() > 0);
//! ```

pub mod helpers;
pub mod primitives;

pub use helpers::{axes_helper, directional_light_helper, LineData};
pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves the attribute streams into the renderer's vertex format
    ///
    /// Missing normals default to +Y and missing texture coordinates to the
    /// origin.
    pub fn to_scene_format(&self) -> (Vec<Vertex3D>, Vec<u32>) {
        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coord: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }

    /// First index that points past the vertex list, if any
    pub fn out_of_range_index(&self) -> Option<u32> {
        let count = self.vertices.len();
        self.indices
            .iter()
            .copied()
            .find(|&index| index as usize >= count)
    }

    /// Averages face normals onto vertices
    ///
    /// Used for imported meshes that ship without normals. Triangles with an
    /// out-of-range index are skipped.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            if [i0, i1, i2].iter().any(|&i| i >= normals.len()) {
                continue;
            }
            let (v0, v1, v2) = (self.vertices[i0], self.vertices[i1], self.vertices[i2]);

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for index in [i0, i1, i2] {
                for axis in 0..3 {
                    normals[index][axis] += face_normal[axis];
                }
            }
        }

        for normal in normals.iter_mut() {
            let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
            if length > 0.0 {
                for c in normal.iter_mut() {
                    *c /= length;
                }
            }
        }

        self.normals = normals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_scene_format_fills_missing_attributes() {
        let data = GeometryData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        let (vertices, indices) = data.to_scene_format();
        assert_eq!(vertices.len(), 3);
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(vertices[1].normal, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[2].tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut data = GeometryData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2, 0, 2, 7],
            ..Default::default()
        };
        assert_eq!(data.out_of_range_index(), Some(7));

        // the broken triangle is ignored instead of panicking
        data.compute_vertex_normals();
        assert_eq!(data.normals.len(), 3);
        assert_eq!(data.normals[1], [0.0, 0.0, 1.0]);

        data.indices.truncate(3);
        assert_eq!(data.out_of_range_index(), None);
    }

    #[test]
    fn test_compute_vertex_normals() {
        let mut data = GeometryData {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        data.compute_vertex_normals();
        for normal in &data.normals {
            assert_eq!(*normal, [0.0, 0.0, 1.0]);
        }
    }
}
