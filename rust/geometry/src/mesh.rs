// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh buffer accumulation
//!
//! Triangle-soup buffers that roof triangulation and wall building
//! append into. The one invariant everything depends on: indices are
//! rebased by the buffer's current vertex count before insertion, so
//! repeated appends into a shared buffer stay valid.

use nalgebra::{Point3, Vector3};

/// Growing triangle-soup buffer: positions (xyz), normals (xyz),
/// texture coordinates (uv), triangle indices.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffer {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v)
    pub uvs: Vec<f32>,
    /// Triangle indices (i0, i1, i2), always < vertex_count
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::with_capacity(vertex_count * 2),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal and texture coordinate
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>, uv: [f64; 2]) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);

        self.uvs.push(uv[0] as f32);
        self.uvs.push(uv[1] as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Merge another buffer into this one, rebasing its indices by the
    /// current vertex count
    pub fn merge(&mut self, other: &MeshBuffer) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.vertex_count() as u32;

        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.uvs.reserve(other.uvs.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_triangle(z: f64) -> MeshBuffer {
        let mut mesh = MeshBuffer::new();
        let normal = Vector3::z();
        mesh.add_vertex(Point3::new(0.0, 0.0, z), normal, [0.0, 0.0]);
        mesh.add_vertex(Point3::new(1.0, 0.0, z), normal, [1.0, 0.0]);
        mesh.add_vertex(Point3::new(0.0, 1.0, z), normal, [0.0, 1.0]);
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    #[test]
    fn test_empty_buffer() {
        let mesh = MeshBuffer::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex_and_triangle() {
        let mesh = one_triangle(0.0);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.uvs.len(), 6);
        assert_eq!(mesh.normals.len(), 9);
    }

    #[test]
    fn test_merge_rebases_indices() {
        let mut mesh = one_triangle(0.0);
        let other = one_triangle(5.0);
        mesh.merge(&other);

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(&mesh.indices, &[0, 1, 2, 3, 4, 5]);
        // Every index stays valid
        let max = *mesh.indices.iter().max().unwrap() as usize;
        assert!(max < mesh.vertex_count());
    }

    #[test]
    fn test_merge_empty_is_noop() {
        let mut mesh = one_triangle(0.0);
        mesh.merge(&MeshBuffer::new());
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_bounds() {
        let mut mesh = one_triangle(0.0);
        mesh.merge(&one_triangle(5.0));
        let (min, max) = mesh.bounds();
        assert_eq!(min.z, 0.0);
        assert_eq!(max.z, 5.0);
        assert_eq!(max.x, 1.0);
    }
}
