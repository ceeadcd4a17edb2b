// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof triangulation
//!
//! Convex rings get a fan, concave rings get iterative ear clipping
//! with collinear-point pruning. Texture coordinates are the vertex
//! position normalized within the ring's bounding box. All indices are
//! rebased by the target buffer's vertex count at emission time.

use crate::error::{Error, Result};
use crate::mesh::MeshBuffer;
use crate::polygon::{is_collinear_vertex, is_convex_ring, is_ear, normalize_winding};
use nalgebra::{Point2, Point3, Vector3};
use tracing::warn;

/// Bounding-box UV normalization for one ring
#[derive(Debug, Clone, Copy)]
struct UvRect {
    min_x: f64,
    min_y: f64,
    inv_width: f64,
    inv_height: f64,
}

impl UvRect {
    fn from_ring(ring: &[Point2<f64>]) -> Self {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in ring {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let width = max_x - min_x;
        let height = max_y - min_y;
        Self {
            min_x,
            min_y,
            inv_width: if width > 0.0 { 1.0 / width } else { 0.0 },
            inv_height: if height > 0.0 { 1.0 / height } else { 0.0 },
        }
    }

    #[inline]
    fn uv(&self, p: Point2<f64>) -> [f64; 2] {
        [
            (p.x - self.min_x) * self.inv_width,
            (p.y - self.min_y) * self.inv_height,
        ]
    }
}

/// Twice the signed triangle area
#[inline]
fn triangle_cross(triangle: &[Point2<f64>; 3]) -> f64 {
    let a = triangle[1] - triangle[0];
    let b = triangle[2] - triangle[0];
    a.x * b.y - a.y * b.x
}

/// Append one roof triangle as a fresh 3-vertex index range
fn emit_triangle(mesh: &mut MeshBuffer, triangle: &[Point2<f64>; 3], rect: &UvRect, height: f64) {
    let base = mesh.vertex_count() as u32;
    let normal = Vector3::z();
    for &p in triangle {
        mesh.add_vertex(Point3::new(p.x, p.y, height), normal, rect.uv(p));
    }
    mesh.add_triangle(base, base + 1, base + 2);
}

/// Triangulate a footprint ring into a roof surface at the given height.
///
/// The ring is copied and normalized to counter-clockwise winding, so
/// both source winding orders produce the same result. Returns the
/// number of triangles appended; for a simple ring without collinear
/// vertices that is exactly `n - 2`.
///
/// `epsilon` bounds the collinear-vertex pruning (cross-product
/// magnitude, i.e. twice the triangle area).
pub fn build_roof(
    ring: &[Point2<f64>],
    height: f64,
    epsilon: f64,
    mesh: &mut MeshBuffer,
) -> Result<usize> {
    if ring.len() < 3 {
        return Err(Error::InvalidRing(format!(
            "roof ring has {} vertices, need at least 3",
            ring.len()
        )));
    }

    let mut work = ring.to_vec();
    normalize_winding(&mut work);
    let rect = UvRect::from_ring(&work);

    if is_convex_ring(&work) {
        return Ok(fan_triangulate(&work, &rect, height, mesh));
    }

    ear_clip(work, &rect, height, epsilon, mesh)
}

/// Fan triangulation for a convex ring: the ring's vertices are
/// appended once and fanned from vertex 0.
fn fan_triangulate(
    ring: &[Point2<f64>],
    rect: &UvRect,
    height: f64,
    mesh: &mut MeshBuffer,
) -> usize {
    let base = mesh.vertex_count() as u32;
    let normal = Vector3::z();
    for &p in ring {
        mesh.add_vertex(Point3::new(p.x, p.y, height), normal, rect.uv(p));
    }

    let count = ring.len();
    for i in 0..count - 2 {
        mesh.add_triangle(base, base + i as u32 + 1, base + i as u32 + 2);
    }
    count - 2
}

/// Iterative ear clipping over a mutable vertex worklist.
///
/// Scans from index 0; a collinear vertex is pruned, an ear is emitted
/// and its vertex removed, and either way the scan restarts at 0 so
/// removal never invalidates a live index. A full scan that removes
/// nothing means the ring is not a simple polygon; that fails loudly
/// instead of looping forever.
fn ear_clip(
    mut work: Vec<Point2<f64>>,
    rect: &UvRect,
    height: f64,
    epsilon: f64,
    mesh: &mut MeshBuffer,
) -> Result<usize> {
    let mut emitted = 0usize;

    while work.len() > 3 {
        let mut removed = false;

        let mut index = 0;
        while index < work.len() {
            if is_collinear_vertex(&work, index, epsilon) {
                work.remove(index);
                removed = true;
                break;
            }

            if is_ear(&work, index) {
                let prev = (index + work.len() - 1) % work.len();
                let next = (index + 1) % work.len();
                let triangle = [work[prev], work[index], work[next]];

                // Collinear pruning should have made this impossible
                if triangle_cross(&triangle).abs() < epsilon {
                    warn!(?triangle, "degenerate ear after pruning, skipping");
                } else {
                    emit_triangle(mesh, &triangle, rect, height);
                    emitted += 1;
                }

                work.remove(index);
                removed = true;
                break;
            }

            index += 1;
        }

        if !removed {
            return Err(Error::Triangulation(format!(
                "no clippable ear among {} remaining vertices, ring may self-intersect",
                work.len()
            )));
        }
    }

    let triangle = [work[0], work[1], work[2]];
    if triangle_cross(&triangle).abs() < epsilon {
        warn!(?triangle, "degenerate final triangle, skipping");
    } else {
        emit_triangle(mesh, &triangle, rect, height);
        emitted += 1;
    }

    if emitted == 0 {
        return Err(Error::DegenerateTriangle(
            "ring collapsed to zero-area triangles".to_string(),
        ));
    }

    Ok(emitted)
}
