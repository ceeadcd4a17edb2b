// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon predicates over planar footprint rings
//!
//! Rings are ordered, implicitly closed vertex slices in the local
//! east/north frame. All predicates assume counter-clockwise winding
//! (positive signed area); [`normalize_winding`] puts source rings into
//! that form, so both input winding orders behave identically.

use nalgebra::Point2;

/// Cross-product magnitude below which two edges count as collinear
pub const COLLINEAR_EPSILON: f64 = 1e-9;

const RAY_EPSILON: f64 = 1e-9;

#[inline]
fn neighbors(len: usize, i: usize) -> (usize, usize) {
    ((i + len - 1) % len, (i + 1) % len)
}

/// 2D cross product of (prev − v_i) and (next − v_i)
#[inline]
pub fn cross_at(ring: &[Point2<f64>], i: usize) -> f64 {
    let (prev, next) = neighbors(ring.len(), i);
    let a = ring[prev] - ring[i];
    let b = ring[next] - ring[i];
    a.x * b.y - a.y * b.x
}

/// Whether vertex `i` is convex (strictly negative cross product in a
/// counter-clockwise ring)
#[inline]
pub fn is_convex_vertex(ring: &[Point2<f64>], i: usize) -> bool {
    cross_at(ring, i) < 0.0
}

/// Whether every vertex of the ring is convex
pub fn is_convex_ring(ring: &[Point2<f64>]) -> bool {
    (0..ring.len()).all(|i| is_convex_vertex(ring, i))
}

/// Whether `p` lies strictly right of the oriented line a→b
#[inline]
pub fn point_right_of_line(a: Point2<f64>, b: Point2<f64>, p: Point2<f64>) -> bool {
    let u = a - p;
    let v = b - p;
    u.x * v.y - u.y * v.x < 0.0
}

/// Whether `p` lies inside the triangle, for either winding order.
///
/// The three half-plane tests must agree (all right or all left).
/// Degenerate zero-area triangles are the caller's responsibility.
pub fn point_in_triangle(triangle: &[Point2<f64>; 3], p: Point2<f64>) -> bool {
    let r1 = point_right_of_line(triangle[0], triangle[1], p);
    let r2 = point_right_of_line(triangle[1], triangle[2], p);
    let r3 = point_right_of_line(triangle[2], triangle[0], p);

    r1 == r2 && r2 == r3
}

/// Ear test: vertex `i` is convex and no other ring vertex lies inside
/// the triangle (prev, i, next).
///
/// O(n) per candidate; the iterative re-scan in the triangulator makes
/// the whole clip O(n²), which is fine for footprint-sized rings.
pub fn is_ear(ring: &[Point2<f64>], i: usize) -> bool {
    if !is_convex_vertex(ring, i) {
        return false;
    }

    let (prev, next) = neighbors(ring.len(), i);
    let triangle = [ring[prev], ring[i], ring[next]];
    for (j, &vertex) in ring.iter().enumerate() {
        if j == i || j == prev || j == next {
            continue;
        }
        if point_in_triangle(&triangle, vertex) {
            return false;
        }
    }

    true
}

/// Whether vertex `i` sits (near-)exactly on the segment between its
/// neighbors and can be removed without changing the shape
#[inline]
pub fn is_collinear_vertex(ring: &[Point2<f64>], i: usize, epsilon: f64) -> bool {
    let (prev, next) = neighbors(ring.len(), i);
    let a = ring[i] - ring[prev];
    let b = ring[next] - ring[i];
    (a.x * b.y - a.y * b.x).abs() < epsilon
}

/// How an upward ray relates to one ring edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RayCrossing {
    None,
    /// Ray passes exactly through the edge's start vertex
    AtStart,
    /// Ray passes exactly through the edge's end vertex (recorded at the
    /// next edge's start instead)
    AtEnd,
    /// Ray crosses the edge interior
    Proper,
}

/// Classify the crossing of the upward ray from `point` with the edge
/// start→end.
fn ray_crossing(start: Point2<f64>, end: Point2<f64>, point: Point2<f64>) -> RayCrossing {
    // Edge parallel to the ray: by convention no crossing (vertex hits
    // on its endpoints are picked up by the adjacent edges)
    if (start.x - end.x).abs() < RAY_EPSILON {
        return RayCrossing::None;
    }

    if (point.x - start.x).abs() <= RAY_EPSILON {
        return if point.y < start.y {
            RayCrossing::AtStart
        } else {
            RayCrossing::None
        };
    }
    if (point.x - end.x).abs() <= RAY_EPSILON {
        return if point.y < end.y {
            RayCrossing::AtEnd
        } else {
            RayCrossing::None
        };
    }

    // Strictly between the endpoints in x?
    if (point.x - start.x) * (point.x - end.x) > 0.0 {
        return RayCrossing::None;
    }

    let slope = (end.y - start.y) / (end.x - start.x);
    let y_at_point = start.y + slope * (point.x - start.x);
    if y_at_point > point.y {
        RayCrossing::Proper
    } else {
        RayCrossing::None
    }
}

/// Ray-casting point-in-polygon test (upward ray, odd crossing count).
///
/// A crossing exactly through a vertex is counted once, at the edge
/// whose start vertex was hit, and only when the two ring neighbors of
/// that vertex lie on opposite sides of the ray; a touched local
/// extremum is not a crossing.
pub fn point_in_polygon(ring: &[Point2<f64>], point: Point2<f64>) -> bool {
    let n = ring.len();
    let mut crossings = 0usize;

    for i in 0..n {
        let (prev, next) = neighbors(n, i);
        let start = ring[i];
        let end = ring[next];

        match ray_crossing(start, end, point) {
            RayCrossing::Proper => crossings += 1,
            RayCrossing::AtStart => {
                if (ring[prev].x > start.x) != (end.x > start.x) {
                    crossings += 1;
                }
            }
            RayCrossing::AtEnd | RayCrossing::None => {}
        }
    }

    crossings % 2 == 1
}

/// Signed area via the shoelace formula: positive for counter-clockwise
/// rings in the east/north frame
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Absolute ring area
#[inline]
pub fn ring_area(ring: &[Point2<f64>]) -> f64 {
    signed_area(ring).abs()
}

/// Reverse the ring in place if it is not counter-clockwise
pub fn normalize_winding(ring: &mut [Point2<f64>]) {
    if signed_area(ring) < 0.0 {
        ring.reverse();
    }
}
