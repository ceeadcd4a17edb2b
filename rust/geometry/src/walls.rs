// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall construction
//!
//! Extrudes footprint edges into vertical quads. Walls are cut into
//! horizontal bands (full-height, or bottom/center/top with configured
//! margins) and each band accumulates into its own buffer so it can
//! bind its own texture.

use crate::mesh::MeshBuffer;
use nalgebra::{Point2, Point3, Vector3};

/// Buffer name for the single full-height band
pub const BAND_WALL: &str = "wall";
/// Buffer name for the bottom band
pub const BAND_BOTTOM: &str = "wall-bottom";
/// Buffer name for the center band
pub const BAND_CENTER: &str = "wall-center";
/// Buffer name for the top band
pub const BAND_TOP: &str = "wall-top";

/// How a building's walls are split vertically
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallBands {
    /// One band from ground to roof
    Single,
    /// Three bands: the top and bottom margins are fixed heights, the
    /// center takes whatever remains
    Banded { top_margin: f64, bottom_margin: f64 },
}

impl WallBands {
    /// Resolve the band intervals for a building of the given height.
    ///
    /// Returns (name, bottom, top) triples with strictly positive
    /// extent. Margins that meet or exceed the height squeeze the
    /// center band out first, then the top band.
    pub fn resolve(&self, height: f64) -> Vec<(&'static str, f64, f64)> {
        match *self {
            WallBands::Single => {
                if height > 0.0 {
                    vec![(BAND_WALL, 0.0, height)]
                } else {
                    Vec::new()
                }
            }
            WallBands::Banded {
                top_margin,
                bottom_margin,
            } => {
                let bottom_top = bottom_margin.clamp(0.0, height);
                let center_top = (height - top_margin.max(0.0)).max(bottom_top);

                let mut bands = Vec::with_capacity(3);
                if bottom_top > 0.0 {
                    bands.push((BAND_BOTTOM, 0.0, bottom_top));
                }
                if center_top > bottom_top {
                    bands.push((BAND_CENTER, bottom_top, center_top));
                }
                if height > center_top {
                    bands.push((BAND_TOP, center_top, height));
                }
                bands
            }
        }
    }
}

impl Default for WallBands {
    fn default() -> Self {
        WallBands::Single
    }
}

/// Build one wall band for a footprint ring, between the `bottom` and
/// `top` heights. Returns the number of quads appended.
///
/// The ring must be counter-clockwise; each edge (cur, next, wrapping)
/// becomes a quad of 4 fresh vertices (cur@bottom, cur@top, next@bottom,
/// next@top) with the outward edge normal and unit-square UVs.
/// Zero-length edges are skipped.
pub fn build_wall_band(
    ring: &[Point2<f64>],
    bottom: f64,
    top: f64,
    mesh: &mut MeshBuffer,
) -> usize {
    let n = ring.len();
    let mut quads = 0usize;

    for i in 0..n {
        let cur = ring[i];
        let next = ring[(i + 1) % n];

        let Some(direction) = (next - cur).try_normalize(f64::EPSILON) else {
            continue;
        };
        // Outward for a counter-clockwise ring: edge direction rotated
        // -90 degrees
        let normal = Vector3::new(direction.y, -direction.x, 0.0);

        let base = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(cur.x, cur.y, bottom), normal, [0.0, 0.0]);
        mesh.add_vertex(Point3::new(cur.x, cur.y, top), normal, [0.0, 1.0]);
        mesh.add_vertex(Point3::new(next.x, next.y, bottom), normal, [1.0, 0.0]);
        mesh.add_vertex(Point3::new(next.x, next.y, top), normal, [1.0, 1.0]);

        mesh.add_triangle(base, base + 2, base + 1);
        mesh.add_triangle(base + 1, base + 2, base + 3);
        quads += 1;
    }

    quads
}
