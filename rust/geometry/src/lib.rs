// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityMesh Geometry
//!
//! Turns building footprints into render-ready triangle meshes:
//! spherical-Mercator projection with local recentering, ear-clipping
//! roof triangulation, banded wall quads, and delta-rebased buffer
//! accumulation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use citymesh_geometry::{build_scene, BuildOptions, WallBands};
//!
//! let mut options = BuildOptions::new(114.3, 30.6);
//! options.wall_bands = WallBands::Banded { top_margin: 2.0, bottom_margin: 4.0 };
//!
//! for layer in build_scene(&layers, &options) {
//!     for named in &layer.meshes {
//!         upload(&named.name, &named.material, &named.mesh);
//!     }
//! }
//! ```

pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod polygon;
pub mod projection;
pub mod triangulate;
pub mod walls;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use mesh::MeshBuffer;
pub use pipeline::{
    build_layer, build_scene, BuildOptions, LayerMeshes, MaterialSpec, NamedMesh, ROOF_NAME,
};
pub use polygon::{
    is_convex_ring, is_convex_vertex, is_ear, point_in_polygon, point_in_triangle, ring_area,
    signed_area, COLLINEAR_EPSILON,
};
pub use projection::{mercator, Projector, EARTH_RADIUS};
pub use triangulate::build_roof;
pub use walls::{build_wall_band, WallBands};
