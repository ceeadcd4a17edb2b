// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer mesh pipeline
//!
//! Drives projection, triangulation, and wall building over whole
//! layers. Buildings fan out through rayon into private scratch
//! buffers and merge back in building order, so output buffers are
//! deterministic. A building that fails any stage is logged and
//! skipped without leaving a partial append behind.

use crate::error::{Error, Result};
use crate::mesh::MeshBuffer;
use crate::polygon::{normalize_winding, COLLINEAR_EPSILON};
use crate::projection::Projector;
use crate::triangulate::build_roof;
use crate::walls::{build_wall_band, WallBands};
use citymesh_core::{Building, Layer, LayerSet, LayerStyle};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Buffer name for roof surfaces
pub const ROOF_NAME: &str = "roof";

/// Parameters for one mesh-generation run
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Reference lon/lat; all output coordinates are meters relative to
    /// this location
    pub origin: (f64, f64),
    /// Vertical wall splitting
    pub wall_bands: WallBands,
    /// Collinear-vertex pruning tolerance for triangulation
    pub collinear_epsilon: f64,
}

impl BuildOptions {
    pub fn new(origin_lon: f64, origin_lat: f64) -> Self {
        Self {
            origin: (origin_lon, origin_lat),
            wall_bands: WallBands::Single,
            collinear_epsilon: COLLINEAR_EPSILON,
        }
    }
}

/// Material parameters resolved for one output buffer.
///
/// The texture is a source asset name; decoding and GPU upload are the
/// consumer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSpec {
    pub texture: Option<String>,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
}

/// One output buffer with its band name and resolved material
#[derive(Debug, Clone)]
pub struct NamedMesh {
    pub name: String,
    pub material: MaterialSpec,
    pub mesh: MeshBuffer,
}

/// All mesh buffers generated for one layer
#[derive(Debug, Clone)]
pub struct LayerMeshes {
    pub layer_id: i32,
    pub meshes: Vec<NamedMesh>,
}

/// Mesh pieces one building contributes, keyed by band name and
/// resolved texture
type BuildingPieces = Vec<(&'static str, Option<String>, MeshBuffer)>;

fn material_for(style: &LayerStyle, band: &str, texture: Option<String>) -> MaterialSpec {
    let (roughness, metalness) = if band == ROOF_NAME {
        (style.top_roughness, style.top_metalness)
    } else {
        (style.side_roughness, style.side_metalness)
    };

    MaterialSpec {
        texture,
        roughness: roughness as f32,
        metalness: metalness as f32,
        opacity: style.opacity as f32,
    }
}

/// Generate one building's roof and wall bands into scratch buffers.
///
/// Nothing is written to shared state; the caller merges on success
/// only, so a failure here can never leave a partial building behind.
fn build_building(
    building: &Building,
    projector: &Projector,
    style: &LayerStyle,
    options: &BuildOptions,
) -> Result<BuildingPieces> {
    let mut ring = projector.project_ring(&building.footprint);

    if ring.len() < 3 {
        return Err(Error::InvalidRing(format!(
            "footprint has {} vertices, need at least 3",
            ring.len()
        )));
    }
    if ring.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(Error::ProjectionDomain(
            "footprint projects to non-finite coordinates".to_string(),
        ));
    }

    normalize_winding(&mut ring);

    let mut pieces: BuildingPieces = Vec::with_capacity(4);

    let mut roof = MeshBuffer::new();
    build_roof(&ring, building.height, options.collinear_epsilon, &mut roof)?;
    let roof_texture =
        LayerStyle::texture_for(&style.top_textures, building.height).map(String::from);
    pieces.push((ROOF_NAME, roof_texture, roof));

    let wall_texture =
        LayerStyle::texture_for(&style.side_textures, building.height).map(String::from);
    for (name, bottom, top) in options.wall_bands.resolve(building.height) {
        let mut mesh = MeshBuffer::with_capacity(ring.len() * 4, ring.len() * 6);
        if build_wall_band(&ring, bottom, top, &mut mesh) > 0 {
            pieces.push((name, wall_texture.clone(), mesh));
        }
    }

    Ok(pieces)
}

/// Build all mesh buffers for one layer.
///
/// Buildings are processed in parallel but merged in input order;
/// buffers are emitted sorted by (band name, texture) so repeated runs
/// produce identical output. Failed buildings are logged and skipped.
pub fn build_layer(layer: &Layer, options: &BuildOptions) -> LayerMeshes {
    let projector = Projector::new(options.origin.0, options.origin.1);

    let results: Vec<(i32, Result<BuildingPieces>)> = layer
        .buildings
        .par_iter()
        .map(|building| {
            (
                building.code,
                build_building(building, &projector, &layer.style, options),
            )
        })
        .collect();

    let mut buffers: FxHashMap<(&'static str, Option<String>), MeshBuffer> = FxHashMap::default();
    let mut skipped = 0usize;
    for (code, result) in results {
        match result {
            Ok(pieces) => {
                for (name, texture, mesh) in pieces {
                    buffers.entry((name, texture)).or_default().merge(&mesh);
                }
            }
            Err(error) => {
                skipped += 1;
                warn!(layer = layer.id, building = code, %error, "skipping building");
            }
        }
    }

    let mut keyed: Vec<_> = buffers.into_iter().collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let meshes = keyed
        .into_iter()
        .map(|((name, texture), mesh)| NamedMesh {
            name: name.to_string(),
            material: material_for(&layer.style, name, texture),
            mesh,
        })
        .collect();

    debug!(
        layer = layer.id,
        buildings = layer.buildings.len(),
        skipped,
        "layer meshes built"
    );

    LayerMeshes {
        layer_id: layer.id,
        meshes,
    }
}

/// Build mesh buffers for every layer of the set, in layer order
pub fn build_scene(layers: &LayerSet, options: &BuildOptions) -> Vec<LayerMeshes> {
    layers
        .iter()
        .map(|layer| build_layer(layer, options))
        .collect()
}
