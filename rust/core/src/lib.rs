// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityMesh Core
//!
//! Data model and JSON ingestion for building-layer mesh generation.
//!
//! ## Overview
//!
//! - **Model**: [`Layer`]s group [`Building`]s sharing one
//!   [`LayerStyle`] (opacity, roughness/metalness pairs, height-keyed
//!   texture rules). Footprints are open lon/lat rings.
//! - **Ingestion**: [`parse_layer_config`] reads the layer-config
//!   document, [`parse_buildings`] reads per-layer GeoJSON-style
//!   feature collections. Both work on strings; I/O stays with the
//!   caller, and malformed entries are skipped rather than fatal.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use citymesh_core::{parse_layer_config, parse_buildings, Layer, LayerSet};
//!
//! let mut layers = LayerSet::new();
//! for descriptor in parse_layer_config(&config_json)? {
//!     let features = std::fs::read_to_string(&descriptor.url)?;
//!     let mut layer = Layer::new(descriptor.id, descriptor.style);
//!     layer.buildings = parse_buildings(&features)?;
//!     layers.push(layer);
//! }
//! ```

pub mod error;
pub mod ingest;
pub mod model;

pub use error::{Error, Result};
pub use ingest::{parse_buildings, parse_layer_config, LayerDescriptor};
pub use model::{Building, Layer, LayerSet, LayerStyle, TextureRule, CLOSING_POINT_EPSILON};
