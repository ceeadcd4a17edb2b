// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer and building data model
//!
//! A [`Layer`] groups buildings that share one material configuration
//! ([`LayerStyle`]). Footprints are stored as open lon/lat rings: the
//! duplicate closing point common in GeoJSON sources is pruned at
//! construction time.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;

/// Distance (in degrees) below which the last ring point is considered a
/// duplicate of the first and dropped.
pub const CLOSING_POINT_EPSILON: f64 = 1e-9;

/// One entry of a height-conditional texture table.
///
/// Buildings taller than `min_height` select `texture` (the entry with
/// the greatest matching threshold wins).
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRule {
    /// Height threshold the building must exceed
    pub min_height: f64,
    /// Texture asset name resolved by the rendering glue
    pub texture: String,
}

/// Material configuration shared by all buildings of a layer.
///
/// Roughness/metalness come in `[top, side]` pairs in the source
/// document: `top_*` applies to roofs, `side_*` to walls.
#[derive(Debug, Clone)]
pub struct LayerStyle {
    pub opacity: f64,
    pub top_roughness: f64,
    pub side_roughness: f64,
    pub top_metalness: f64,
    pub side_metalness: f64,
    /// Height-conditional roof textures
    pub top_textures: Vec<TextureRule>,
    /// Height-conditional wall textures
    pub side_textures: Vec<TextureRule>,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            top_roughness: 0.5,
            side_roughness: 0.5,
            top_metalness: 0.0,
            side_metalness: 0.0,
            top_textures: Vec::new(),
            side_textures: Vec::new(),
        }
    }
}

impl LayerStyle {
    /// Select the texture for a building of the given height.
    ///
    /// Picks the rule with the greatest `min_height` strictly below
    /// `height`; when no rule matches, falls back to the rule with the
    /// lowest threshold. Returns `None` for an empty table.
    pub fn texture_for(rules: &[TextureRule], height: f64) -> Option<&str> {
        let best = rules
            .iter()
            .filter(|r| r.min_height < height)
            .max_by(|a, b| a.min_height.total_cmp(&b.min_height));

        best.or_else(|| {
            rules
                .iter()
                .min_by(|a, b| a.min_height.total_cmp(&b.min_height))
        })
        .map(|r| r.texture.as_str())
    }
}

/// A single building: classification code, height, and an open lon/lat
/// footprint ring (first and last vertex implicitly connected).
#[derive(Debug, Clone)]
pub struct Building {
    pub code: i32,
    pub height: f64,
    /// Ordered `[lon, lat]` vertices, no duplicate closing point
    pub footprint: Vec<[f64; 2]>,
}

impl Building {
    /// Build from a possibly-closed source ring.
    ///
    /// Drops a closing point that duplicates the first vertex (within
    /// [`CLOSING_POINT_EPSILON`]) and rejects rings with fewer than 3
    /// remaining vertices.
    pub fn from_ring(code: i32, height: f64, mut ring: Vec<[f64; 2]>) -> Result<Self> {
        if ring.len() > 1 {
            let first = ring[0];
            let last = ring[ring.len() - 1];
            let dx = last[0] - first[0];
            let dy = last[1] - first[1];
            if (dx * dx + dy * dy).sqrt() < CLOSING_POINT_EPSILON {
                ring.pop();
            }
        }

        if ring.len() < 3 {
            return Err(Error::InvalidFootprint(format!(
                "ring has {} vertices after closing-point pruning, need at least 3",
                ring.len()
            )));
        }

        Ok(Self {
            code,
            height,
            footprint: ring,
        })
    }
}

/// A named group of buildings sharing one material configuration
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: i32,
    pub style: LayerStyle,
    pub buildings: Vec<Building>,
}

impl Layer {
    pub fn new(id: i32, style: LayerStyle) -> Self {
        Self {
            id,
            style,
            buildings: Vec::new(),
        }
    }
}

/// Ordered collection of layers with an id index.
///
/// Iteration order is insertion order; mesh generation depends on it for
/// deterministic output.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    layers: Vec<Layer>,
    index: FxHashMap<i32, usize>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer, replacing any previous layer with the same id
    pub fn push(&mut self, layer: Layer) {
        match self.index.get(&layer.id) {
            Some(&pos) => self.layers[pos] = layer,
            None => {
                self.index.insert(layer.id, self.layers.len());
                self.layers.push(layer);
            }
        }
    }

    pub fn get(&self, id: i32) -> Option<&Layer> {
        self.index.get(&id).map(|&pos| &self.layers[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    #[test]
    fn test_closing_point_pruned() {
        let mut ring = square();
        ring.push([0.0, 0.0]);
        let building = Building::from_ring(1, 10.0, ring).unwrap();
        assert_eq!(building.footprint.len(), 4);
    }

    #[test]
    fn test_open_ring_kept() {
        let building = Building::from_ring(1, 10.0, square()).unwrap();
        assert_eq!(building.footprint.len(), 4);
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        // Two distinct points plus a closing duplicate
        let ring = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]];
        assert!(Building::from_ring(1, 10.0, ring).is_err());
    }

    #[test]
    fn test_texture_rule_selection() {
        let rules = vec![
            TextureRule {
                min_height: 0.0,
                texture: "low.png".into(),
            },
            TextureRule {
                min_height: 24.0,
                texture: "high.png".into(),
            },
        ];

        assert_eq!(LayerStyle::texture_for(&rules, 10.0), Some("low.png"));
        assert_eq!(LayerStyle::texture_for(&rules, 30.0), Some("high.png"));
        // Exactly at the threshold: the threshold must be strictly below
        assert_eq!(LayerStyle::texture_for(&rules, 24.0), Some("low.png"));
        assert_eq!(LayerStyle::texture_for(&[], 30.0), None);
    }

    #[test]
    fn test_layer_set_order_and_lookup() {
        let mut set = LayerSet::new();
        set.push(Layer::new(7, LayerStyle::default()));
        set.push(Layer::new(3, LayerStyle::default()));
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(3).unwrap().id, 3);

        let ids: Vec<i32> = set.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![7, 3]);

        // Re-pushing an id replaces in place, keeping order
        let mut replacement = Layer::new(7, LayerStyle::default());
        replacement.buildings.push(
            Building::from_ring(
                1,
                5.0,
                vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            )
            .unwrap(),
        );
        set.push(replacement);
        let ids: Vec<i32> = set.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(set.get(7).unwrap().buildings.len(), 1);
    }
}
