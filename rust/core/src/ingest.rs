// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON ingestion
//!
//! String-level parsing of the two source documents: the layer-config
//! document (which layers exist, where their features live, how they are
//! styled) and per-layer building feature collections (GeoJSON-style
//! `FeatureCollection` with `MultiPolygon` geometry). File and network
//! I/O stays with the caller.
//!
//! Malformed entries are skipped, not fatal: one broken feature must not
//! take down a whole layer.

use crate::error::Result;
use crate::model::{Building, LayerStyle, TextureRule};
use serde::Deserialize;

/// A building layer found in the config document: its id, where to fetch
/// its features (`url`, resolved by the caller), and its material style.
#[derive(Debug, Clone)]
pub struct LayerDescriptor {
    pub id: i32,
    pub url: String,
    pub style: LayerStyle,
}

#[derive(Deserialize)]
struct ConfigDoc {
    data: ConfigData,
}

#[derive(Deserialize)]
struct ConfigData {
    #[serde(default)]
    layers: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawLayer {
    id: i32,
    #[serde(rename = "geometryType")]
    geometry_type: String,
    url: String,
    #[serde(rename = "layerConfig")]
    layer_config: Option<RawLayerConfig>,
}

#[derive(Deserialize)]
struct RawLayerConfig {
    opacity: f64,
    /// `[top, side]`
    roughness: [f64; 2],
    /// `[top, side]`
    metalness: [f64; 2],
    #[serde(rename = "imageUrl", default)]
    image_url: Vec<RawImageRule>,
}

#[derive(Deserialize)]
struct RawImageRule {
    condition: String,
    /// `[top texture, side texture]`
    value: Vec<String>,
}

/// Extract the height threshold from a condition string like `"[h>24]"`.
///
/// Everything between the first `>` and the following `]` is parsed as a
/// number; unparsable conditions yield 0 (always-matching rule).
fn condition_threshold(condition: &str) -> f64 {
    let Some(gt) = condition.find('>') else {
        return 0.0;
    };
    let rest = &condition[gt + 1..];
    let end = rest.find(']').unwrap_or(rest.len());
    rest[..end].trim().parse().unwrap_or(0.0)
}

/// Parse the layer-config document.
///
/// Keeps entries with `geometryType == "GeoBuilding"`; entries that are
/// malformed or lack a `layerConfig` block are skipped.
pub fn parse_layer_config(json: &str) -> Result<Vec<LayerDescriptor>> {
    let doc: ConfigDoc = serde_json::from_str(json)?;

    let mut descriptors = Vec::new();
    for value in doc.data.layers {
        let Ok(layer) = serde_json::from_value::<RawLayer>(value) else {
            continue;
        };
        if layer.geometry_type != "GeoBuilding" {
            continue;
        }
        let Some(config) = layer.layer_config else {
            continue;
        };

        let mut style = LayerStyle {
            opacity: config.opacity,
            top_roughness: config.roughness[0],
            side_roughness: config.roughness[1],
            top_metalness: config.metalness[0],
            side_metalness: config.metalness[1],
            top_textures: Vec::new(),
            side_textures: Vec::new(),
        };

        for rule in &config.image_url {
            if rule.value.len() < 2 {
                continue;
            }
            let min_height = condition_threshold(&rule.condition);
            style.top_textures.push(TextureRule {
                min_height,
                texture: rule.value[0].clone(),
            });
            style.side_textures.push(TextureRule {
                min_height,
                texture: rule.value[1].clone(),
            });
        }

        descriptors.push(LayerDescriptor {
            id: layer.id,
            url: layer.url,
            style,
        });
    }

    Ok(descriptors)
}

#[derive(Deserialize)]
struct FeatureDoc {
    #[serde(default)]
    features: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(rename = "type")]
    kind: Option<String>,
    properties: Option<RawProperties>,
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawProperties {
    #[serde(default)]
    height: f64,
    #[serde(default)]
    code: i32,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    /// MultiPolygon: polygons → rings → positions (lon, lat, [alt])
    coordinates: Vec<Vec<Vec<Vec<f64>>>>,
}

/// Parse a building feature collection.
///
/// Each polygon of a `MultiPolygon` feature contributes one [`Building`]
/// from its outer ring; duplicate closing points are pruned and rings
/// that degenerate below 3 vertices are dropped.
pub fn parse_buildings(json: &str) -> Result<Vec<Building>> {
    let doc: FeatureDoc = serde_json::from_str(json)?;

    let mut buildings = Vec::new();
    for value in doc.features {
        let Ok(feature) = serde_json::from_value::<RawFeature>(value) else {
            continue;
        };
        if feature.kind.as_deref() != Some("Feature") {
            continue;
        }
        let (Some(properties), Some(geometry)) = (feature.properties, feature.geometry) else {
            continue;
        };
        if geometry.kind != "MultiPolygon" {
            continue;
        }

        for polygon in &geometry.coordinates {
            // Outer ring only; holes are not part of the footprint model
            let Some(outer) = polygon.first() else {
                continue;
            };
            let ring: Vec<[f64; 2]> = outer
                .iter()
                .filter(|position| position.len() >= 2)
                .map(|position| [position[0], position[1]])
                .collect();

            if let Ok(building) = Building::from_ring(properties.code, properties.height, ring) {
                buildings.push(building);
            }
        }
    }

    Ok(buildings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "data": {
            "layers": [
                {
                    "id": 12,
                    "geometryType": "GeoBuilding",
                    "url": "buildings_12.json",
                    "layerConfig": {
                        "opacity": 0.8,
                        "roughness": [0.7, 0.4],
                        "metalness": [0.1, 0.2],
                        "imageUrl": [
                            {"condition": "[h>0]", "value": ["top_low.png", "side_low.png"]},
                            {"condition": "[h>24]", "value": ["top_high.png", "side_high.png"]}
                        ]
                    }
                },
                {
                    "id": 13,
                    "geometryType": "GeoRoad",
                    "url": "roads.json",
                    "layerConfig": {"opacity": 1.0, "roughness": [0.5, 0.5], "metalness": [0.0, 0.0]}
                },
                {
                    "id": 14,
                    "geometryType": "GeoBuilding",
                    "url": "broken.json"
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_layer_config() {
        let descriptors = parse_layer_config(CONFIG).unwrap();

        // GeoRoad filtered, missing layerConfig skipped
        assert_eq!(descriptors.len(), 1);
        let layer = &descriptors[0];
        assert_eq!(layer.id, 12);
        assert_eq!(layer.url, "buildings_12.json");
        assert_eq!(layer.style.opacity, 0.8);
        assert_eq!(layer.style.top_roughness, 0.7);
        assert_eq!(layer.style.side_roughness, 0.4);
        assert_eq!(layer.style.top_textures.len(), 2);
        assert_eq!(layer.style.side_textures[1].min_height, 24.0);
        assert_eq!(layer.style.side_textures[1].texture, "side_high.png");
    }

    #[test]
    fn test_condition_threshold() {
        assert_eq!(condition_threshold("[h>24]"), 24.0);
        assert_eq!(condition_threshold("[h>24.5]"), 24.5);
        assert_eq!(condition_threshold("always"), 0.0);
        assert_eq!(condition_threshold("[h>oops]"), 0.0);
    }

    const FEATURES: &str = r#"{
        "features": [
            {
                "type": "Feature",
                "properties": {"height": 30.0, "code": 7},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[
                        [116.30, 40.00], [116.31, 40.00], [116.31, 40.01],
                        [116.30, 40.01], [116.30, 40.00]
                    ]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"height": 5.0, "code": 1},
                "geometry": {
                    "type": "Point",
                    "coordinates": [116.30, 40.00]
                }
            },
            {"type": "NotAFeature"},
            {
                "type": "Feature",
                "properties": {"height": 5.0, "code": 1},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[
                        [116.30, 40.00], [116.31, 40.00], [116.30, 40.00]
                    ]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_buildings() {
        let buildings = parse_buildings(FEATURES).unwrap();

        // Point geometry, non-feature, and degenerate ring all skipped
        assert_eq!(buildings.len(), 1);
        let building = &buildings[0];
        assert_eq!(building.code, 7);
        assert_eq!(building.height, 30.0);
        // Closing point pruned
        assert_eq!(building.footprint.len(), 4);
    }

    #[test]
    fn test_parse_buildings_empty_doc() {
        let buildings = parse_buildings("{}").unwrap();
        assert!(buildings.is_empty());
    }
}
