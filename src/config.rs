//! Deployment configuration: tile sources, named locations and the
//! fragment format the page is served with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hash::HashFormat;

/// Default deployment document, shipped alongside the page.
pub const DEFAULT_CONFIG_JSON: &str = include_str!("../static/demo.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("default source `{0}` is not in the source table")]
    UnknownDefaultSource(String),

    #[error("default location `{0}` is not in the location registry")]
    UnknownDefaultLocation(String),

    #[error("zoom range {min}..={max} is empty")]
    ZoomRange { min: i32, max: i32 },
}

/// Vector tile endpoint handed to the renderer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub layers: String,
    pub styles: String,
}

/// A camera position that can be jumped to by name.
///
/// Deserializes from either `[lat, lng, zoom]` or an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub lat: f64,
    pub lng: f64,
    pub zoom: i32,
}

impl NamedLocation {
    pub const fn new(lat: f64, lng: f64, zoom: i32) -> Self {
        Self { lat, lng, zoom }
    }
}

/// Name → location lookup. Built once, never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationRegistry {
    entries: BTreeMap<String, NamedLocation>,
}

impl LocationRegistry {
    pub fn get(&self, name: &str) -> Option<&NamedLocation> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, NamedLocation)> for LocationRegistry {
    fn from_iter<I: IntoIterator<Item = (S, NamedLocation)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub default_source: String,
    pub default_location: String,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: i32,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: i32,
    #[serde(default)]
    pub format: HashFormat,
    pub sources: BTreeMap<String, TileSource>,
    pub locations: LocationRegistry,
}

fn default_min_zoom() -> i32 {
    1
}

fn default_max_zoom() -> i32 {
    20
}

impl Default for DemoConfig {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            "mapzen".to_string(),
            TileSource {
                kind: "GeoJSONTileSource".to_string(),
                url: "http://vector.mapzen.com/osm/all/{z}/{x}/{y}.json".to_string(),
                layers: "layers.yaml".to_string(),
                styles: "styles.yaml".to_string(),
            },
        );

        let locations = [
            ("London", NamedLocation::new(51.508, -0.105, 15)),
            (
                "New York",
                NamedLocation::new(40.70531887544228, -74.00976419448853, 16),
            ),
            ("Seattle", NamedLocation::new(47.609722, -122.333056, 15)),
        ]
        .into_iter()
        .collect();

        Self {
            default_source: "mapzen".to_string(),
            default_location: "New York".to_string(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            format: HashFormat::default(),
            sources,
            locations,
        }
    }
}

impl DemoConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// The embedded deployment document.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json(DEFAULT_CONFIG_JSON)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sources.contains_key(&self.default_source) {
            return Err(ConfigError::UnknownDefaultSource(
                self.default_source.clone(),
            ));
        }
        if !self.locations.contains(&self.default_location) {
            return Err(ConfigError::UnknownDefaultLocation(
                self.default_location.clone(),
            ));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::ZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }

    pub fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn source(&self, id: &str) -> Option<&TileSource> {
        self.sources.get(id)
    }

    /// Location used whenever the fragment does not name a usable one.
    pub fn start_location(&self) -> NamedLocation {
        self.locations
            .get(&self.default_location)
            .copied()
            .unwrap_or(NamedLocation::new(0.0, 0.0, self.min_zoom))
    }

    pub fn clamp_zoom(&self, zoom: i32) -> i32 {
        // An unvalidated min > max must not panic.
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}
