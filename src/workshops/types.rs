use crate::reviews::ReviewEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// OSM geometry kinds the map query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One element from the Overpass `out center` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Centroid, present for ways and relations.
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl MapElement {
    /// Nodes carry their own position; other geometries use the centroid.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self.kind {
            ElementKind::Node => self.lat.zip(self.lon),
            ElementKind::Way | ElementKind::Relation => self.center.map(|c| (c.lat, c.lon)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<MapElement>,
}

/// A car repair workshop merged with its review summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workshop {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub rating: f64,
    pub total_reviews: usize,
    pub reviews: Vec<ReviewEntry>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkshopError {
    #[error("Map service unavailable: {0}")]
    Network(String),
    #[error("Invalid map service response: {0}")]
    InvalidResponse(String),
}
