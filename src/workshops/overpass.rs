//! Overpass API client.

use super::types::{MapElement, OverpassResponse, WorkshopError};
use crate::http::{self, FetchError};
use crate::location::Coordinate;
use tracing::debug;

/// Anything that can list car repair shops around a point.
pub trait WorkshopSource: Send + Sync {
    fn car_repair_near(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<MapElement>, WorkshopError>;
}

pub struct OverpassClient {
    agent: ureq::Agent,
    interpreter_url: String,
}

impl OverpassClient {
    pub fn new(agent: ureq::Agent, interpreter_url: impl Into<String>) -> Self {
        Self {
            agent,
            interpreter_url: interpreter_url.into(),
        }
    }
}

impl WorkshopSource for OverpassClient {
    fn car_repair_near(
        &self,
        center: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<MapElement>, WorkshopError> {
        let query = build_query(center, radius_m);
        debug!(%query, "overpass query");

        let request = self
            .agent
            .get(&self.interpreter_url)
            .query("data", &query);
        let body: OverpassResponse = http::get_json(request).map_err(|e| match e {
            FetchError::Decode(msg) => WorkshopError::InvalidResponse(msg),
            other => WorkshopError::Network(other.to_string()),
        })?;

        Ok(body.elements)
    }
}

/// Overpass QL for every node, way and relation tagged `shop=car_repair`
/// within `radius_m` metres, with centroids for non-point geometries.
pub fn build_query(center: Coordinate, radius_m: u32) -> String {
    let around = format!("(around:{},{},{})", radius_m, center.lat, center.lon);
    format!(
        "[out:json];(node[\"shop\"=\"car_repair\"]{a};way[\"shop\"=\"car_repair\"]{a};relation[\"shop\"=\"car_repair\"]{a};);out center;",
        a = around
    )
}
