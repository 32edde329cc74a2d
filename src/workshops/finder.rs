//! Workshop finder — map query results merged with stored reviews.

use super::overpass::{OverpassClient, WorkshopSource};
use super::types::{MapElement, Workshop, WorkshopError};
use crate::location::Coordinate;
use crate::reviews::ReviewStore;
use tracing::warn;

pub struct WorkshopFinder {
    source: Box<dyn WorkshopSource>,
    radius_m: u32,
}

impl WorkshopFinder {
    pub fn new(agent: ureq::Agent, interpreter_url: &str, radius_m: u32) -> Self {
        Self::with_source(Box::new(OverpassClient::new(agent, interpreter_url)), radius_m)
    }

    pub fn with_source(source: Box<dyn WorkshopSource>, radius_m: u32) -> Self {
        Self { source, radius_m }
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Workshops around `center`, in upstream order.
    pub fn find(
        &self,
        center: Coordinate,
        reviews: &ReviewStore,
    ) -> Result<Vec<Workshop>, WorkshopError> {
        let elements = self.source.car_repair_near(center, self.radius_m)?;
        Ok(elements
            .iter()
            .filter_map(|el| to_workshop(el, reviews))
            .collect())
    }
}

/// Workshops are keyed by position, so two shops on the same point share one id.
pub fn workshop_id(lat: f64, lon: f64) -> String {
    format!("{},{}", lat, lon)
}

/// `addr:street` and `addr:housenumber`, whichever are present, space-joined.
pub fn address(el: &MapElement) -> String {
    ["addr:street", "addr:housenumber"]
        .iter()
        .filter_map(|k| el.tags.get(*k))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_workshop(el: &MapElement, reviews: &ReviewStore) -> Option<Workshop> {
    let Some((lat, lon)) = el.position() else {
        warn!(kind = ?el.kind, "skipping map element without coordinates");
        return None;
    };

    let id = workshop_id(lat, lon);
    let summary = reviews.summary(&id);
    let name = el
        .tags
        .get("name")
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());

    Some(Workshop {
        id,
        name,
        address: address(el),
        lat,
        lon,
        rating: summary.rating,
        total_reviews: summary.total_reviews,
        reviews: summary.reviews,
    })
}
