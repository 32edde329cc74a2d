//! Location providers: postcode lookup and free-text address geocoding.

use super::types::{Coordinate, LocationError};
use crate::http::{self, FetchError};
use serde::Deserialize;
use tracing::debug;

/// One step of the resolution chain.
pub trait LocationProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Turn free-text input into a coordinate.
    fn locate(&self, input: &str) -> Result<Coordinate, LocationError>;
}

fn fetch_error(input: &str, e: FetchError) -> LocationError {
    match e {
        FetchError::Status(404) => LocationError::NotFound(input.to_string()),
        FetchError::Status(code) => LocationError::Network(format!("HTTP {}", code)),
        FetchError::Transport(msg) => LocationError::Network(msg),
        FetchError::Decode(msg) => LocationError::InvalidResponse(msg),
    }
}

// ─── Postcode lookup ────────────────────────────────────────────

#[derive(Deserialize, Debug)]
pub struct PostcodeResponse {
    pub status: u16,
    #[serde(default)]
    pub result: Option<PostcodeResult>,
}

#[derive(Deserialize, Debug)]
pub struct PostcodeResult {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// postcodes.io style lookup: `GET {base}/postcodes/{postcode}`.
pub struct PostcodeLookup {
    agent: ureq::Agent,
    base_url: String,
}

impl PostcodeLookup {
    pub fn new(agent: ureq::Agent, base_url: impl Into<String>) -> Self {
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl LocationProvider for PostcodeLookup {
    fn name(&self) -> &'static str {
        "postcode"
    }

    fn locate(&self, input: &str) -> Result<Coordinate, LocationError> {
        let url = format!(
            "{}/postcodes/{}",
            self.base_url,
            urlencoding::encode(input)
        );
        debug!(%url, "postcode lookup");

        let body: PostcodeResponse =
            http::get_json(self.agent.get(&url)).map_err(|e| fetch_error(input, e))?;
        coordinate_from_postcode(input, body)
    }
}

pub fn coordinate_from_postcode(
    input: &str,
    body: PostcodeResponse,
) -> Result<Coordinate, LocationError> {
    if !(200..300).contains(&body.status) {
        return Err(LocationError::NotFound(input.to_string()));
    }
    match body.result {
        Some(PostcodeResult {
            latitude: Some(lat),
            longitude: Some(lon),
        }) => Ok(Coordinate::new(lat, lon)),
        // Some postcodes (e.g. Channel Islands) have no coordinates.
        _ => Err(LocationError::NotFound(input.to_string())),
    }
}

// ─── Address geocoder (Nominatim) ───────────────────────────────

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Nominatim `/search` endpoint, first match only.
pub struct AddressGeocoder {
    agent: ureq::Agent,
    base_url: String,
}

impl AddressGeocoder {
    pub fn new(agent: ureq::Agent, base_url: impl Into<String>) -> Self {
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl LocationProvider for AddressGeocoder {
    fn name(&self) -> &'static str {
        "geocoder"
    }

    fn locate(&self, input: &str) -> Result<Coordinate, LocationError> {
        let url = format!("{}/search", self.base_url);
        let request = self
            .agent
            .get(&url)
            .query("q", input)
            .query("format", "json")
            .query("limit", "1");

        let results: Vec<NominatimResult> =
            http::get_json(request).map_err(|e| fetch_error(input, e))?;
        coordinate_from_search(input, &results)
    }
}

pub fn coordinate_from_search(
    input: &str,
    results: &[NominatimResult],
) -> Result<Coordinate, LocationError> {
    let first = results
        .first()
        .ok_or_else(|| LocationError::NotFound(input.to_string()))?;

    let lat: f64 = first
        .lat
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad latitude '{}'", first.lat)))?;
    let lon: f64 = first
        .lon
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad longitude '{}'", first.lon)))?;

    Ok(Coordinate::new(lat, lon))
}
