//! Location resolver — orchestrates the fallback chain.
//!
//! Default flow: postcode lookup → address geocoder → error

use super::providers::{AddressGeocoder, LocationProvider, PostcodeLookup};
use super::types::{Coordinate, LocationError};
use tracing::debug;

/// Ordered list of strategies, queried until one yields a coordinate.
pub struct LocationResolver {
    providers: Vec<Box<dyn LocationProvider>>,
}

impl LocationResolver {
    /// Postcode lookup first, then free-text geocoding.
    pub fn new(agent: ureq::Agent, postcode_api: &str, geocoder_api: &str) -> Self {
        Self::with_providers(vec![
            Box::new(PostcodeLookup::new(agent.clone(), postcode_api)),
            Box::new(AddressGeocoder::new(agent, geocoder_api)),
        ])
    }

    pub fn with_providers(providers: Vec<Box<dyn LocationProvider>>) -> Self {
        Self { providers }
    }

    /// Resolve free text through every provider in order.
    ///
    /// When all of them fail, the last provider's error is returned.
    pub fn resolve(&self, input: &str) -> Result<Coordinate, LocationError> {
        let input = input.trim();
        let mut last_err = LocationError::NotFound(input.to_string());

        for provider in &self.providers {
            match provider.locate(input) {
                Ok(coord) => {
                    debug!(provider = provider.name(), lat = coord.lat, lon = coord.lon, "resolved");
                    return Ok(coord);
                }
                Err(e) => {
                    debug!(provider = provider.name(), error = %e, "provider failed, trying next");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }
}
