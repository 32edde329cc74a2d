use crate::config::Config;
use crate::http;
use crate::location::LocationResolver;
use crate::reviews::ReviewStore;
use crate::workshops::WorkshopFinder;

/// Everything a request handler needs. Lives for the lifetime of the server.
pub struct AppState {
    pub resolver: LocationResolver,
    pub finder: WorkshopFinder,
    pub reviews: ReviewStore,
}

impl AppState {
    pub fn new(resolver: LocationResolver, finder: WorkshopFinder) -> Self {
        Self {
            resolver,
            finder,
            reviews: ReviewStore::new(),
        }
    }

    /// Wire the real upstream clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        let agent = http::build_agent(config.http_timeout(), &config.user_agent);
        let resolver = LocationResolver::new(
            agent.clone(),
            &config.postcode_api_url,
            &config.geocoder_api_url,
        );
        let finder = WorkshopFinder::new(agent, &config.overpass_api_url, config.search_radius);
        Self::new(resolver, finder)
    }
}
