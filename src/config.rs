use clap::Parser;
use std::time::Duration;

/// Workshop Finder: locate nearby car repair workshops and collect reviews.
///
/// Every flag can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "workshops", version, about, long_about = None)]
pub struct Config {
    /// Interface to bind.
    #[arg(env, long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(env, long, default_value_t = 5000)]
    pub port: u16,

    /// Base URL of the postcode lookup service.
    #[arg(env, long, default_value = "https://api.postcodes.io")]
    pub postcode_api_url: String,

    /// Base URL of the Nominatim-compatible geocoder.
    #[arg(env, long, default_value = "https://nominatim.openstreetmap.org")]
    pub geocoder_api_url: String,

    /// Overpass interpreter endpoint.
    #[arg(env, long, default_value = "https://overpass-api.de/api/interpreter")]
    pub overpass_api_url: String,

    /// Search radius around the requested point, in metres.
    #[arg(env, long, default_value_t = 5000, value_parser = clap::value_parser!(u32).range(1..))]
    pub search_radius: u32,

    /// Timeout for each upstream HTTP call, in seconds.
    #[arg(env, long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub http_timeout_secs: u64,

    /// User-Agent sent upstream (Nominatim rejects anonymous clients).
    #[arg(env, long, default_value = concat!("workshop-finder/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
