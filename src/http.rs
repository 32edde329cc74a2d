//! Shared blocking HTTP plumbing for the upstream map, postcode and geocoding APIs.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to an upstream JSON API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Build the agent every upstream client shares.
pub fn build_agent(timeout: Duration, user_agent: &str) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
}

/// Send a prepared request and decode its JSON body.
pub fn get_json<T: DeserializeOwned>(request: ureq::Request) -> Result<T, FetchError> {
    let response = request.call().map_err(|e| match e {
        ureq::Error::Status(code, _) => FetchError::Status(code),
        ureq::Error::Transport(t) => FetchError::Transport(t.to_string()),
    })?;

    response
        .into_json()
        .map_err(|e| FetchError::Decode(e.to_string()))
}
