//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 point as returned to clients (`{lat, lon}`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Location resolution errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("Location not found: '{0}'")]
    NotFound(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl LocationError {
    /// Whether the failure came from the upstream service rather than the input.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}
