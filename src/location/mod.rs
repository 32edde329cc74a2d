//! Location subsystem.
//!
//! Turns a postcode or free-text address into a coordinate by walking an
//! ordered chain of providers.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{AddressGeocoder, LocationProvider, PostcodeLookup};
pub use resolver::LocationResolver;
pub use types::{Coordinate, LocationError};
