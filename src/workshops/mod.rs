//! Car repair workshop search.

pub mod finder;
pub mod overpass;
pub mod types;

pub use finder::{workshop_id, WorkshopFinder};
pub use overpass::{OverpassClient, WorkshopSource};
pub use types::{MapElement, Workshop, WorkshopError};
