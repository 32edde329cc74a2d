//! Workshop Finder — locate nearby car repair workshops and keep
//! in-memory ratings and reviews for them.

pub mod config;
pub mod http;
pub mod location;
pub mod reviews;
pub mod server;
pub mod workshops;
