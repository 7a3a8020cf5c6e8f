//! city-core - Core library for City Explorer
//!
//! This crate contains the city models, the local catalog store, the remote
//! source, the sync coordinator, and the filter engine used by the
//! presentation layer.

pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod remote;
pub mod store;
pub mod sync;

pub use error::{Error, Result};
pub use filter::filter_cities;
pub use models::{City, CityId, GeoCoordinates};
pub use store::{CityStore, CityWatch};
pub use sync::{SyncCoordinator, SyncOutcome};
