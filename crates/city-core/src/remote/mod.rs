//! Remote city source.
//!
//! The catalog is a single read-only JSON document listing every city. It is
//! fetched wholesale; there is no pagination and no authentication.

mod http;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{City, CityId, GeoCoordinates};
use crate::Result;

pub use http::HttpCitySource;

/// A city record as published by the remote catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityRecord {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub country: String,
    pub coord: CoordRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CoordRecord {
    pub lat: f64,
    pub lon: f64,
}

impl From<CityRecord> for City {
    fn from(record: CityRecord) -> Self {
        Self::new(
            CityId::new(record.id),
            record.name,
            record.country,
            GeoCoordinates::new(record.coord.lat, record.coord.lon),
        )
    }
}

/// Whether `url` names an http(s) endpoint the HTTP source can fetch.
pub fn is_http_url(url: &str) -> bool {
    let url = url.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        url.len() > scheme.len()
            && url
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Parse a catalog payload into city records.
pub fn parse_city_records(payload: &str) -> Result<Vec<CityRecord>> {
    Ok(serde_json::from_str(payload)?)
}

/// Source of the full remote city list
#[async_trait]
pub trait CitySource: Send + Sync {
    /// Fetch every city the remote catalog publishes
    async fn fetch_cities(&self) -> Result<Vec<CityRecord>>;
}
