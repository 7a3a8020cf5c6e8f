//! City model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Externally assigned city identifier, stable across fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityId(i64);

impl CityId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for CityId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A city in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Unique identifier (upsert key)
    pub id: CityId,
    /// Display name
    pub name: String,
    /// Country code, e.g. `"DE"`
    pub country: String,
    pub coordinates: GeoCoordinates,
    /// Human-readable coordinates, precomputed at ingest time
    pub coordinates_string: String,
    pub is_favorite: bool,
}

impl City {
    /// Build a city from raw fields, deriving the coordinate display string
    pub fn new(
        id: CityId,
        name: impl Into<String>,
        country: impl Into<String>,
        coordinates: GeoCoordinates,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            country: country.into(),
            coordinates_string: format_coordinates(coordinates),
            coordinates,
            is_favorite: false,
        }
    }

    #[must_use]
    pub const fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }
}

/// Format coordinates like `"40.7128° N, 74.0060° O"`
///
/// West longitudes use `O` (oeste), matching the catalog's Spanish locale.
pub fn format_coordinates(coordinates: GeoCoordinates) -> String {
    let GeoCoordinates {
        latitude,
        longitude,
    } = coordinates;
    let latitude_direction = if latitude >= 0.0 { 'N' } else { 'S' };
    let longitude_direction = if longitude >= 0.0 { 'E' } else { 'O' };
    format!(
        "{:.4}° {latitude_direction}, {:.4}° {longitude_direction}",
        latitude.abs(),
        longitude.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_north_west_coordinates() {
        let text = format_coordinates(GeoCoordinates::new(40.7128, -74.0060));
        assert_eq!(text, "40.7128° N, 74.0060° O");
    }

    #[test]
    fn formats_south_east_coordinates() {
        let text = format_coordinates(GeoCoordinates::new(-33.868_82, 151.209_29));
        assert_eq!(text, "33.8688° S, 151.2093° E");
    }

    #[test]
    fn zero_is_north_and_east() {
        let text = format_coordinates(GeoCoordinates::new(0.0, 0.0));
        assert_eq!(text, "0.0000° N, 0.0000° E");
    }

    #[test]
    fn new_city_derives_coordinates_string() {
        let city = City::new(
            CityId::new(2_950_159),
            "Berlin",
            "DE",
            GeoCoordinates::new(52.524_37, 13.410_53),
        );
        assert_eq!(city.coordinates_string, "52.5244° N, 13.4105° E");
        assert!(!city.is_favorite);
    }

    #[test]
    fn city_id_parses_route_arguments() {
        assert_eq!("42".parse::<CityId>().unwrap(), CityId::new(42));
        assert!("forty-two".parse::<CityId>().is_err());
        assert!(" 42 ".parse::<CityId>().is_err());
        assert!("42\n".parse::<CityId>().is_err());
    }
}
