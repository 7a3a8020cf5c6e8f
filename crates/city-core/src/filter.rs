//! City list filtering (name prefix + favorites).

use crate::models::City;

/// Filter cities by an exact, case-sensitive name prefix and optionally by
/// favorite flag.
///
/// Input order is preserved; the store already supplies cities sorted by
/// name. An empty prefix matches every city.
#[must_use]
pub fn filter_cities(cities: &[City], prefix: &str, only_favorites: bool) -> Vec<City> {
    cities
        .iter()
        .filter(|city| !only_favorites || city.is_favorite)
        .filter(|city| city.name.starts_with(prefix))
        .cloned()
        .collect()
}
