//! Favorite mark model

use serde::{Deserialize, Serialize};

use super::CityId;

/// Persisted favorite flag for one city
///
/// A city without a mark is not a favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteMark {
    pub city_id: CityId,
    pub is_favorite: bool,
}

impl FavoriteMark {
    pub const fn new(city_id: CityId, is_favorite: bool) -> Self {
        Self {
            city_id,
            is_favorite,
        }
    }
}
