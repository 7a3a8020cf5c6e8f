//! Favorite indicator shared by the list and details screens.

/// Presented favorite state of one city.
///
/// `Loading` means a favorite write is in flight and the toggle is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    Favorite,
    NotFavorite,
    Loading,
}

impl FavoriteState {
    pub const fn from_flag(is_favorite: bool) -> Self {
        if is_favorite {
            Self::Favorite
        } else {
            Self::NotFavorite
        }
    }

    /// Boolean view; `Loading` counts as not favorite.
    pub const fn as_bool(self) -> bool {
        matches!(self, Self::Favorite)
    }
}

impl From<bool> for FavoriteState {
    fn from(is_favorite: bool) -> Self {
        Self::from_flag(is_favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_from_and_to_bool() {
        assert_eq!(FavoriteState::from(true), FavoriteState::Favorite);
        assert_eq!(FavoriteState::from(false), FavoriteState::NotFavorite);
        assert!(FavoriteState::Favorite.as_bool());
        assert!(!FavoriteState::NotFavorite.as_bool());
        assert!(!FavoriteState::Loading.as_bool());
    }
}
