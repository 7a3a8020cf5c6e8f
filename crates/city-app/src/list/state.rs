//! View state and events for the city list screen.

use city_core::{City, CityId};

use crate::favorite::FavoriteState;

/// Why the list screen shows an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// The catalog could not be fetched.
    Network,
    /// The local catalog could not be read.
    General,
}

impl ListError {
    /// Retry-oriented message for the error screen.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Network => "Couldn't download the city list. Check your connection and try again.",
            Self::General => "Something went wrong while loading cities. Please try again.",
        }
    }
}

/// One row of the city list.
#[derive(Debug, Clone, PartialEq)]
pub struct CityItem {
    pub id: CityId,
    pub name: String,
    pub country: String,
    pub coordinates: String,
    pub favorite_state: FavoriteState,
    pub is_selected: bool,
}

impl CityItem {
    pub(crate) fn new(city: City, selected: Option<CityId>, pending: bool) -> Self {
        let favorite_state = if pending {
            FavoriteState::Loading
        } else {
            FavoriteState::from_flag(city.is_favorite)
        };
        Self {
            is_selected: selected == Some(city.id),
            id: city.id,
            name: city.name,
            country: city.country,
            coordinates: city.coordinates_string,
            favorite_state,
        }
    }
}

/// What the list screen shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ListViewState {
    /// Waiting for the first catalog sync.
    LoadingRemote,
    /// Sync finished; reading the local catalog.
    LoadingLocal,
    /// Nothing matches the current search.
    Empty,
    Error(ListError),
    Success(Vec<CityItem>),
}

impl ListViewState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::LoadingRemote | Self::LoadingLocal)
    }

    pub fn items(&self) -> &[CityItem] {
        match self {
            Self::Success(items) => items,
            _ => &[],
        }
    }

    /// Next state after the combined inputs produced `items`.
    ///
    /// An empty result before any sync completed keeps a loading or error
    /// state instead of claiming there are no cities.
    pub(crate) fn resolve(&self, items: Vec<CityItem>, sync_completed: bool) -> Self {
        if !items.is_empty() {
            return Self::Success(items);
        }
        match self {
            Self::LoadingRemote | Self::Error(_) if !sync_completed => self.clone(),
            _ => Self::Empty,
        }
    }
}

/// Search bar contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBarState {
    /// Case-sensitive name prefix.
    pub query: String,
    pub only_favorites: bool,
}

/// UI events accepted by the list controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    SearchQueryChanged(String),
    OnlyFavoritesToggled,
    CityClicked(CityId),
    CityDetailsClicked(CityId),
    CityFavoriteClicked {
        id: CityId,
        current: FavoriteState,
    },
    Refresh,
}
