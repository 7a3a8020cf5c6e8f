//! city-app - Presentation layer for City Explorer
//!
//! Headless controllers for the list, details, and map screens. Each
//! controller publishes its view state through a `watch` channel and accepts
//! UI events; rendering is left to whichever shell embeds them.

pub mod details;
pub mod favorite;
pub mod list;
pub mod map;
pub mod navigation;
pub mod selection;

#[cfg(test)]
mod testing;

pub use details::{CityDetailController, CityDetails, DetailEvent, DetailViewState};
pub use favorite::FavoriteState;
pub use list::{
    CityItem, CityListController, ListError, ListEvent, ListViewState, SearchBarState,
};
pub use map::{CityMapController, MapViewState};
pub use navigation::{NavigationEvent, Route, RouteError};
pub use selection::SelectionCoordinator;
