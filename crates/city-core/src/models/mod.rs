//! Data models for City Explorer

mod city;
mod favorite;

pub use city::{format_coordinates, City, CityId, GeoCoordinates};
pub use favorite::FavoriteMark;
