//! Database layer for City Explorer

mod city_repository;
mod connection;
mod favorite_repository;
mod migrations;

pub use city_repository::{CityRepository, SqliteCityRepository};
pub use connection::Database;
pub use favorite_repository::{FavoriteRepository, SqliteFavoriteRepository};
