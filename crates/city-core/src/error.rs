//! Error types for city-core

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while syncing, storing, or reading cities.
#[derive(Error, Debug)]
pub enum Error {
    /// Store-level failure not raised by `SQLite` itself (poisoned lock,
    /// blocking task panic)
    #[error("Catalog store error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed catalog payload or config file
    #[error("Malformed JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport failure talking to the remote catalog
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote catalog answered with a non-success status
    #[error("Remote catalog error: {0}")]
    Remote(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
