//! Shared catalog store used by the sync coordinator and the controllers.
//!
//! Wraps the `SQLite` database behind a mutex and runs every query on the
//! blocking pool. Committed writes bump a revision counter published through
//! a `watch` channel, which is how observers learn the catalog changed.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::db::{
    CityRepository, Database, FavoriteRepository, SqliteCityRepository, SqliteFavoriteRepository,
};
use crate::models::{City, CityId, FavoriteMark};
use crate::{Error, Result};

/// Thread-safe handle to the local city catalog.
#[derive(Clone)]
pub struct CityStore {
    db: Arc<Mutex<Database>>,
    revision: Arc<watch::Sender<u64>>,
}

impl CityStore {
    /// Open the catalog at the given filesystem path.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        tracing::info!("Opened city catalog at {}", db_path.display());
        Ok(Self::from_database(db))
    }

    /// Open an in-memory catalog (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    fn from_database(db: Database) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            db: Arc::new(Mutex::new(db)),
            revision: Arc::new(revision),
        }
    }

    async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let db = db
                .lock()
                .map_err(|_| Error::Database("database lock poisoned".to_string()))?;
            op(&db)
        })
        .await
        .map_err(|error| Error::Database(format!("database task failed: {error}")))?
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Subscribe to catalog changes.
    ///
    /// The value is a revision counter; only its changes are meaningful.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Observe one city, re-read after every catalog change.
    pub fn watch_city(&self, id: CityId) -> CityWatch {
        CityWatch {
            store: self.clone(),
            changes: self.changes(),
            id,
            fresh: false,
        }
    }

    /// Whether the catalog holds any city.
    pub async fn has_cities(&self) -> Result<bool> {
        self.with_db(|db| SqliteCityRepository::new(db.connection()).has_cities())
            .await
    }

    /// All cities sorted by name, with favorite flags joined in.
    pub async fn all_cities(&self) -> Result<Vec<City>> {
        self.with_db(|db| SqliteCityRepository::new(db.connection()).list_all())
            .await
    }

    /// Fetch a city by id.
    pub async fn city(&self, id: CityId) -> Result<Option<City>> {
        self.with_db(move |db| SqliteCityRepository::new(db.connection()).get(id))
            .await
    }

    /// Upsert cities keyed by id; all or nothing.
    ///
    /// An empty batch writes nothing and leaves the revision untouched.
    pub async fn upsert_cities(&self, cities: Vec<City>) -> Result<usize> {
        if cities.is_empty() {
            return Ok(0);
        }
        let written = self
            .with_db(move |db| SqliteCityRepository::new(db.connection()).upsert_all(&cities))
            .await?;
        self.bump_revision();
        Ok(written)
    }

    /// Persist a favorite flag for a city.
    pub async fn set_favorite(&self, id: CityId, is_favorite: bool) -> Result<()> {
        let mark = FavoriteMark::new(id, is_favorite);
        self.with_db(move |db| SqliteFavoriteRepository::new(db.connection()).set_favorite(&mark))
            .await?;
        self.bump_revision();
        Ok(())
    }
}

/// Live lookup of a single city.
///
/// The first call to [`CityWatch::next`] reads immediately; later calls wait
/// for the next catalog change. `next` is cancel safe: a read dropped midway
/// is redone by the following call.
pub struct CityWatch {
    store: CityStore,
    changes: watch::Receiver<u64>,
    id: CityId,
    fresh: bool,
}

impl CityWatch {
    pub const fn id(&self) -> CityId {
        self.id
    }

    pub async fn next(&mut self) -> Result<Option<City>> {
        if self.fresh {
            self.changes
                .changed()
                .await
                .map_err(|_| Error::Database("catalog store closed".to_string()))?;
        }
        self.changes.borrow_and_update();
        self.fresh = false;
        let city = self.store.city(self.id).await;
        self.fresh = true;
        city
    }
}
