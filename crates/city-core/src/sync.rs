//! Cache-first catalog synchronization.
//!
//! The remote catalog is fetched at most once: once the local store holds
//! cities, only a forced refresh goes back to the network. A failed fetch or
//! write leaves the local catalog exactly as it was.

use std::sync::Arc;

use crate::models::City;
use crate::remote::CitySource;
use crate::store::CityStore;
use crate::Result;

/// What a successful sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The store was already populated; no network access happened.
    CacheHit,
    /// The remote catalog was fetched and upserted.
    Refreshed { cities: usize },
}

/// Populates the catalog store from the remote source.
#[derive(Clone)]
pub struct SyncCoordinator {
    store: CityStore,
    source: Arc<dyn CitySource>,
}

impl SyncCoordinator {
    pub fn new(store: CityStore, source: Arc<dyn CitySource>) -> Self {
        Self { store, source }
    }

    pub const fn store(&self) -> &CityStore {
        &self.store
    }

    /// Make sure the catalog is populated, fetching when empty or forced.
    pub async fn sync(&self, force_refresh: bool) -> Result<SyncOutcome> {
        let result = self.fetch_and_cache(force_refresh).await;
        match &result {
            Ok(SyncOutcome::CacheHit) => {
                tracing::debug!("City catalog already cached; skipping remote fetch");
            }
            Ok(SyncOutcome::Refreshed { cities }) => {
                tracing::info!(force_refresh, "Cached {cities} cities from remote catalog");
            }
            Err(error) => {
                tracing::warn!(force_refresh, "City catalog sync failed: {error}");
            }
        }
        result
    }

    async fn fetch_and_cache(&self, force_refresh: bool) -> Result<SyncOutcome> {
        if !force_refresh && self.store.has_cities().await? {
            return Ok(SyncOutcome::CacheHit);
        }

        let records = self.source.fetch_cities().await?;
        let cities: Vec<City> = records.into_iter().map(City::from).collect();
        let written = self.store.upsert_cities(cities).await?;
        Ok(SyncOutcome::Refreshed { cities: written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CityId;
    use crate::remote::{CityRecord, CoordRecord};
    use crate::Error;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeSource {
        records: Vec<CityRecord>,
        fail: AtomicBool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(records: Vec<CityRecord>) -> Arc<Self> {
            Arc::new(Self {
                records,
                fail: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CitySource for FakeSource {
        async fn fetch_cities(&self) -> Result<Vec<CityRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::Remote("connection reset".to_string()));
            }
            Ok(self.records.clone())
        }
    }

    fn record(id: i64, name: &str, lat: f64, lon: f64) -> CityRecord {
        CityRecord {
            id,
            name: name.to_string(),
            country: "XX".to_string(),
            coord: CoordRecord { lat, lon },
        }
    }

    fn setup() -> (CityStore, Arc<FakeSource>, SyncCoordinator) {
        let store = CityStore::open_in_memory().unwrap();
        let source = FakeSource::new(vec![
            record(1, "Berlin", 52.52, 13.40),
            record(2, "New York", 40.7128, -74.006),
        ]);
        let coordinator = SyncCoordinator::new(store.clone(), source.clone());
        (store, source, coordinator)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_store_fetches_remote_catalog() {
        let (store, source, coordinator) = setup();

        let outcome = coordinator.sync(false).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Refreshed { cities: 2 });
        assert_eq!(source.calls(), 1);
        let new_york = store.city(CityId::new(2)).await.unwrap().unwrap();
        assert_eq!(new_york.coordinates_string, "40.7128° N, 74.0060° O");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn populated_store_skips_network() {
        let (_store, source, coordinator) = setup();
        coordinator.sync(false).await.unwrap();

        let outcome = coordinator.sync(false).await.unwrap();

        assert_eq!(outcome, SyncOutcome::CacheHit);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn forced_refresh_keeps_favorites() {
        let (store, source, coordinator) = setup();
        coordinator.sync(false).await.unwrap();
        store.set_favorite(CityId::new(1), true).await.unwrap();

        let outcome = coordinator.sync(true).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Refreshed { cities: 2 });
        assert_eq!(source.calls(), 2);
        assert!(store.city(CityId::new(1)).await.unwrap().unwrap().is_favorite);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_refresh_leaves_store_untouched() {
        let (store, source, coordinator) = setup();
        coordinator.sync(false).await.unwrap();
        store.set_favorite(CityId::new(2), true).await.unwrap();
        let before = store.all_cities().await.unwrap();
        let changes = store.changes();

        source.fail.store(true, Ordering::SeqCst);
        let error = coordinator.sync(true).await.unwrap_err();

        assert!(matches!(error, Error::Remote(_)));
        assert_eq!(store.all_cities().await.unwrap(), before);
        assert!(!changes.has_changed().unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_first_sync_leaves_store_empty() {
        let (store, source, coordinator) = setup();
        source.fail.store(true, Ordering::SeqCst);

        assert!(coordinator.sync(false).await.is_err());
        assert!(!store.has_cities().await.unwrap());
    }
}
