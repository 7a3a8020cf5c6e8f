//! Shared fixtures for controller tests.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use city_core::remote::{CityRecord, CitySource, CoordRecord};
use city_core::{City, CityId, CityStore, Error, Result};
use tokio::sync::{watch, Notify};

pub const BERLIN: CityId = CityId::new(1);
pub const BOSTON: CityId = CityId::new(2);
pub const AMSTERDAM: CityId = CityId::new(3);

const TIMEOUT: Duration = Duration::from_secs(5);

fn record(id: i64, name: &str, country: &str, lat: f64, lon: f64) -> CityRecord {
    CityRecord {
        id,
        name: name.to_string(),
        country: country.to_string(),
        coord: CoordRecord { lat, lon },
    }
}

/// Three-city remote catalog.
pub fn catalog() -> Vec<CityRecord> {
    vec![
        record(1, "Berlin", "DE", 52.5244, 13.4105),
        record(2, "Boston", "US", 42.3584, -71.0598),
        record(3, "Amsterdam", "NL", 52.374, 4.8897),
    ]
}

/// Store the catalog locally with Boston marked as favorite.
pub async fn seed(store: &CityStore) {
    let cities: Vec<City> = catalog().into_iter().map(City::from).collect();
    store.upsert_cities(cities).await.unwrap();
    store.set_favorite(BOSTON, true).await.unwrap();
}

pub async fn seeded_store() -> CityStore {
    let store = CityStore::open_in_memory().unwrap();
    seed(&store).await;
    store
}

/// In-memory remote catalog with switchable failure and an optional gate
/// that holds each fetch until released.
pub struct FakeSource {
    records: Vec<CityRecord>,
    fail: AtomicBool,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl FakeSource {
    pub fn new(records: Vec<CityRecord>) -> Self {
        Self {
            records,
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn failing() -> Self {
        let source = Self::new(Vec::new());
        source.set_failing(true);
        source
    }

    pub fn gated(records: Vec<CityRecord>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(records)
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CitySource for FakeSource {
    async fn fetch_cities(&self) -> Result<Vec<CityRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Remote("network unreachable".to_string()));
        }
        Ok(self.records.clone())
    }
}

/// Wait until the channel holds a value matching `predicate`.
pub async fn wait_for<T: Clone>(
    rx: &mut watch::Receiver<T>,
    predicate: impl FnMut(&T) -> bool,
) -> T {
    let value = tokio::time::timeout(TIMEOUT, rx.wait_for(predicate))
        .await
        .expect("timed out waiting for state")
        .expect("state channel closed");
    T::clone(&value)
}

/// Poll `condition` until it holds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}

/// Write lock on a catalog file, taken from a second connection.
///
/// A store write started while it is held waits on it (up to the `SQLite`
/// busy timeout) and keeps the store occupied until release.
pub struct WriteLock(rusqlite::Connection);

impl WriteLock {
    pub fn acquire(path: &Path) -> Self {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.execute_batch("BEGIN IMMEDIATE").unwrap();
        Self(conn)
    }

    pub fn release(self) {
        self.0.execute_batch("ROLLBACK").unwrap();
    }
}
