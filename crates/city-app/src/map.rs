//! Map screen controller.
//!
//! Either follows the cross-screen selection (two-pane layouts) or shows the
//! one city named by a `city_map/{id}` route. Each newly selected city gets
//! its own lookup task; the previous one is aborted, and a generation counter
//! keeps a task that is already mid-publish from overwriting a newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use city_core::{City, CityId, CityStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::navigation::route_city_id;
use crate::selection::SelectionCoordinator;

#[derive(Debug, Clone, PartialEq)]
pub enum MapViewState {
    NoSelection,
    /// A routed city is being looked up.
    Loading,
    /// The selected city could not be loaded, or the route named none.
    Error,
    Success(City),
}

/// Drives the map screen from the current selection or a route argument.
pub struct CityMapController {
    inner: Arc<Inner>,
    observer: Option<JoinHandle<()>>,
}

struct Inner {
    store: CityStore,
    view_state: watch::Sender<MapViewState>,
    generation: AtomicU64,
    lookup: Mutex<Option<Lookup>>,
}

struct Lookup {
    id: CityId,
    task: JoinHandle<()>,
}

impl CityMapController {
    pub fn start(store: CityStore, selection: &SelectionCoordinator) -> Self {
        let inner = Inner::new(store, MapViewState::NoSelection);
        let observer = tokio::spawn(Arc::clone(&inner).follow_selection(selection.observe()));
        Self {
            inner,
            observer: Some(observer),
        }
    }

    /// Show the city named by a map route argument, e.g. the `42` of
    /// `city_map/42`.
    ///
    /// An absent or unparsable argument yields `Error` without touching the
    /// store; otherwise the state is `Loading` until the first lookup lands.
    pub fn for_route(store: CityStore, route_arg: Option<&str>) -> Self {
        let city_id = route_city_id(route_arg);
        let initial = if city_id.is_some() {
            MapViewState::Loading
        } else {
            MapViewState::Error
        };

        let inner = Inner::new(store, initial);
        if city_id.is_some() {
            inner.select(city_id);
        }
        Self {
            inner,
            observer: None,
        }
    }

    pub fn view_state(&self) -> watch::Receiver<MapViewState> {
        self.inner.view_state.subscribe()
    }

    pub fn current_state(&self) -> MapViewState {
        self.inner.view_state.borrow().clone()
    }
}

impl Drop for CityMapController {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.abort();
        }
        self.inner.stop_lookup();
    }
}

impl Inner {
    fn new(store: CityStore, initial: MapViewState) -> Arc<Self> {
        let (view_state, _) = watch::channel(initial);
        Arc::new(Self {
            store,
            view_state,
            generation: AtomicU64::new(0),
            lookup: Mutex::new(None),
        })
    }

    fn lookup(&self) -> MutexGuard<'_, Option<Lookup>> {
        self.lookup
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn stop_lookup(&self) {
        if let Some(previous) = self.lookup().take() {
            previous.task.abort();
        }
    }

    async fn follow_selection(self: Arc<Self>, mut selection: watch::Receiver<Option<CityId>>) {
        loop {
            let selected = *selection.borrow_and_update();
            self.select(selected);
            if selection.changed().await.is_err() {
                break;
            }
        }
    }

    fn select(self: &Arc<Self>, selected: Option<CityId>) {
        let mut lookup = self.lookup();
        if let (Some(id), Some(current)) = (selected, lookup.as_ref()) {
            if current.id == id {
                return;
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = lookup.take() {
            previous.task.abort();
        }

        match selected {
            Some(id) => {
                tracing::debug!(%id, "Following selected city on the map");
                let task = tokio::spawn(Arc::clone(self).follow_city(id, generation));
                *lookup = Some(Lookup { id, task });
            }
            None => self.publish(generation, MapViewState::NoSelection),
        }
    }

    async fn follow_city(self: Arc<Self>, id: CityId, generation: u64) {
        let mut city = self.store.watch_city(id);
        loop {
            let next = match city.next().await {
                Ok(Some(city)) => MapViewState::Success(city),
                Ok(None) => {
                    tracing::warn!(%id, "Selected city not found");
                    MapViewState::Error
                }
                Err(error) => {
                    tracing::error!(%id, "Failed to load selected city: {error}");
                    MapViewState::Error
                }
            };
            self.publish(generation, next);
        }
    }

    /// Publish `next` unless a newer selection has taken over.
    fn publish(&self, generation: u64, next: MapViewState) {
        self.view_state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation || *state == next {
                return false;
            }
            *state = next;
            true
        });
    }
}
