//! City details screen controller.

use std::sync::{Arc, Mutex, MutexGuard};

use city_core::{City, CityId, CityStore, CityWatch};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::favorite::FavoriteState;
use crate::navigation::route_city_id;

/// Everything the details screen renders for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityDetails {
    pub id: CityId,
    pub name: String,
    pub country: String,
    pub coordinates: String,
    pub latitude: f64,
    pub longitude: f64,
    pub favorite_state: FavoriteState,
}

impl CityDetails {
    fn new(city: City, pending: bool) -> Self {
        let favorite_state = if pending {
            FavoriteState::Loading
        } else {
            FavoriteState::from_flag(city.is_favorite)
        };
        Self {
            id: city.id,
            name: city.name,
            country: city.country,
            coordinates: city.coordinates_string,
            latitude: city.coordinates.latitude,
            longitude: city.coordinates.longitude,
            favorite_state,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailViewState {
    Loading,
    /// Missing or malformed route argument, or no such city.
    Error,
    Success(CityDetails),
}

impl DetailViewState {
    /// Title for the screen's app bar.
    pub fn screen_title(&self) -> String {
        match self {
            Self::Loading => String::new(),
            Self::Error => "Error".to_string(),
            Self::Success(details) => format!("{}, {}", details.name, details.country),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailEvent {
    FavoriteClicked(FavoriteState),
}

/// Drives the details screen for the city named by a route argument.
pub struct CityDetailController {
    inner: Arc<Inner>,
    observer: Option<JoinHandle<()>>,
}

struct Inner {
    store: CityStore,
    city_id: Option<CityId>,
    view_state: watch::Sender<DetailViewState>,
    /// Whether a favorite write is in flight.
    pending: Mutex<bool>,
}

impl CityDetailController {
    /// Start observing the city named by `route_arg`.
    ///
    /// An absent or unparsable argument yields `Error` without touching the
    /// store.
    pub fn start(store: CityStore, route_arg: Option<&str>) -> Self {
        let city_id = route_city_id(route_arg);

        let initial = if city_id.is_some() {
            DetailViewState::Loading
        } else {
            DetailViewState::Error
        };
        let (view_state, _) = watch::channel(initial);

        let inner = Arc::new(Inner {
            store,
            city_id,
            view_state,
            pending: Mutex::new(false),
        });

        let observer = city_id.map(|id| {
            let lookup = inner.store.watch_city(id);
            tokio::spawn(Arc::clone(&inner).observe(lookup))
        });

        Self { inner, observer }
    }

    pub fn city_id(&self) -> Option<CityId> {
        self.inner.city_id
    }

    pub fn view_state(&self) -> watch::Receiver<DetailViewState> {
        self.inner.view_state.subscribe()
    }

    pub fn current_state(&self) -> DetailViewState {
        self.inner.view_state.borrow().clone()
    }

    pub fn screen_title(&self) -> String {
        self.inner.view_state.borrow().screen_title()
    }

    pub fn on_event(&self, event: DetailEvent) {
        match event {
            DetailEvent::FavoriteClicked(current) => self.inner.toggle_favorite(current),
        }
    }
}

impl Drop for CityDetailController {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.abort();
        }
    }
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, bool> {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    async fn observe(self: Arc<Self>, mut lookup: CityWatch) {
        loop {
            match lookup.next().await {
                Ok(Some(city)) => self.publish(city),
                Ok(None) => {
                    tracing::warn!(id = %lookup.id(), "City not found");
                    self.view_state.send_replace(DetailViewState::Error);
                }
                Err(error) => {
                    tracing::error!(id = %lookup.id(), "Failed to load city: {error}");
                    self.view_state.send_replace(DetailViewState::Error);
                }
            }
        }
    }

    fn publish(&self, city: City) {
        let pending = self.pending();
        let details = CityDetails::new(city, *pending);
        self.view_state
            .send_replace(DetailViewState::Success(details));
    }

    fn toggle_favorite(self: &Arc<Self>, current: FavoriteState) {
        let Some(id) = self.city_id else {
            return;
        };

        {
            let mut pending = self.pending();
            if *pending {
                tracing::debug!(%id, "Favorite write already pending; ignoring toggle");
                return;
            }
            let started = self.set_favorite_state(FavoriteState::Loading);
            if !started {
                return;
            }
            *pending = true;
        }

        let target = !current.as_bool();
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = inner.store.set_favorite(id, target).await;
            let mut pending = inner.pending();
            *pending = false;
            match result {
                Ok(()) => {
                    inner.set_favorite_state(FavoriteState::from_flag(target));
                }
                Err(error) => {
                    tracing::warn!(%id, "Failed to persist favorite: {error}");
                    inner.set_favorite_state(current);
                }
            }
        });
    }

    /// Patch the favorite indicator of a loaded city; false when nothing is
    /// loaded.
    fn set_favorite_state(&self, favorite_state: FavoriteState) -> bool {
        let mut loaded = false;
        self.view_state.send_if_modified(|state| {
            let DetailViewState::Success(details) = state else {
                return false;
            };
            loaded = true;
            if details.favorite_state == favorite_state {
                return false;
            }
            details.favorite_state = favorite_state;
            true
        });
        loaded
    }
}
