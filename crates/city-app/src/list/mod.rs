//! City list screen controller.
//!
//! The visible list is recomputed from four inputs: the search bar, the
//! catalog store, the cross-screen selection, and a pulse emitted after each
//! successful sync. A single combiner task holds the latest value of each and
//! republishes the view state whenever one of them changes.

mod state;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use city_core::{filter_cities, City, CityId, CityStore, SyncCoordinator};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::favorite::FavoriteState;
use crate::navigation::NavigationEvent;
use crate::selection::SelectionCoordinator;

pub use state::{CityItem, ListError, ListEvent, ListViewState, SearchBarState};

/// Drives the city list screen.
///
/// Dropping the controller stops its combiner task.
pub struct CityListController {
    inner: Arc<Inner>,
    combiner: JoinHandle<()>,
}

struct Inner {
    sync: SyncCoordinator,
    selection: SelectionCoordinator,
    view_state: watch::Sender<ListViewState>,
    search: watch::Sender<SearchBarState>,
    refresh_pulse: watch::Sender<u64>,
    /// Cities with a favorite write in flight.
    pending_favorites: Mutex<HashSet<CityId>>,
    navigation: mpsc::UnboundedSender<NavigationEvent>,
}

impl CityListController {
    /// Start the controller: kick off the initial (non-forced) sync and the
    /// combiner. Must be called inside a Tokio runtime.
    pub fn start(
        sync: SyncCoordinator,
        selection: SelectionCoordinator,
    ) -> (Self, mpsc::UnboundedReceiver<NavigationEvent>) {
        let (navigation, navigation_rx) = mpsc::unbounded_channel();
        let (view_state, _) = watch::channel(ListViewState::LoadingRemote);
        let (search, _) = watch::channel(SearchBarState::default());
        let (refresh_pulse, _) = watch::channel(0);

        let inner = Arc::new(Inner {
            sync,
            selection,
            view_state,
            search,
            refresh_pulse,
            pending_favorites: Mutex::new(HashSet::new()),
            navigation,
        });

        let combiner = tokio::spawn(Arc::clone(&inner).run_combiner());
        inner.spawn_sync(false);

        (Self { inner, combiner }, navigation_rx)
    }

    pub fn view_state(&self) -> watch::Receiver<ListViewState> {
        self.inner.view_state.subscribe()
    }

    pub fn current_state(&self) -> ListViewState {
        self.inner.view_state.borrow().clone()
    }

    pub fn search_bar(&self) -> watch::Receiver<SearchBarState> {
        self.inner.search.subscribe()
    }

    pub fn on_event(&self, event: ListEvent) {
        match event {
            ListEvent::SearchQueryChanged(query) => {
                self.inner.search.send_modify(|search| search.query = query);
            }
            ListEvent::OnlyFavoritesToggled => {
                self.inner
                    .search
                    .send_modify(|search| search.only_favorites = !search.only_favorites);
            }
            ListEvent::CityClicked(id) => {
                self.inner.selection.select(Some(id));
                self.inner.navigate(NavigationEvent::MapIfSinglePane(id));
            }
            ListEvent::CityDetailsClicked(id) => {
                self.inner.navigate(NavigationEvent::Details(id));
            }
            ListEvent::CityFavoriteClicked { id, current } => {
                self.inner.toggle_favorite(id, current);
            }
            ListEvent::Refresh => self.inner.spawn_sync(true),
        }
    }
}

impl Drop for CityListController {
    fn drop(&mut self) {
        self.combiner.abort();
    }
}

impl Inner {
    fn store(&self) -> &CityStore {
        self.sync.store()
    }

    fn pending_favorites(&self) -> MutexGuard<'_, HashSet<CityId>> {
        self.pending_favorites
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn navigate(&self, event: NavigationEvent) {
        if self.navigation.send(event).is_err() {
            tracing::debug!(?event, "Navigation receiver dropped");
        }
    }

    fn spawn_sync(self: &Arc<Self>, force_refresh: bool) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            match inner.sync.sync(force_refresh).await {
                Ok(_) => inner.refresh_pulse.send_modify(|pulse| *pulse += 1),
                Err(_) => {
                    inner
                        .view_state
                        .send_replace(ListViewState::Error(ListError::Network));
                }
            }
        });
    }

    /// Two-phase favorite toggle: mark pending and show `Loading` now, then
    /// settle to the written value or roll back to `current`.
    fn toggle_favorite(self: &Arc<Self>, id: CityId, current: FavoriteState) {
        if !self.pending_favorites().insert(id) {
            tracing::debug!(%id, "Favorite write already pending; ignoring toggle");
            return;
        }
        self.set_item_favorite_state(id, FavoriteState::Loading);

        let target = !current.as_bool();
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = inner.store().set_favorite(id, target).await;
            inner.pending_favorites().remove(&id);
            match result {
                Ok(()) => inner.set_item_favorite_state(id, FavoriteState::from_flag(target)),
                Err(error) => {
                    tracing::warn!(%id, "Failed to persist favorite: {error}");
                    inner.set_item_favorite_state(id, current);
                }
            }
        });
    }

    fn set_item_favorite_state(&self, id: CityId, favorite_state: FavoriteState) {
        self.view_state.send_if_modified(|state| {
            let ListViewState::Success(items) = state else {
                return false;
            };
            let Some(item) = items.iter_mut().find(|item| item.id == id) else {
                return false;
            };
            if item.favorite_state == favorite_state {
                return false;
            }
            item.favorite_state = favorite_state;
            true
        });
    }

    async fn run_combiner(self: Arc<Self>) {
        let mut search = self.search.subscribe();
        let mut catalog = self.store().changes();
        let mut selection = self.selection.observe();
        let mut pulse = self.refresh_pulse.subscribe();
        let mut cities: Option<Vec<City>> = None;

        loop {
            if cities.is_none() {
                catalog.borrow_and_update();
                match self.store().all_cities().await {
                    Ok(all) => cities = Some(all),
                    Err(error) => {
                        tracing::error!("Failed to read city catalog: {error}");
                        self.view_state
                            .send_replace(ListViewState::Error(ListError::General));
                    }
                }
            }

            if let Some(all) = &cities {
                let search_state = search.borrow_and_update().clone();
                let selected = *selection.borrow_and_update();
                let sync_completed = *pulse.borrow_and_update() > 0;
                self.publish(all, &search_state, selected, sync_completed);
            }

            tokio::select! {
                changed = search.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = catalog.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    cities = None;
                }
                changed = selection.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = pulse.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.view_state.send_if_modified(|state| {
                        if *state == ListViewState::LoadingRemote {
                            *state = ListViewState::LoadingLocal;
                            true
                        } else {
                            false
                        }
                    });
                    cities = None;
                }
            }
        }
    }

    fn publish(
        &self,
        cities: &[City],
        search: &SearchBarState,
        selected: Option<CityId>,
        sync_completed: bool,
    ) {
        let filtered = filter_cities(cities, &search.query, search.only_favorites);
        // Held across the send: a favorite write settles either before this
        // publish or after it, never in between.
        let pending = self.pending_favorites();
        let items: Vec<CityItem> = filtered
            .into_iter()
            .map(|city| {
                let is_pending = pending.contains(&city.id);
                CityItem::new(city, selected, is_pending)
            })
            .collect();

        self.view_state.send_if_modified(|state| {
            let next = state.resolve(items, sync_completed);
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}
