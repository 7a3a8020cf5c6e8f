//! Cross-screen city selection.

use std::sync::Arc;

use city_core::CityId;
use tokio::sync::watch;

/// Single-slot holder of the currently selected city.
///
/// Created once by the launcher and cloned into every consumer. Subscribers
/// see the latest value as soon as they subscribe, then every later change.
#[derive(Clone)]
pub struct SelectionCoordinator {
    selected: Arc<watch::Sender<Option<CityId>>>,
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        let (selected, _) = watch::channel(None);
        Self {
            selected: Arc::new(selected),
        }
    }

    /// Replace the selection unconditionally.
    pub fn select(&self, id: Option<CityId>) {
        tracing::debug!(?id, "City selection changed");
        self.selected.send_replace(id);
    }

    pub fn observe(&self) -> watch::Receiver<Option<CityId>> {
        self.selected.subscribe()
    }

    pub fn current(&self) -> Option<CityId> {
        *self.selected.borrow()
    }
}
