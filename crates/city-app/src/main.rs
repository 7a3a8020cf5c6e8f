//! City Explorer launcher.
//!
//! Loads configuration, opens the local catalog, and runs the list screen
//! until its first settled state, which is logged before exiting.

use std::sync::Arc;

use city_app::{CityListController, ListViewState, SelectionCoordinator};
use city_core::config::AppConfig;
use city_core::remote::HttpCitySource;
use city_core::{CityStore, SyncCoordinator};
use thiserror::Error;

#[derive(Debug, Error)]
enum LaunchError {
    #[error(transparent)]
    Core(#[from] city_core::Error),

    #[error("Invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("City list stopped before settling")]
    ListClosed,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), LaunchError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("city=info".parse()?),
        )
        .init();

    let config = AppConfig::load();
    tracing::info!(
        source_url = %config.source_url,
        db_path = %config.db_path.display(),
        "Starting City Explorer"
    );

    let store = CityStore::open(&config.db_path)?;
    let source = HttpCitySource::new(&config.source_url, config.http_timeout)?;
    let sync = SyncCoordinator::new(store, Arc::new(source));
    let selection = SelectionCoordinator::new();

    let (controller, _navigation) = CityListController::start(sync, selection);
    let mut states = controller.view_state();
    let settled = states
        .wait_for(|state| !state.is_loading())
        .await
        .map_err(|_| LaunchError::ListClosed)?
        .clone();

    match settled {
        ListViewState::Success(items) => {
            let favorites = items
                .iter()
                .filter(|item| item.favorite_state.as_bool())
                .count();
            tracing::info!(cities = items.len(), favorites, "City list ready");
            if let Some(first) = items.first() {
                tracing::info!(
                    "First city: {}, {} ({})",
                    first.name,
                    first.country,
                    first.coordinates
                );
            }
        }
        ListViewState::Empty => tracing::info!("City list is empty"),
        ListViewState::Error(error) => tracing::error!("{}", error.message()),
        ListViewState::LoadingRemote | ListViewState::LoadingLocal => {}
    }

    Ok(())
}
