/// Binder backend: config loading, store init, catalog client, HTTP server.
pub mod api;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod server;
pub mod state;

use std::time::Duration;

use binder_core::mutation::{ConcurrencyMode, MutationApi};
use binder_core::storage::file::{JsonFileStore, WriteMode};

use crate::catalog::ScryfallClient;
use crate::config::BackendConfig;
use crate::server::StaticDirs;
use crate::state::AppState;

/// Store configured with the requested write durability.
pub fn open_store(config: &BackendConfig) -> JsonFileStore {
    let mode = if config.atomic_writes {
        WriteMode::Atomic
    } else {
        WriteMode::Overwrite
    };
    JsonFileStore::new(&config.state_file).with_write_mode(mode)
}

pub fn open_catalog(config: &BackendConfig) -> Result<ScryfallClient, Box<dyn std::error::Error>> {
    Ok(ScryfallClient::new(
        &config.catalog_url,
        Duration::from_secs(config.catalog_timeout_secs),
    )?)
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = BackendConfig::from_env();
    let mode = if config.serialize_writes {
        ConcurrencyMode::Serialized
    } else {
        ConcurrencyMode::Unguarded
    };
    let api = MutationApi::with_mode(open_store(&config), mode);
    let state = AppState::new(api, open_catalog(&config)?);

    let app = server::build_router(
        state,
        StaticDirs {
            dist_dir: &config.dist_dir,
            images_dir: &config.images_dir,
        },
    );
    let (addr, handle) = server::spawn_server(app, &config.bind_address, config.port).await?;
    log::info!("Server is running on http://{}", addr);
    log::info!("State file: {}", config.state_file.display());

    tokio::select! {
        _ = handle => log::warn!("HTTP server task ended"),
        _ = tokio::signal::ctrl_c() => log::info!("[binder.shutdown] Interrupt received, exiting"),
    }
    Ok(())
}
