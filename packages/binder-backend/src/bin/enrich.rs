//! Backfill `colorIdentity` for every card in the state file from the catalog.

use binder_backend::config::BackendConfig;
use binder_backend::{logging, open_catalog, open_store};
use binder_core::enrich::enrich_color_identity;

#[tokio::main]
async fn main() {
    logging::init();
    let config = BackendConfig::from_env();
    log::info!("State file: {}", config.state_file.display());

    let result = async {
        let catalog = open_catalog(&config)?;
        let report = enrich_color_identity(&open_store(&config), &catalog).await?;
        Ok::<_, Box<dyn std::error::Error>>(report)
    }
    .await;

    match result {
        Ok(report) if report.failed.is_empty() => {}
        Ok(report) => log::warn!("{} cards could not be updated: {}", report.failed.len(), report.failed.join(", ")),
        Err(e) => {
            log::error!("Color identity update failed: {}", e);
            std::process::exit(1);
        }
    }
}
