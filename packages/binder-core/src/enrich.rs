//! One-off backfill of `colorIdentity` from the catalog for every tracked card.

use crate::catalog::Catalog;
use crate::storage::{StateStore, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub updated: usize,
    pub failed: Vec<String>,
}

/// Look up each card by id and overwrite its color identity. Cards the
/// catalog cannot return keep their current value. The document is saved
/// once at the end.
pub async fn enrich_color_identity<S, C>(store: &S, catalog: &C) -> Result<EnrichReport, StoreError>
where
    S: StateStore,
    C: Catalog,
{
    let mut state = store.load()?;
    let mut report = EnrichReport::default();

    for (card_id, card) in state.cards.iter_mut() {
        match catalog.get_by_id(card_id).await {
            Ok(found) => {
                card.color_identity = found.color_identity;
                log::info!(
                    target: "binder.enrich",
                    "Updated {}: [{}]",
                    card.name,
                    card.color_identity.join(",")
                );
                report.updated += 1;
            }
            Err(e) => {
                log::error!(target: "binder.enrich", "Failed for {} ({}): {}", card.name, card_id, e);
                report.failed.push(card_id.clone());
            }
        }
    }

    store.save(&state)?;
    log::info!(
        target: "binder.enrich",
        "Done updating colorIdentity: {} updated, {} failed",
        report.updated,
        report.failed.len()
    );
    Ok(report)
}
