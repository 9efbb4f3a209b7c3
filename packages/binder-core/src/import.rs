//! CSV price import.
//!
//! Rows of `name,price` are resolved one at a time through the catalog. Cards
//! not already tracked (by case-insensitive name) are added in one batch, then
//! every resolved row's price is set in a second batch for the chosen store.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::mutation::{AddCard, MutationApi, SetPrice};
use crate::storage::{StateStore, StoreError};
use crate::types::State;

#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("No store selected for import")]
    NoStoreSelected,

    #[error("Batch add failed: {0}")]
    AddFailed(#[source] StoreError),

    #[error("Batch price set failed: {0}")]
    PriceFailed(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub rows: usize,
    pub rejected_rows: usize,
    pub unresolved: Vec<String>,
    pub cards_added: usize,
    pub prices_set: usize,
    #[serde(skip)]
    pub state: State,
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = field
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    field
}

/// Split CSV text into rows. The first line is a header. Lines with no name or
/// an unparseable price come back as errors, numbered from 1.
pub fn parse_csv(text: &str) -> (Vec<CsvRow>, Vec<RowError>) {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in text.trim().lines().enumerate().skip(1) {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let name = unquote(fields.next().unwrap_or_default());
        let price = unquote(fields.next().unwrap_or_default());

        if name.is_empty() {
            errors.push(RowError {
                line: line_no,
                message: "missing card name".to_string(),
            });
            continue;
        }
        match price.parse::<f64>() {
            Ok(price) if price.is_finite() => rows.push(CsvRow {
                name: name.to_string(),
                price,
            }),
            _ => errors.push(RowError {
                line: line_no,
                message: format!("invalid price {:?} for {}", price, name),
            }),
        }
    }
    (rows, errors)
}

/// Run a full import against `store_id`.
///
/// Lookups are sequential. A failed or empty lookup skips that row only.
/// The add batch lands before the price batch; if either fails the import
/// stops there and whatever was already saved stays saved.
pub async fn import_csv<C, S>(
    text: &str,
    store_id: &str,
    catalog: &C,
    api: &MutationApi<S>,
) -> Result<ImportReport, ImportError>
where
    C: Catalog,
    S: StateStore,
{
    if store_id.trim().is_empty() {
        return Err(ImportError::NoStoreSelected);
    }

    let (rows, row_errors) = parse_csv(text);
    for err in &row_errors {
        log::warn!(target: "binder.import", "Skipping CSV row, {}", err);
    }

    let known = api.get_state()?;
    let mut report = ImportReport {
        rows: rows.len(),
        rejected_rows: row_errors.len(),
        ..Default::default()
    };
    let mut cards_to_add: Vec<AddCard> = Vec::new();
    let mut prices_to_set: Vec<SetPrice> = Vec::new();

    for row in &rows {
        let card = match catalog.search_by_name(&row.name).await {
            Ok(Some(card)) => card,
            Ok(None) => {
                log::warn!(target: "binder.import", "No catalog result for: {}", row.name);
                report.unresolved.push(row.name.clone());
                continue;
            }
            Err(e) => {
                log::error!(target: "binder.import", "Error importing {}: {}", row.name, e);
                report.unresolved.push(row.name.clone());
                continue;
            }
        };

        if !known.has_card_named(&card.name) {
            cards_to_add.push(AddCard {
                card_id: card.id.clone(),
                name: card.name,
                image_uri: card.image_uri,
                color_identity: Some(card.color_identity),
            });
        }
        prices_to_set.push(SetPrice {
            card_id: card.id,
            store_id: store_id.to_string(),
            price: row.price,
        });
    }

    // Counts reflect what applied, not what was queued: two rows resolving
    // to the same new card add it once.
    if !cards_to_add.is_empty() {
        let outcome = api.add_cards(&cards_to_add).map_err(ImportError::AddFailed)?;
        report.cards_added = cards_to_add.len() - outcome.skipped.len();
    }
    if !prices_to_set.is_empty() {
        let outcome = api.set_prices(&prices_to_set).map_err(ImportError::PriceFailed)?;
        report.prices_set = prices_to_set.len() - outcome.skipped.len();
    }

    report.state = api.get_state()?;
    log::info!(
        target: "binder.import",
        "Imported {} rows into {}: {} new cards, {} prices, {} unresolved, {} rejected",
        report.rows,
        store_id,
        report.cards_added,
        report.prices_set,
        report.unresolved.len(),
        report.rejected_rows
    );
    Ok(report)
}
