use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use binder_core::catalog::Catalog;
use binder_core::import::{self as csv_import, ImportError};
use serde::Deserialize;
use serde_json::json;

use super::{api_error, store_error, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ImportParams {
    #[serde(rename = "storeId")]
    store_id: Option<String>,
}

/// POST /import-csv?storeId=... -- raw CSV body with a header row and
/// `name,price` lines. Rows that fail to parse or resolve are skipped.
pub async fn import_csv<C: Catalog>(
    State(state): State<AppState<C>>,
    Query(params): Query<ImportParams>,
    body: String,
) -> Result<Json<serde_json::Value>, ApiError> {
    let store_id = params.store_id.unwrap_or_default();
    let report = csv_import::import_csv(&body, &store_id, state.catalog.as_ref(), state.api.as_ref())
        .await
        .map_err(|e| match e {
            ImportError::NoStoreSelected => api_error(
                StatusCode::BAD_REQUEST,
                "binder.api.import_csv",
                "Select a store before importing a CSV".to_string(),
            ),
            ImportError::AddFailed(source) | ImportError::PriceFailed(source) | ImportError::Store(source) => {
                store_error("binder.api.import_csv", source)
            }
        })?;

    Ok(Json(json!({ "state": &report.state, "report": &report })))
}
