use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use binder_core::catalog::Catalog;
use binder_core::mutation::{parse_batch, AddCard, SetPrice};
use serde_json::json;

use super::{api_error, store_error, ApiError};
use crate::state::AppState;

/// Decode a raw request body so malformed JSON gets the same `{error}` shape
/// as every other rejection.
fn json_body(body: &Bytes, target: &'static str) -> Result<serde_json::Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, target, format!("Invalid JSON body: {}", e)))
}

pub async fn get_state<C: Catalog>(State(state): State<AppState<C>>) -> Result<Json<serde_json::Value>, ApiError> {
    let current = state
        .api
        .get_state()
        .map_err(|e| store_error("binder.api.get_state", e))?;
    Ok(Json(json!({ "state": current })))
}

/// POST /add-card -- body is one `{cardId, name, imageUri, colorIdentity?}` or an array.
/// Duplicates and malformed items are skipped, not failed.
pub async fn add_card<C: Catalog>(
    State(state): State<AppState<C>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let body = json_body(&body, "binder.api.add_card")?;
    let batch = parse_batch::<AddCard>(body)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "binder.api.add_card", e.to_string()))?;
    log::info!(
        target: "binder.api.add_card",
        "Adding {} cards ({} rejected)",
        batch.items.len(),
        batch.rejected.len()
    );

    let outcome = state
        .api
        .add_cards(&batch.items)
        .map_err(|e| store_error("binder.api.add_card", e))?;
    Ok(Json(json!({ "state": outcome.state })))
}

/// POST /set-price -- body is one `{cardId, storeId, price}` or an array.
/// Unknown cards and malformed items are skipped, not failed.
pub async fn set_price<C: Catalog>(
    State(state): State<AppState<C>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let body = json_body(&body, "binder.api.set_price")?;
    let batch = parse_batch::<SetPrice>(body)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, "binder.api.set_price", e.to_string()))?;
    log::info!(
        target: "binder.api.set_price",
        "Setting {} prices ({} rejected)",
        batch.items.len(),
        batch.rejected.len()
    );

    let outcome = state
        .api
        .set_prices(&batch.items)
        .map_err(|e| store_error("binder.api.set_price", e))?;
    Ok(Json(json!({ "state": outcome.state })))
}
