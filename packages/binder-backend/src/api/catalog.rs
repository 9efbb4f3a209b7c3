use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use binder_core::catalog::Catalog;
use serde::Deserialize;
use serde_json::json;

use super::{api_error, ApiError};
use crate::state::AppState;

/// Candidates shown by the add-card picker.
const PICKER_SIZE: usize = 6;

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

pub async fn search<C: Catalog>(
    State(state): State<AppState<C>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(json!({ "query": query, "cards": [] })));
    }

    let cards = state
        .catalog
        .search(&query, PICKER_SIZE)
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, "binder.api.catalog_search", e.to_string()))?;
    Ok(Json(json!({ "query": query, "cards": cards })))
}
