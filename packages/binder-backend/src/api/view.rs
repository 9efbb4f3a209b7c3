use axum::{
    extract::{Query, State},
    response::Json,
};
use binder_core::catalog::Catalog;
use binder_core::view::{self, SortMode, ViewQuery};
use serde::Deserialize;
use serde_json::json;

use super::{store_error, ApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ViewParams {
    store: Option<String>,
    q: Option<String>,
    #[serde(rename = "minPrice")]
    min_price: Option<f64>,
    #[serde(default)]
    sort: SortMode,
}

pub async fn view<C: Catalog>(
    State(state): State<AppState<C>>,
    Query(params): Query<ViewParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let current = state
        .api
        .get_state()
        .map_err(|e| store_error("binder.api.view", e))?;

    let mut query = ViewQuery {
        search: params.q.unwrap_or_default(),
        min_price: params.min_price,
        sort: params.sort,
        ..Default::default()
    };
    query.select_store(params.store.as_deref());

    let rows = view::render(&current, &query);
    Ok(Json(json!({ "storeIds": current.store_ids, "rows": rows })))
}
