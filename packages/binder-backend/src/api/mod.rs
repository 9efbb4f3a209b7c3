use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use binder_core::catalog::Catalog;
use binder_core::storage::StoreError;
use serde::Serialize;

mod catalog;
mod cards;
mod import;
mod view;

use crate::state::AppState;

/// Axum REST API routes.
///
///   GET  /state                    -> full state document
///   POST /add-card                 -> add one card or an array of cards
///   POST /set-price                -> set one price or an array of prices
///   POST /import-csv?storeId=...   -> import a `name,price` CSV for a store
///   GET  /view?store=&q=&minPrice=&sort=  -> display rows
///   GET  /catalog/search?q=term    -> catalog candidates for the add picker
pub fn api_router<C: Catalog + 'static>() -> Router<AppState<C>> {
    Router::new()
        .route("/state", get(cards::get_state::<C>))
        .route("/add-card", post(cards::add_card::<C>))
        .route("/set-price", post(cards::set_price::<C>))
        .route("/import-csv", post(import::import_csv::<C>))
        .route("/view", get(view::view::<C>))
        .route("/catalog/search", get(catalog::search::<C>))
}

// ── Shared types and helpers used across sub-modules ────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

fn api_error(status: StatusCode, target: &'static str, error: String) -> ApiError {
    log_api_issue(status, target, &error);
    (status, Json(ErrorResponse { error }))
}

/// Store failures always surface as a 500.
fn store_error(target: &'static str, e: StoreError) -> ApiError {
    let error = match &e {
        StoreError::Io { .. } => "Error reading or writing state file",
        StoreError::Parse { .. } => "State file is not a valid state document",
        StoreError::Serialize(_) => "Error serializing state",
    };
    log_api_issue(StatusCode::INTERNAL_SERVER_ERROR, target, e.to_string());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}
