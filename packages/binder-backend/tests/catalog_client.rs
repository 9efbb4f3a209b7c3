use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use binder_backend::catalog::ScryfallClient;
use binder_backend::server::spawn_server;
use binder_core::catalog::{Catalog, CatalogError, SEARCH_FILTER};
use serde_json::json;

fn bolt() -> serde_json::Value {
    json!({
        "object": "card",
        "id": "id-bolt",
        "name": "Lightning Bolt",
        "image_uris": { "small": "https://img/s.jpg", "png": "https://img/bolt.png" },
        "color_identity": ["R"]
    })
}

fn delver() -> serde_json::Value {
    json!({
        "object": "card",
        "id": "id-delver",
        "name": "Delver of Secrets // Insectile Aberration",
        "card_faces": [
            { "image_uris": { "png": "https://img/delver-front.png" } },
            { "image_uris": { "png": "https://img/delver-back.png" } }
        ],
        "color_identity": ["U"]
    })
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "object": "error", "code": "not_found", "details": "No cards found" })),
    )
}

async fn search(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let q = params.get("q").cloned().unwrap_or_default();
    if !q.contains(SEARCH_FILTER) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "details": "missing filter" })));
    }
    if q.contains("(bolt)") {
        (StatusCode::OK, Json(json!({ "object": "list", "data": [bolt()] })))
    } else if q.contains("(many)") {
        (
            StatusCode::OK,
            Json(json!({ "object": "list", "data": [delver(), { "id": "x", "name": "No Art" }, bolt()] })),
        )
    } else if q.contains("(explode)") {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "details": "boom" })))
    } else {
        not_found()
    }
}

async fn card(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "id-bolt" => (StatusCode::OK, Json(bolt())),
        "id-delver" => (StatusCode::OK, Json(delver())),
        _ => not_found(),
    }
}

async fn start_catalog() -> ScryfallClient {
    let app = Router::new()
        .route("/cards/search", get(search))
        .route("/cards/{id}", get(card));
    let (addr, _handle) = spawn_server(app, "127.0.0.1", 0).await.unwrap();
    ScryfallClient::new(&format!("http://{}/", addr), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn search_by_name_returns_top_result() {
    let client = start_catalog().await;
    let card = client.search_by_name("bolt").await.unwrap().unwrap();
    assert_eq!(card.id, "id-bolt");
    assert_eq!(card.image_uri, "https://img/bolt.png");
    assert_eq!(card.color_identity, vec!["R"]);
}

#[tokio::test]
async fn search_not_found_is_empty() {
    let client = start_catalog().await;
    assert!(client.search_by_name("zzz").await.unwrap().is_none());
    assert!(client.search("zzz", 6).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_drops_cards_without_art() {
    let client = start_catalog().await;
    let cards = client.search("many", 6).await.unwrap();
    let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["id-delver", "id-bolt"]);
    assert_eq!(cards[0].image_uri, "https://img/delver-front.png");
}

#[tokio::test]
async fn search_server_error_is_status_error() {
    let client = start_catalog().await;
    let err = client.search("explode", 6).await.unwrap_err();
    assert!(matches!(err, CatalogError::Status { status: 500, .. }));
}

#[tokio::test]
async fn get_by_id() {
    let client = start_catalog().await;
    let card = client.get_by_id("id-delver").await.unwrap();
    assert_eq!(card.name, "Delver of Secrets // Insectile Aberration");

    let err = client.get_by_id("unknown").await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(id) if id == "unknown"));
}

#[tokio::test]
async fn unreachable_catalog_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ScryfallClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    assert!(matches!(client.get_by_id("id-bolt").await, Err(CatalogError::Http(_))));
}
