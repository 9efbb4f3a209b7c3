//! HTTP server: spawns axum on a background tokio task.
use std::net::SocketAddr;
use std::path::Path;

use crate::api::api_router;
use crate::state::AppState;
use axum::Router;
use binder_core::catalog::Catalog;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Where the client bundle and card images are served from.
#[derive(Debug, Clone)]
pub struct StaticDirs<'a> {
    pub dist_dir: &'a Path,
    pub images_dir: &'a Path,
}

/// API routes plus static assets. Unknown paths fall back to the client's
/// `index.html` so client-side routing works.
pub fn build_router<C: Catalog + 'static>(state: AppState<C>, dirs: StaticDirs<'_>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let client = ServeDir::new(dirs.dist_dir).fallback(ServeFile::new(dirs.dist_dir.join("index.html")));

    api_router()
        .nest_service("/images", ServeDir::new(dirs.images_dir))
        .fallback_service(client)
        .layer(cors)
        .with_state(state)
}

pub async fn spawn_server(
    app: Router,
    bind_addr: &str,
    port: u16,
) -> Result<(SocketAddr, JoinHandle<()>), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    let local_addr = listener.local_addr()?;

    log::info!("HTTP server listening on http://{}", local_addr);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("HTTP server exited with error: {}", e);
        }
    });

    Ok((local_addr, handle))
}
