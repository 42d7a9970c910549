//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the viewer and publisher websockets, the JSON endpoints
//! and the static host page under a single Axum router. Everything that is not
//! an API route falls through to `STATIC_DIR`, which holds `index.html`, the
//! wasm package and the icon/map images.

pub mod radar;
pub mod tables;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full relay router: API routes plus the static fallback.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = Router::new()
        .fallback_service(ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true))
        .layer(CompressionLayer::new());

    Router::new()
        .route("/ws", get(ws::handle_viewer))
        .route("/ws/publish", get(ws::handle_publisher))
        .route("/radar.json", get(radar::latest).post(radar::publish))
        .route("/actors.json", get(tables::agents))
        .route("/weapons.json", get(tables::weapons))
        .route("/healthz", get(healthz))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
