//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! `POST /chat` is the only API endpoint; everything else is served from the
//! static directory, which holds the chat page and the compiled widget under
//! `/pkg`.

pub mod chat;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes only, without static file serving.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(chat::chat))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application: API routes, static files as fallback.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let static_files = ServeDir::new(static_dir).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
