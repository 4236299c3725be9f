//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the two API endpoints and the health probe under one
//! Axum router. When a site directory is configured, the prebuilt portfolio
//! pages are served from it for every other path.

pub mod contact;
pub mod proxy;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let site_dir = state.site_dir.clone();

    let router = Router::new()
        .route("/api/contact", post(contact::submit_contact))
        .route("/api/chat", post(proxy::proxy_chat))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match site_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
