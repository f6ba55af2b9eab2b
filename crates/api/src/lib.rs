//! HTTP API for the site content store.
//!
//! Public routes serve the canonical (or template-scoped) document and
//! previews; `/api/admin/*` routes, behind basic auth, save content, manage
//! versions and templates, and generate copy.

pub mod config;
pub mod copywriter;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::{middleware::map_response, Router};

pub use self::config::AppConfig;
pub use self::error::{ApiError, ApiResult};
pub use self::state::AppState;

/// Router with the full middleware stack applied.
pub fn build_app(state: AppState) -> Router {
    let max_body_bytes = state.config().max_body_bytes;
    routes::build_router(state)
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::body_limit::body_limit_layer(max_body_bytes))
        .layer(map_response(middleware::body_limit::json_payload_too_large))
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer())
}
