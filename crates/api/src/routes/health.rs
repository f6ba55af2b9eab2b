use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ping", get(ping))
}

/// Full health check: the canonical document must load.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let doc = state.content().read().await?;
    let versions = state.content().list_versions().await?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "template": doc.template(),
        "versions": versions.len(),
        "copywriter": state.copywriter().is_configured(),
    })))
}

/// Lightweight ping, no disk access.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
