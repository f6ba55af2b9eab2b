use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use crate::copywriter::CopyRequest;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/generate", post(generate_copy))
}

async fn generate_copy(
    State(state): State<AppState>,
    payload: Result<Json<CopyRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload?;
    let text = state.copywriter().generate(&request).await?;
    Ok(Json(json!({ "text": text })))
}
