use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitecopy_core::PreviewSnapshot;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/preview/create", post(create_preview))
        .route("/preview/{id}", get(get_preview).delete(delete_preview))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePreviewBody {
    preview_id: Option<String>,
    content: Option<Value>,
    page: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewAck {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_id: Option<String>,
}

async fn create_preview(
    State(state): State<AppState>,
    payload: Result<Json<CreatePreviewBody>, JsonRejection>,
) -> ApiResult<Json<PreviewAck>> {
    let Json(body) = payload?;
    let preview_id = body.preview_id.unwrap_or_default();

    state
        .previews()
        .create(
            &preview_id,
            body.content.unwrap_or(Value::Null),
            body.page.as_deref(),
        )
        .await?;

    Ok(Json(PreviewAck {
        success: true,
        preview_id: Some(preview_id),
    }))
}

/// 404 when absent, 410 when expired.
async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PreviewSnapshot>> {
    Ok(Json(state.previews().read(&id).await?))
}

async fn delete_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PreviewAck>> {
    state.previews().delete(&id).await?;
    Ok(Json(PreviewAck {
        success: true,
        preview_id: None,
    }))
}
