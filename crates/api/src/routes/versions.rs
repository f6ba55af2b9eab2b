use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use sitecopy_core::{ContentDocument, PruneReport, VersionDiff, VersionInfo};

use super::prune_after_save;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/versions", get(list_versions).post(revert_version))
        .route("/versions/prune", post(prune_versions))
        .route("/versions/{filename}", get(get_version))
        .route("/versions/{filename}/diff", get(diff_version))
}

#[derive(Debug, Deserialize)]
struct RevertBody {
    filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PruneBody {
    max_kept: Option<usize>,
}

async fn list_versions(State(state): State<AppState>) -> ApiResult<Json<Vec<VersionInfo>>> {
    Ok(Json(state.content().list_versions().await?))
}

async fn revert_version(
    State(state): State<AppState>,
    payload: Result<Json<RevertBody>, JsonRejection>,
) -> ApiResult<Json<ContentDocument>> {
    let Json(body) = payload?;
    let filename = body
        .filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::BadRequest("filename is required".to_string()))?;

    let doc = state.content().revert_to(&filename).await?;
    prune_after_save(&state).await;
    Ok(Json(doc))
}

async fn get_version(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<ContentDocument>> {
    Ok(Json(state.content().read_version(&filename).await?))
}

async fn diff_version(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<VersionDiff>> {
    Ok(Json(state.content().diff_version(&filename).await?))
}

/// Manual retention pass. An empty body uses the configured retention.
async fn prune_versions(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<PruneReport>> {
    let body: PruneBody = if body.iter().all(u8::is_ascii_whitespace) {
        PruneBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };
    let max_kept = body.max_kept.unwrap_or(state.config().version_retention);
    Ok(Json(state.content().prune_versions(max_kept).await?))
}
