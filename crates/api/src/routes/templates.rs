use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use sitecopy_core::{ContentDocument, QueryParams, TemplateMeta};

use super::content::ContentBody;
use super::save_document;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Keys that clear the persisted template instead of naming one.
const DEFAULT_TEMPLATE_KEYS: [&str; 2] = ["", "default"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates))
        .route("/templates/active", get(active_template))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/apply-template", post(apply_template))
        .route(
            "/templates/{key}/content",
            get(get_template_content).put(put_template_content),
        )
}

async fn list_templates(State(state): State<AppState>) -> Json<Vec<TemplateMeta>> {
    Json(state.resolver().registry().list().to_vec())
}

/// Template a page would render with: `?path=/about&template=..&preview=..`.
async fn active_template(
    State(state): State<AppState>,
    Query(query): Query<QueryParams>,
) -> ApiResult<Json<Option<TemplateMeta>>> {
    let doc = state.content().read().await?;
    let pathname = query.get("path").map(String::as_str).unwrap_or("/");
    let active = state
        .resolver()
        .resolve(pathname, &query, doc.template())
        .cloned();
    Ok(Json(active))
}

fn registered<'a>(state: &'a AppState, key: &str) -> ApiResult<&'a TemplateMeta> {
    state
        .resolver()
        .registry()
        .get(key)
        .ok_or_else(|| ApiError::NotFound(format!("template {key}")))
}

/// Persist the template selection on the canonical document.
///
/// Body `{"template": "<key>"}`; `null`, `""` or `"default"` return to the
/// default shell.
async fn apply_template(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ContentDocument>> {
    let Json(body) = payload?;
    let key = match body.get("template") {
        None => return Err(ApiError::BadRequest("template is required".to_string())),
        Some(Value::Null) => None,
        Some(Value::String(key)) if DEFAULT_TEMPLATE_KEYS.contains(&key.as_str()) => None,
        Some(Value::String(key)) => Some(registered(&state, key)?.key.clone()),
        Some(_) => {
            return Err(ApiError::BadRequest(
                "template must be a string or null".to_string(),
            ))
        }
    };

    let mut doc = state.content().read().await?;
    doc.set_template(key.as_deref());
    let saved = save_document(&state, &doc).await?;
    tracing::info!(template = ?key, "template applied");
    Ok(Json(saved))
}

async fn get_template_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<ContentDocument>> {
    registered(&state, &key)?;
    state
        .content()
        .read_template_content(&key)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("content for template {key}")))
}

async fn put_template_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> ApiResult<Json<ContentDocument>> {
    registered(&state, &key)?;
    let Json(body) = payload?;
    let doc = body.into_document()?;
    Ok(Json(state.content().write_template_content(&key, &doc).await?))
}
