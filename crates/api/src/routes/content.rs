use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Query, State},
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use sitecopy_core::{ContentDocument, QueryParams, StoreError};

use super::save_document;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header naming the template whose content was served.
const ACTIVE_TEMPLATE_HEADER: HeaderName = HeaderName::from_static("x-active-template");

/// Query parameter naming the page path being rendered.
const PATH_PARAM: &str = "path";

pub fn routes() -> Router<AppState> {
    Router::new().route("/content", get(get_content))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/content", put(update_content))
}

/// Body carrying a full content document.
#[derive(Debug, Deserialize)]
pub struct ContentBody {
    pub content: Option<Value>,
}

impl ContentBody {
    /// The document in the body; 400 when absent or not an object.
    pub fn into_document(self) -> ApiResult<ContentDocument> {
        match self.content {
            None | Some(Value::Null) => Err(ApiError::BadRequest("content is required".to_string())),
            Some(value) => Ok(ContentDocument::from_value(value).map_err(StoreError::from)?),
        }
    }
}

/// Public read: template-scoped content when the request resolves to a
/// template that has its own content file, otherwise the canonical document.
async fn get_content(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<QueryParams>,
) -> ApiResult<Response> {
    let canonical = state.content().read().await?;
    let pathname = query
        .get(PATH_PARAM)
        .map(String::as_str)
        .unwrap_or_else(|| uri.path());

    let active = state
        .resolver()
        .resolve(pathname, &query, canonical.template())
        .cloned();

    let (doc, served_template) = match active {
        Some(meta) => match state.content().read_template_content(&meta.key).await? {
            Some(scoped) => (scoped, Some(meta.key)),
            None => (canonical, None),
        },
        None => (canonical, None),
    };

    let mut response = Json(doc).into_response();
    if let Some(key) = served_template {
        if let Ok(value) = HeaderValue::from_str(&key) {
            response.headers_mut().insert(ACTIVE_TEMPLATE_HEADER, value);
        }
    }
    Ok(response)
}

async fn update_content(
    State(state): State<AppState>,
    payload: Result<Json<ContentBody>, JsonRejection>,
) -> ApiResult<Json<ContentDocument>> {
    let Json(body) = payload?;
    let doc = body.into_document()?;
    let saved = save_document(&state, &doc).await?;
    Ok(Json(saved))
}
