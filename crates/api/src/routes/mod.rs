pub mod content;
pub mod generate;
pub mod health;
pub mod preview;
pub mod templates;
pub mod versions;

use axum::{middleware, Router};
use sitecopy_core::{ContentDocument, PruneReport};

use crate::middleware::basic_auth::require_admin;
use crate::state::AppState;

/// Assemble the full router with all route groups.
///
/// Public: `/health`, `/api/content`, `/api/preview/*`, `/api/templates*`.
/// Admin (basic auth): `/api/admin/*`.
pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .merge(content::admin_routes())
        .merge(versions::admin_routes())
        .merge(templates::admin_routes())
        .merge(generate::admin_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let api = Router::new()
        .merge(content::routes())
        .merge(preview::routes())
        .merge(templates::routes())
        .nest("/admin", admin);

    Router::new()
        .merge(health::routes())
        .nest("/api", api)
        .with_state(state)
}

/// Trim version history after a save. Failures are logged, never returned:
/// the save itself already succeeded.
async fn prune_after_save(state: &AppState) -> Option<PruneReport> {
    match state
        .content()
        .prune_versions(state.config().version_retention)
        .await
    {
        Ok(report) => Some(report),
        Err(err) => {
            tracing::warn!(error = %err, "failed to prune content versions");
            None
        }
    }
}

/// Save through the content store, then apply retention.
async fn save_document(
    state: &AppState,
    doc: &ContentDocument,
) -> crate::error::ApiResult<ContentDocument> {
    let saved = state.content().write(doc).await?;
    prune_after_save(state).await;
    Ok(saved)
}
