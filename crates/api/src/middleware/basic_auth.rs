use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};

use crate::error::ApiError;
use crate::state::AppState;

/// Gate for `/api/admin/*`: requires HTTP basic auth matching the configured
/// admin credentials. Without configured credentials every request is
/// rejected.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config().admin.as_ref() else {
        tracing::warn!("admin credentials not configured, rejecting admin request");
        return Err(ApiError::Unauthorized);
    };

    let Some(Authorization(basic)) = request.headers().typed_get::<Authorization<Basic>>() else {
        tracing::debug!("missing or malformed authorization header");
        return Err(ApiError::Unauthorized);
    };

    if basic.username() != expected.username || basic.password() != expected.password {
        tracing::debug!(username = basic.username(), "invalid admin credentials");
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
