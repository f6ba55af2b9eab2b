use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sitecopy_core::StoreError;

/// API error type rendered as `{"error": {type, message, statusCode}}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("payload too large")]
    PayloadTooLarge,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::Upstream(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "upstreamError", msg.clone())
            }
            ApiError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                msg.clone(),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payloadTooLarge",
                "Request body exceeds the configured limit".to_string(),
            ),
            ApiError::Store(err) => match err {
                StoreError::Validation(e) => (StatusCode::BAD_REQUEST, "badRequest", e.to_string()),
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "notFound", err.to_string()),
                StoreError::Expired(_) => (StatusCode::GONE, "expired", err.to_string()),
                StoreError::Io { .. } | StoreError::Parse { .. } | StoreError::Serialize(_) => {
                    tracing::error!(error = %err, "content store error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internalError",
                        err.to_string(),
                    )
                }
            },
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"admin\""),
            );
        }
        response
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
