use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// CORS for the public read endpoints and the admin UI.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
