use axum::body::Body;
use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::{Level, Span};

type MakeSpanFn = fn(&Request<Body>) -> Span;

/// Build the tracing layer for request/response logging, one span per request.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn> {
    TraceLayer::new_for_http().make_span_with(make_span as MakeSpanFn)
}

fn make_span(request: &Request<Body>) -> Span {
    tracing::span!(
        Level::INFO,
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        query = request.uri().query().unwrap_or("")
    )
}
