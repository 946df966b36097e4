//! Request identification.
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is kept, otherwise a UUID v4 is generated
//! - The ID is echoed on the response
//! - The trace span is opened inside the ID layers, so it can record the ID

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Wrap a router so every request carries an ID and every response echoes it.
pub fn with_request_id(router: Router) -> Router {
    // Set runs before Propagate on the way in.
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// [`with_request_id`] around an HTTP trace layer whose spans carry the ID.
pub fn with_request_tracing(router: Router) -> Router {
    with_request_id(router.layer(TraceLayer::new_for_http().make_span_with(request_span)))
}

/// Span for one request.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}

/// The request ID for logging, or "unknown".
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
