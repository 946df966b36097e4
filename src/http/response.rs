//! Shell responses.
//!
//! # Design Decisions
//! - The shell is always 200: the client router decides what "not found" looks like
//! - `no-cache` so a redeploy with new asset versions is picked up
//! - `x-client-view` names the view the client router will mount

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

pub const X_CLIENT_VIEW: &str = "x-client-view";

/// Build the 200 response carrying the shell markup.
pub fn shell_response(html: Bytes, view: &str) -> Response {
    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from(html),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(view) {
        response.headers_mut().insert(X_CLIENT_VIEW, value);
    }
    response
}

/// 405 for non-GET requests reaching the catch-all.
pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, HEAD")],
        "Method Not Allowed",
    )
        .into_response()
}
