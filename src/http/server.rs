//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the index, static and catch-all handlers
//! - Wire up middleware (tracing, timeout, request ID, security headers)
//! - Bind server to listener
//! - Apply config reloads to the shell state

use std::path::PathBuf;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    handler::Handler,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{services::ServeDir, timeout::TimeoutLayer};

use crate::config::{Reload, ShellConfig};
use crate::http::request::{request_id, with_request_tracing};
use crate::http::response::{method_not_allowed, shell_response};
use crate::http::state::AppState;
use crate::observability::metrics;
use crate::security::headers::with_security_headers;

/// Route name for `GET /`.
pub const INDEX_ROUTE: &str = "index";
/// Route name for the catch-all.
pub const CATCH_ALL_ROUTE: &str = "not_found";

/// HTTP server for the shell.
pub struct HttpServer {
    router: Router,
    config: ShellConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ShellConfig) -> Self {
        let config = config.with_defaults_applied();
        let state = AppState::new(&config);
        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Files under the public dir are served as they are; any path without a
    /// file falls through to the catch-all.
    #[allow(deprecated)]
    fn build_router(config: &ShellConfig, state: AppState) -> Router {
        let public_dir = PathBuf::from(&config.assets.root).join(&config.assets.public_dir);

        let public_files = ServeDir::new(public_dir)
            .append_index_html_on_directories(false)
            .call_fallback_on_method_not_allowed(true)
            .fallback(catch_all_handler.with_state(state.clone()));

        let router = Router::new()
            .route("/", get(index_handler).fallback(reject_method))
            .fallback_service(public_files)
            .with_state(state);
        let router = with_security_headers(router, &config.security);

        with_request_tracing(
            router.layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server until the shutdown signal fires.
    ///
    /// Each [`Reload`] re-renders the shell: a new config replaces the shell and
    /// route table, a manifest change picks up the new asset versions.
    /// Listener and middleware settings need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut reloads: mpsc::UnboundedReceiver<Reload>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        let mut current = self.config.clone();
        tokio::spawn(async move {
            while let Some(reload) = reloads.recv().await {
                match reload {
                    Reload::Config(next) => {
                        let next = next.with_defaults_applied();
                        if next.listener.bind_address != current.listener.bind_address {
                            tracing::warn!(
                                bind_address = %next.listener.bind_address,
                                "Bind address change requires a restart"
                            );
                        }
                        current = next;
                    }
                    Reload::Assets => tracing::info!("Asset manifest changed"),
                }
                state.reload(&current);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for serving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}

/// `GET /`.
async fn index_handler(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    render_shell(&state, INDEX_ROUTE, &uri, &headers)
}

/// Any path no file or other route claimed. Hands routing over to the client.
async fn catch_all_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match method {
        Method::GET => render_shell(&state, CATCH_ALL_ROUTE, &uri, &headers),
        Method::HEAD => {
            let mut response = render_shell(&state, CATCH_ALL_ROUTE, &uri, &headers);
            *response.body_mut() = Body::empty();
            response
        }
        _ => reject(CATCH_ALL_ROUTE, &method, &uri, &headers),
    }
}

/// Methods other than GET and HEAD on `/`.
async fn reject_method(method: Method, uri: Uri, headers: HeaderMap) -> Response {
    reject(INDEX_ROUTE, &method, &uri, &headers)
}

fn reject(route: &'static str, method: &Method, uri: &Uri, headers: &HeaderMap) -> Response {
    let start = Instant::now();
    tracing::debug!(
        request_id = %request_id(headers),
        method = %method,
        path = %uri.path(),
        "Rejected non-GET request"
    );
    metrics::record_request(route, StatusCode::METHOD_NOT_ALLOWED.as_u16(), start);
    method_not_allowed()
}

fn render_shell(state: &AppState, route: &'static str, uri: &Uri, headers: &HeaderMap) -> Response {
    let start = Instant::now();
    let snapshot = state.load();
    let resolution = snapshot.routes.resolve(uri.path());

    tracing::debug!(
        request_id = %request_id(headers),
        route,
        path = %uri.path(),
        view = resolution.view,
        "Serving shell"
    );

    let response = shell_response(snapshot.html.clone(), resolution.view);
    metrics::record_request(route, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::X_CLIENT_VIEW;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = ShellConfig::default();
        config.assets.root = std::env::temp_dir().to_string_lossy().into_owned();
        config.assets.public_dir = "spa-shell-server-tests-missing".into();
        HttpServer::new(config)
    }

    async fn send(method: Method, uri: &str) -> Response {
        server()
            .into_router()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_shell() {
        let res = send(Method::GET, "/").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(X_CLIENT_VIEW).unwrap(), "Home");

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains(r#"<div id="app"></div>"#));
    }

    #[tokio::test]
    async fn test_catch_all_serves_same_shell() {
        let index = send(Method::GET, "/").await;
        let index = axum::body::to_bytes(index.into_body(), usize::MAX).await.unwrap();

        for path in ["/about", "/a-route-that-does-not-exist", "/deep/nested/path?x=1"] {
            let res = send(Method::GET, path).await;
            assert_eq!(res.status(), StatusCode::OK, "path {path}");
            let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
            assert_eq!(body, index, "path {path}");
        }
    }

    #[tokio::test]
    async fn test_client_view_header() {
        assert_eq!(
            send(Method::GET, "/about").await.headers().get(X_CLIENT_VIEW).unwrap(),
            "About"
        );
        assert_eq!(
            send(Method::GET, "/nope").await.headers().get(X_CLIENT_VIEW).unwrap(),
            "NotFound"
        );
    }

    #[tokio::test]
    async fn test_non_get_rejected_with_allow_header() {
        for path in ["/anything", "/"] {
            let res = send(Method::POST, path).await;
            assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "path {path}");
            assert_eq!(res.headers().get(header::ALLOW).unwrap(), "GET, HEAD", "path {path}");
        }
        let res = send(Method::DELETE, "/about").await;
        assert_eq!(res.headers().get(header::ALLOW).unwrap(), "GET, HEAD");
    }

    #[tokio::test]
    async fn test_head_gets_headers_without_body() {
        for (path, view) in [("/", "Home"), ("/a-route-that-does-not-exist", "NotFound")] {
            let res = send(Method::HEAD, path).await;
            assert_eq!(res.status(), StatusCode::OK, "path {path}");
            assert_eq!(res.headers().get(X_CLIENT_VIEW).unwrap(), view, "path {path}");
            assert_eq!(
                res.headers().get(header::CONTENT_TYPE).unwrap(),
                "text/html; charset=utf-8"
            );
            let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty(), "path {path}");
        }
    }

    #[tokio::test]
    async fn test_missing_asset_gets_shell() {
        let res = send(Method::GET, "/js/main.js").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(X_CLIENT_VIEW).unwrap(), "NotFound");
    }

    #[tokio::test]
    async fn test_public_dir_files_served() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir_all(public.join("img")).unwrap();
        std::fs::write(public.join("img/x.png"), b"\x89PNG fake").unwrap();
        std::fs::write(public.join("favicon.ico"), b"icon").unwrap();
        std::fs::write(public.join("mix-manifest.json"), b"{}").unwrap();

        let mut config = ShellConfig::default();
        config.assets.root = dir.path().to_string_lossy().into_owned();
        let router = HttpServer::new(config).into_router();
        let get = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

        let res = router.clone().oneshot(get("/img/x.png")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert!(res.headers().get(X_CLIENT_VIEW).is_none());
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"\x89PNG fake");

        for path in ["/favicon.ico", "/mix-manifest.json"] {
            let res = router.clone().oneshot(get(path)).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK, "path {path}");
            assert!(res.headers().get(X_CLIENT_VIEW).is_none(), "path {path}");
        }

        // No such file: the client router gets it.
        let res = router.clone().oneshot(get("/img/missing.png")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(X_CLIENT_VIEW).unwrap(), "NotFound");

        // A directory is not listed and has no index: shell.
        let res = router.oneshot(get("/img")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(X_CLIENT_VIEW).unwrap(), "NotFound");
    }
}
