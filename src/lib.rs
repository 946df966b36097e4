//! Single-page application shell server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──┬── GET /            → index     ─┐
//!                     (id, trace,    ├── public dir file  → ServeDir   │
//!                      timeout,      └── anything else    → catch-all ─┤
//!                      headers)                                         ▼
//!                                                            shell::ShellPage
//!                                                         (+ routing::RouteTable JSON)
//!
//!     spa-shell build
//!     ──────────────▶ assets::Pipeline → public/js, public/css, mix-manifest.json
//! ```
//!
//! Both server handlers answer with the same shell; the client router chooses
//! Home, About or NotFound from the embedded route table.

pub mod assets;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod shell;

pub use config::schema::ShellConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
