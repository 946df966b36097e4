//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, trace span)
//!     → GET /              → index handler
//!       file in public dir → served as is
//!       anything else      → catch-all handler
//!     → response.rs (shell page, client view header)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod state;

pub use request::X_REQUEST_ID;
pub use response::X_CLIENT_VIEW;
pub use server::HttpServer;
pub use state::{AppState, ShellState};
