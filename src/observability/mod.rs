//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the asset pipeline produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - Request ID appears on every request log line
//! - Metrics go through the `metrics` facade; without an exporter they are no-ops

pub mod logging;
pub mod metrics;
