//! Client routing subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (evaluate path pattern)
//!     → Return: Resolution { name, view }
//!
//! Route Compilation (at startup or reload):
//!     RouteConfig[]
//!     → Compile matchers (exact / wildcard)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! The server never changes its answer based on the resolution; it only reports
//! it. The same table is embedded in the shell for the browser router.

pub mod matcher;
pub mod router;

pub use matcher::Matcher;
pub use router::{Resolution, Route, RouteTable, WILDCARD};
