//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, apply defaults)
//!     → validation.rs (semantic checks)
//!     → ShellConfig (validated, immutable)
//!
//! On file change (config file or public/mix-manifest.json):
//!     watcher.rs detects change in the parent dir
//!     → loader.rs loads new config (config file only)
//!     → validation.rs validates
//!     → Reload sent to the server, which swaps its shell state atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AssetsConfig, ListenerConfig, ObservabilityConfig, RouteConfig, SecurityConfig, ShellConfig,
    ShellPageConfig, TimeoutConfig,
};
pub use validation::ValidationError;
pub use watcher::{ConfigWatcher, Reload};
