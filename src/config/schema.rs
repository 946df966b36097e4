//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shell server
//! and the asset pipeline. All types derive Serde traits for deserialization from
//! config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShellConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Shell page settings.
    pub shell: ShellPageConfig,

    /// Client route table. Empty means the standard table.
    pub routes: Vec<RouteConfig>,

    /// Asset pipeline settings.
    pub assets: AssetsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Security hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ShellConfig {
    /// Fill in values that depend on other fields.
    pub fn with_defaults_applied(mut self) -> Self {
        if self.routes.is_empty() {
            self.routes = RouteConfig::standard_table();
        }
        self
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3333").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3333".to_string(),
        }
    }
}

/// Shell page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShellPageConfig {
    /// Document title.
    pub title: String,

    /// Id of the element the client application mounts into.
    pub mount_id: String,

    /// Public URL of the script bundle.
    pub script_url: String,

    /// Public URL of the compiled stylesheet.
    pub stylesheet_url: String,

    /// Read `mix-manifest.json` from the public dir to version asset URLs.
    pub use_manifest: bool,
}

impl Default for ShellPageConfig {
    fn default() -> Self {
        Self {
            title: "App".to_string(),
            mount_id: "app".to_string(),
            script_url: "/js/main.js".to_string(),
            stylesheet_url: "/css/app.css".to_string(),
            use_manifest: true,
        }
    }
}

/// A client route: path pattern, route name and the view mounted for it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Literal path (e.g. "/about") or "*" for the fallback.
    pub path: String,

    /// Route name.
    pub name: String,

    /// View component identifier.
    pub view: String,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>, name: impl Into<String>, view: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view: view.into(),
        }
    }

    /// Home, About and the NotFound fallback.
    pub fn standard_table() -> Vec<RouteConfig> {
        vec![
            RouteConfig::new("/", "Home", "Home"),
            RouteConfig::new("/about", "About", "About"),
            // Must stay last: it catches everything.
            RouteConfig::new("*", "NotFound", "NotFound"),
        ]
    }
}

/// Asset pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Project root every other path is relative to.
    pub root: String,

    /// Output directory served as the public dir.
    pub public_dir: String,

    /// Script entry point.
    pub script_entry: String,

    /// Stylesheet entry point.
    pub stylesheet_entry: String,

    /// Subdirectory of `public_dir` for bundles.
    pub script_output: String,

    /// Subdirectory of `public_dir` for stylesheets.
    pub stylesheet_output: String,

    /// Import alias prefix -> directory.
    pub aliases: BTreeMap<String, String>,

    /// Write `mix-manifest.json` next to the outputs.
    pub manifest: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("@".to_string(), "resources/app".to_string());
        aliases.insert("~".to_string(), "resources/app".to_string());
        aliases.insert("@sass".to_string(), "resources/assets/sass".to_string());

        Self {
            root: ".".to_string(),
            public_dir: "public".to_string(),
            script_entry: "resources/app/main.js".to_string(),
            stylesheet_entry: "resources/assets/scss/app.scss".to_string(),
            script_output: "js".to_string(),
            stylesheet_output: "css".to_string(),
            aliases,
            manifest: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add security response headers.
    pub enable_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
