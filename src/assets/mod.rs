//! Asset build pipeline.
//!
//! # Data Flow
//! ```text
//! AssetsConfig
//!     → alias.rs (import prefix → source directory)
//!     → script.rs (follow imports from the script entry, emit one bundle)
//!         sfc.rs (split .vue files into template, script and styles)
//!         module.rs (rewrite import/export into registry calls)
//!     → stylesheet.rs (inline @import from the stylesheet entry)
//!     → manifest.rs (content hash per output, mix-manifest.json)
//!     → pipeline.rs (write everything under the public dir)
//!
//! Watch mode (watch.rs):
//!     source change → rebuild → log report
//! ```
//!
//! # Design Decisions
//! - No transpiling beyond module syntax: each module runs in its own registry
//!   function, dependencies first
//! - Bare specifiers (`vue`, `axios`) are external, read from `globalThis.__spaExternals`
//! - Component `<style>` blocks are appended to the stylesheet output
//! - `url(...)` in stylesheets is never rewritten

pub mod alias;
pub mod manifest;
pub mod module;
pub mod pipeline;
pub mod script;
pub mod sfc;
pub mod stylesheet;
pub mod watch;

use std::path::PathBuf;

pub use alias::AliasMap;
pub use manifest::AssetManifest;
pub use pipeline::{BuildReport, Pipeline};

/// Errors raised while building assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot resolve `{specifier}` imported from {from}")]
    Unresolved { specifier: String, from: PathBuf },

    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }
}
