//! Shared handler state.

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Bytes;

use crate::assets::AssetManifest;
use crate::config::ShellConfig;
use crate::routing::RouteTable;
use crate::shell::ShellPage;

/// Route table plus the shell rendered from it. Swapped as a unit on reload.
#[derive(Debug)]
pub struct ShellState {
    pub routes: RouteTable,
    pub html: Bytes,
}

impl ShellState {
    pub fn from_config(config: &ShellConfig) -> Self {
        let routes = RouteTable::from_config(&config.routes);
        let manifest = if config.shell.use_manifest {
            load_manifest(config)
        } else {
            None
        };

        let page = ShellPage::from_config(&config.shell, &routes, manifest.as_ref());
        Self {
            routes,
            html: Bytes::from(page.render()),
        }
    }
}

fn load_manifest(config: &ShellConfig) -> Option<AssetManifest> {
    let public_dir = PathBuf::from(&config.assets.root).join(&config.assets.public_dir);
    match AssetManifest::load(&public_dir) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable asset manifest");
            None
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<ArcSwap<ShellState>>,
}

impl AppState {
    pub fn new(config: &ShellConfig) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(ShellState::from_config(config))),
        }
    }

    /// Current snapshot. Stays consistent for the caller even across a reload.
    pub fn load(&self) -> Arc<ShellState> {
        self.inner.load_full()
    }

    /// Rebuild routes and shell from a new config and publish them atomically.
    pub fn reload(&self, config: &ShellConfig) {
        let next = ShellState::from_config(config);
        tracing::info!(routes = next.routes.len(), "Shell state reloaded");
        self.inner.store(Arc::new(next));
    }
}
