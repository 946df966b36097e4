//! Hot reload of the config file and the asset manifest.
//!
//! The parent directories are watched, not the files: an editor's atomic save
//! or a rebuild replaces the file, and a watch on the old inode goes quiet.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ShellConfig;

/// Something the shell must be re-rendered for.
#[derive(Debug, Clone)]
pub enum Reload {
    /// The config file changed and still validates.
    Config(Box<ShellConfig>),
    /// `mix-manifest.json` changed: new asset versions.
    Assets,
}

/// Which watched file an event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Config,
    Manifest,
}

/// Watches the config file and the manifest for changes.
pub struct ConfigWatcher {
    config_path: Option<PathBuf>,
    manifest_path: Option<PathBuf>,
    update_tx: mpsc::UnboundedSender<Reload>,
}

impl ConfigWatcher {
    /// Create a watcher for either file, or both.
    ///
    /// Returns the watcher and a receiver for reloads.
    pub fn new(
        config_path: Option<&Path>,
        manifest_path: Option<&Path>,
    ) -> (Self, mpsc::UnboundedReceiver<Reload>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                config_path: config_path.map(Path::to_path_buf),
                manifest_path: manifest_path.map(Path::to_path_buf),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let config_path = self.config_path.as_deref().map(watch_target).transpose()?;
        let manifest_path = self.manifest_path.as_deref().map(watch_target).transpose()?;

        let tx = self.update_tx.clone();
        let targets = (config_path.clone(), manifest_path.clone());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let (config, manifest) = (targets.0.as_deref(), targets.1.as_deref());
                    for change in classify(&event.paths, config, manifest) {
                        match change {
                            Change::Config => {
                                let Some(path) = config else { continue };
                                tracing::info!("Config file change detected, reloading...");
                                match load_config(path) {
                                    Ok(new_config) => {
                                        let _ = tx.send(Reload::Config(Box::new(new_config)));
                                    }
                                    Err(e) => {
                                        tracing::error!(
                                            "Failed to reload config: {}. Keeping current configuration.",
                                            e
                                        );
                                    }
                                }
                            }
                            Change::Manifest => {
                                tracing::debug!("Asset manifest change detected");
                                let _ = tx.send(Reload::Assets);
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        let mut dirs: Vec<&Path> = [config_path.as_deref(), manifest_path.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(Path::parent)
            .collect();
        dirs.dedup();
        for dir in dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(config = ?config_path, manifest = ?manifest_path, "Config watcher started");
        Ok(watcher)
    }
}

/// The canonical path events for `path` will carry. The parent dir is created
/// when missing so a manifest that does not exist yet can still be watched.
fn watch_target(path: &Path) -> Result<PathBuf, notify::Error> {
    let name = path
        .file_name()
        .ok_or_else(|| notify::Error::generic(&format!("not a file path: {}", path.display())))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    Ok(fs::canonicalize(parent)?.join(name))
}

/// Watched files touched by an event, config first, each at most once.
fn classify(paths: &[PathBuf], config: Option<&Path>, manifest: Option<&Path>) -> Vec<Change> {
    let touched = |target: Option<&Path>| {
        target.is_some_and(|t| paths.iter().any(|p| p.as_path() == t))
    };

    let mut changes = Vec::new();
    if touched(config) {
        changes.push(Change::Config);
    }
    if touched(manifest) {
        changes.push(Change::Manifest);
    }
    changes
}
