//! Rebuild-on-change for the asset pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use crate::assets::pipeline::Pipeline;
use crate::assets::AssetError;

/// Quiet period collapsing editor save bursts into one rebuild.
const DEBOUNCE: Duration = Duration::from_millis(150);

/// Build once, then rebuild whenever a source file changes, until shutdown.
///
/// Build failures are logged and the watcher keeps running.
pub async fn watch(
    pipeline: Pipeline,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), AssetError> {
    log_build(&pipeline);

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();
    // Events carry canonical paths; compare against the canonical public dir.
    let public_dir = pipeline.public_dir();
    std::fs::create_dir_all(&public_dir).map_err(|e| AssetError::io(&public_dir, e))?;
    let public_dir =
        std::fs::canonicalize(&public_dir).map_err(|e| AssetError::io(&public_dir, e))?;

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                    let _ = tx.send(event.paths);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        },
        notify::Config::default(),
    )?;

    for dir in pipeline.source_dirs() {
        watcher.watch(&dir, RecursiveMode::Recursive)?;
        tracing::info!(path = %dir.display(), "Watching for changes");
    }

    loop {
        tokio::select! {
            changed = rx.recv() => {
                let Some(paths) = changed else { break };
                if !is_source_change(&paths, &public_dir) {
                    continue;
                }
                tokio::time::sleep(DEBOUNCE).await;
                while rx.try_recv().is_ok() {}

                tracing::debug!(paths = ?paths, "Source change detected");
                log_build(&pipeline);
            }
            _ = shutdown.recv() => {
                tracing::info!("Asset watcher stopping");
                break;
            }
        }
    }

    Ok(())
}

fn log_build(pipeline: &Pipeline) {
    if let Err(e) = pipeline.run() {
        tracing::error!(error = %e, "Asset build failed");
    }
}

/// Output files live under the public dir; writing them must not retrigger.
fn is_source_change(paths: &[PathBuf], public_dir: &Path) -> bool {
    paths.iter().any(|p| !p.starts_with(public_dir))
}
