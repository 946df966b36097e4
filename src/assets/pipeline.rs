//! Build orchestration: bundle, compile, write, version.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::assets::alias::AliasMap;
use crate::assets::manifest::AssetManifest;
use crate::assets::script::ScriptBundler;
use crate::assets::stylesheet::StylesheetCompiler;
use crate::assets::AssetError;
use crate::config::AssetsConfig;

/// What a build produced.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub script: PathBuf,
    pub stylesheet: PathBuf,
    pub manifest: Option<PathBuf>,
    pub modules: usize,
    pub externals: Vec<String>,
    pub stylesheet_sources: usize,
    /// `<style>` blocks taken from single-file components.
    pub component_styles: usize,
}

/// The asset pipeline for one project.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AssetsConfig,
    root: PathBuf,
    aliases: AliasMap,
}

impl Pipeline {
    pub fn new(config: AssetsConfig) -> Self {
        let root = PathBuf::from(&config.root);
        let aliases = AliasMap::new(&root, &config.aliases);
        Self {
            config,
            root,
            aliases,
        }
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.config.public_dir)
    }

    /// Directories whose changes should trigger a rebuild.
    ///
    /// Paths are canonical, since notify reports events under the canonical
    /// form. A directory inside another listed one is dropped.
    pub fn source_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = [&self.config.script_entry, &self.config.stylesheet_entry]
            .iter()
            .filter_map(|entry| self.root.join(entry).parent().map(Path::to_path_buf))
            .chain(self.aliases.directories().map(Path::to_path_buf))
            .filter_map(|dir| fs::canonicalize(dir).ok())
            .filter(|dir| dir.is_dir())
            .collect();
        dirs.sort();
        dirs.dedup();

        let mut outermost: Vec<PathBuf> = Vec::with_capacity(dirs.len());
        for dir in dirs {
            // Sorted, so a parent always comes before its children.
            if !outermost.iter().any(|parent| dir.starts_with(parent)) {
                outermost.push(dir);
            }
        }
        outermost
    }

    /// Run a full build.
    pub fn run(&self) -> Result<BuildReport, AssetError> {
        let started = Instant::now();
        let public_dir = self.public_dir();

        let bundle = ScriptBundler::new(&self.root, &self.aliases)
            .bundle(&self.root.join(&self.config.script_entry))?;
        let mut sheet = StylesheetCompiler::new(&self.aliases)
            .compile(&self.root.join(&self.config.stylesheet_entry))?;
        for style in &bundle.styles {
            if !sheet.css.is_empty() && !sheet.css.ends_with('\n') {
                sheet.css.push('\n');
            }
            sheet.css.push_str(&format!("/* component: {} */\n{}\n", style.module, style.css));
        }

        let script_rel = output_path(&self.config.script_output, &self.config.script_entry, "js");
        let style_rel = output_path(
            &self.config.stylesheet_output,
            &self.config.stylesheet_entry,
            "css",
        );

        let script = write_output(&public_dir, &script_rel, bundle.code.as_bytes())?;
        let stylesheet = write_output(&public_dir, &style_rel, sheet.css.as_bytes())?;

        let manifest = if self.config.manifest {
            let mut manifest = AssetManifest::new();
            manifest.insert(&public_url(&script_rel), bundle.code.as_bytes());
            manifest.insert(&public_url(&style_rel), sheet.css.as_bytes());
            Some(manifest.write(&public_dir)?)
        } else {
            None
        };

        tracing::info!(
            script = %script.display(),
            stylesheet = %stylesheet.display(),
            modules = bundle.modules.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Assets built"
        );

        Ok(BuildReport {
            script,
            stylesheet,
            manifest,
            modules: bundle.modules.len(),
            externals: bundle.externals,
            stylesheet_sources: sheet.sources.len(),
            component_styles: bundle.styles.len(),
        })
    }
}

/// `<out_dir>/<entry stem>.<ext>`, relative to the public dir.
fn output_path(out_dir: &str, entry: &str, ext: &str) -> String {
    let stem = Path::new(entry)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string());
    let out_dir = out_dir.trim_matches('/');
    if out_dir.is_empty() {
        format!("{stem}.{ext}")
    } else {
        format!("{out_dir}/{stem}.{ext}")
    }
}

fn public_url(rel: &str) -> String {
    format!("/{rel}")
}

fn write_output(public_dir: &Path, rel: &str, content: &[u8]) -> Result<PathBuf, AssetError> {
    let path = public_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
    }
    fs::write(&path, content).map_err(|e| AssetError::io(&path, e))?;
    Ok(path)
}
