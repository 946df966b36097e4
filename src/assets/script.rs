//! Script bundling.
//!
//! Follows `import`, `export … from` and `require` specifiers from the entry point
//! and emits every reachable local module once, dependencies before dependents.
//! The output is a single script: each module is an entry in a registry object
//! and a small runtime resolves `__require` calls against it.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::assets::alias::AliasMap;
use crate::assets::module::to_registry_body;
use crate::assets::sfc::SingleFileComponent;
use crate::assets::AssetError;

/// Bare specifiers are looked up in `globalThis.__spaExternals`.
const RUNTIME_HEAD: &str = r#"(function (modules, entry) {
  var root = typeof globalThis !== "undefined" ? globalThis : window;
  var externals = root.__spaExternals || {};
  var cache = {};
  var has = Object.prototype.hasOwnProperty;
  function __default(m) {
    return m && m.__esModule ? m["default"] : m;
  }
  function __require(id) {
    if (has.call(cache, id)) return cache[id].exports;
    if (!has.call(modules, id)) {
      if (has.call(externals, id)) return externals[id];
      throw new Error("Cannot find module '" + id + "'");
    }
    var module = (cache[id] = { exports: {} });
    modules[id].call(module.exports, module, module.exports, __require, __default);
    return module.exports;
  }
  __require(entry);
})({
"#;

fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?m)^\s*import\s+(?:[^'";]*?\s*from\s*)?['"]([^'"]+)['"]|^\s*export\s+(?:\*|\{[^}]*\})\s*from\s*['"]([^'"]+)['"]|\brequire\(\s*['"]([^'"]+)['"]\s*\)"#,
        )
        .expect("import pattern is valid")
    })
}

/// Extract import specifiers in source order.
pub fn scan_imports(source: &str) -> Vec<String> {
    import_pattern()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `<style>` blocks lifted out of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStyle {
    pub module: String,
    pub css: String,
}

/// A bundled script.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub code: String,
    /// Local modules, in emit order.
    pub modules: Vec<PathBuf>,
    /// Bare specifiers left for the runtime.
    pub externals: Vec<String>,
    /// Component styles, in emit order.
    pub styles: Vec<ComponentStyle>,
}

/// Builds a script bundle from one entry point.
pub struct ScriptBundler<'a> {
    root: &'a Path,
    aliases: &'a AliasMap,
}

impl<'a> ScriptBundler<'a> {
    pub fn new(root: &'a Path, aliases: &'a AliasMap) -> Self {
        Self { root, aliases }
    }

    pub fn bundle(&self, entry: &Path) -> Result<Bundle, AssetError> {
        let entry = canonical(entry)?;
        let mut state = BundleState {
            root: fs::canonicalize(self.root).unwrap_or_else(|_| self.root.to_path_buf()),
            ..BundleState::default()
        };
        self.visit(&entry, &mut state)?;

        let mut code = String::from(RUNTIME_HEAD);
        for module in &state.modules {
            code.push_str(&format!(
                "{}: function (module, exports, __require, __default) {{\n",
                json_string(&module.id)
            ));
            code.push_str(&module.body);
            code.push_str("},\n");
        }
        code.push_str(&format!("}}, {});\n", json_string(&state.module_id(&entry))));

        Ok(Bundle {
            code,
            modules: state.modules.into_iter().map(|m| m.path).collect(),
            externals: state.externals,
            styles: state.styles,
        })
    }

    fn visit(&self, path: &Path, state: &mut BundleState) -> Result<(), AssetError> {
        if !state.seen.insert(path.to_path_buf()) {
            // Done already, or on the current stack (cycle).
            return Ok(());
        }

        let id = state.module_id(path);
        let raw = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        let source = if path.extension().is_some_and(|ext| ext == "vue") {
            let component = SingleFileComponent::parse(&raw);
            for css in &component.styles {
                state.styles.push(ComponentStyle {
                    module: id.clone(),
                    css: css.clone(),
                });
            }
            component.to_module()
        } else {
            raw
        };

        let mut ids = HashMap::new();
        for specifier in scan_imports(&source) {
            match self.resolve(&specifier, path)? {
                Some(dep) => {
                    self.visit(&dep, state)?;
                    ids.insert(specifier, state.module_id(&dep));
                }
                None => {
                    if !state.externals.contains(&specifier) {
                        state.externals.push(specifier.clone());
                    }
                    ids.insert(specifier.clone(), specifier);
                }
            }
        }

        tracing::trace!(module = %id, "Bundled module");
        state.modules.push(BundledModule {
            path: path.to_path_buf(),
            body: to_registry_body(&source, &ids),
            id,
        });
        Ok(())
    }

    /// `Ok(None)` for bare specifiers, which stay external.
    fn resolve(&self, specifier: &str, from: &Path) -> Result<Option<PathBuf>, AssetError> {
        let base = if specifier.starts_with("./") || specifier.starts_with("../") {
            from.parent().unwrap_or(self.root).join(specifier)
        } else if let Some(path) = self.aliases.resolve(specifier) {
            path
        } else if specifier.starts_with('/') {
            PathBuf::from(specifier)
        } else {
            return Ok(None);
        };

        let candidates = [
            base.clone(),
            with_suffix(&base, ".js"),
            with_suffix(&base, ".vue"),
            base.join("index.js"),
        ];
        match candidates.iter().find(|c| c.is_file()) {
            Some(found) => canonical(found).map(Some),
            None => Err(AssetError::Unresolved {
                specifier: specifier.to_string(),
                from: from.to_path_buf(),
            }),
        }
    }
}

struct BundledModule {
    path: PathBuf,
    id: String,
    body: String,
}

#[derive(Default)]
struct BundleState {
    root: PathBuf,
    seen: HashSet<PathBuf>,
    modules: Vec<BundledModule>,
    externals: Vec<String>,
    styles: Vec<ComponentStyle>,
}

impl BundleState {
    /// Registry id: the path relative to the project root, `/`-separated.
    fn module_id(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

pub(crate) fn canonical(path: &Path) -> Result<PathBuf, AssetError> {
    fs::canonicalize(path).map_err(|e| AssetError::io(path, e))
}

pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}
