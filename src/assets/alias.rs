//! Import path aliases.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Maps import prefixes such as `@` or `@sass` to source directories.
///
/// The longest prefix wins, and a prefix only matches a whole path segment:
/// `@/views/Home.vue` uses `@`, `@sass/vars` uses `@sass`, `@scope/pkg` uses neither.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    // Sorted longest first.
    entries: Vec<(String, PathBuf)>,
}

impl AliasMap {
    /// Build from config, resolving directories against `root`.
    pub fn new(root: &Path, aliases: &BTreeMap<String, String>) -> Self {
        let mut entries: Vec<(String, PathBuf)> = aliases
            .iter()
            .map(|(prefix, dir)| (prefix.trim_end_matches('/').to_string(), root.join(dir)))
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    /// Resolve an aliased specifier to a path, if any alias applies.
    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        self.entries.iter().find_map(|(prefix, dir)| {
            let rest = specifier.strip_prefix(prefix.as_str())?;
            if rest.is_empty() {
                Some(dir.clone())
            } else {
                rest.strip_prefix('/').map(|rest| dir.join(rest))
            }
        })
    }

    /// Source directories the aliases point at.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(|(_, dir)| dir.as_path())
    }
}
