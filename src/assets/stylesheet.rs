//! Stylesheet compilation: `@import` inlining with alias resolution.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::assets::alias::AliasMap;
use crate::assets::script::{canonical, with_suffix};
use crate::assets::AssetError;

fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*@import\s+['"]([^'"]+)['"][ \t]*;?[ \t\r]*$"#)
            .expect("import pattern is valid")
    })
}

/// A compiled stylesheet.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub css: String,
    /// Every file inlined, entry first.
    pub sources: Vec<PathBuf>,
}

/// Inlines local `@import`s starting from one entry file.
pub struct StylesheetCompiler<'a> {
    aliases: &'a AliasMap,
}

impl<'a> StylesheetCompiler<'a> {
    pub fn new(aliases: &'a AliasMap) -> Self {
        Self { aliases }
    }

    pub fn compile(&self, entry: &Path) -> Result<Stylesheet, AssetError> {
        let entry = canonical(entry)?;
        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        let css = self.inline(&entry, &mut seen, &mut sources)?;
        Ok(Stylesheet { css, sources })
    }

    fn inline(
        &self,
        path: &Path,
        seen: &mut HashSet<PathBuf>,
        sources: &mut Vec<PathBuf>,
    ) -> Result<String, AssetError> {
        seen.insert(path.to_path_buf());
        sources.push(path.to_path_buf());

        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;

        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        for caps in import_pattern().captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            output.push_str(&text[last..whole.start()]);
            last = whole.end();

            match self.resolve(&caps, path)? {
                Some(dep) if seen.contains(&dep) => {}
                Some(dep) => {
                    let inlined = self.inline(&dep, seen, sources)?;
                    output.push_str(inlined.trim_end_matches('\n'));
                }
                None => output.push_str(whole.as_str()),
            }
        }
        output.push_str(&text[last..]);

        Ok(output)
    }

    /// `Ok(None)` for remote or plain-CSS imports, which are kept verbatim.
    fn resolve(&self, caps: &Captures<'_>, from: &Path) -> Result<Option<PathBuf>, AssetError> {
        let specifier = &caps[1];
        if specifier.contains("://") || specifier.starts_with("//") {
            return Ok(None);
        }

        let base = match self.aliases.resolve(specifier) {
            Some(path) => path,
            None => from.parent().unwrap_or(Path::new(".")).join(specifier),
        };

        let partial = match (base.parent(), base.file_name()) {
            (Some(parent), Some(name)) => {
                Some(parent.join(format!("_{}", name.to_string_lossy())))
            }
            _ => None,
        };

        let mut candidates = vec![base.clone(), with_suffix(&base, ".scss")];
        if let Some(partial) = partial {
            candidates.push(with_suffix(&partial, ".scss"));
            candidates.push(partial);
        }
        candidates.push(with_suffix(&base, ".css"));

        match candidates.iter().find(|c| c.is_file()) {
            Some(found) => canonical(found).map(Some),
            None => Err(AssetError::Unresolved {
                specifier: specifier.to_string(),
                from: from.to_path_buf(),
            }),
        }
    }
}
