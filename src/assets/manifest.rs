//! Versioned asset manifest (`mix-manifest.json`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::assets::AssetError;

pub const MANIFEST_FILE: &str = "mix-manifest.json";

/// Length of the hex version id appended to asset URLs.
const VERSION_LEN: usize = 20;

/// Maps public asset paths to cache-busted URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, String>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an asset, versioning it by its content.
    pub fn insert(&mut self, public_path: &str, content: &[u8]) -> &str {
        let url = format!("{public_path}?id={}", version_id(content));
        self.entries.insert(public_path.to_string(), url);
        &self.entries[public_path]
    }

    /// Versioned URL for `public_path`, or the path itself if unknown.
    pub fn versioned<'a>(&'a self, public_path: &'a str) -> &'a str {
        self.entries
            .get(public_path)
            .map(String::as_str)
            .unwrap_or(public_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path_in(public_dir: &Path) -> PathBuf {
        public_dir.join(MANIFEST_FILE)
    }

    /// Load the manifest from a public dir. `Ok(None)` when there is none.
    pub fn load(public_dir: &Path) -> Result<Option<Self>, AssetError> {
        let path = Self::path_in(public_dir);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AssetError::io(path, e)),
        }
    }

    pub fn write(&self, public_dir: &Path) -> Result<PathBuf, AssetError> {
        let path = Self::path_in(public_dir);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| AssetError::io(&path, e))?;
        Ok(path)
    }
}

fn version_id(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    let mut hex = format!("{digest:x}");
    hex.truncate(VERSION_LEN);
    hex
}
