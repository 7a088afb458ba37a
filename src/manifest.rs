//! Local dependency manifest inspection.
//!
//! The host keeps its installed dependencies in a JSON manifest with a
//! `dependencies` object mapping package identifiers to version-spec
//! strings (e.g. `"tech.example.uploader": "https://repo.git#v1.2.0@1.2.0"`).
//! The manifest is re-read on every query so a check always sees the
//! host's current state.

use crate::error::{PlugsyncError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the host's local dependency manifest.
pub struct ManifestReader {
    path: PathBuf,
}

impl ManifestReader {
    /// Create a reader for the manifest at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether `package_name` is recorded at `version`.
    ///
    /// A package counts as installed at a version when its version-spec
    /// string contains `@<version>`. Returns `false` for an absent key.
    /// Fails with [`PlugsyncError::ManifestMissing`] when the manifest file
    /// does not exist; callers treat that as "nothing is installed".
    pub fn is_installed_at(&self, package_name: &str, version: &str) -> Result<bool> {
        if !self.path.exists() {
            return Err(PlugsyncError::ManifestMissing {
                path: self.path.clone(),
            });
        }

        let content = fs::read_to_string(&self.path)?;
        let manifest: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| PlugsyncError::Parse {
                what: format!("local manifest at {}", self.path.display()),
                message: e.to_string(),
            })?;

        let Some(spec) = manifest["dependencies"][package_name].as_str() else {
            return Ok(false);
        };

        Ok(spec.contains(&format!("@{}", version)))
    }
}
