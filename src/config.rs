//! Sync configuration loading.
//!
//! The CLI reads a `plugsync.yml` from the project root:
//!
//! ```yaml
//! dependencies:
//!   - name: tech.example.uploader
//!     manifest_url: https://raw.githubusercontent.com/example/uploader/main/package.json
//!     repo_url: https://github.com/example/uploader.git
//!   - name: tech.example.shadereditor
//!     manifest_url: https://raw.githubusercontent.com/example/shadereditor/main/package.json
//!     repo_url: https://github.com/example/shadereditor.git
//! manifest_path: Packages/manifest.json
//! cache_path: .plugsync/package-check.json
//! install_command: vpm add "{source}"
//! ```
//!
//! Library users construct [`TrackedDependency`] values directly and skip
//! this module entirely.

use crate::error::{PlugsyncError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A companion package whose remote version is checked against local
/// installation state.
///
/// Immutable for the lifetime of a checker; names must be unique within
/// the tracked set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedDependency {
    /// Package identifier as it appears in the host manifest.
    pub name: String,
    /// URL of the remote package manifest (JSON with a `version` field).
    pub manifest_url: String,
    /// Repository the package is installed from.
    pub repo_url: String,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("Packages/manifest.json")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(".plugsync/package-check.json")
}

/// Top-level configuration for the `plugsync` CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Packages to keep in sync.
    #[serde(default)]
    pub dependencies: Vec<TrackedDependency>,

    /// Host dependency manifest, relative to the project root.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// Check-cache file, relative to the project root.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Shell command template used to install packages. `{source}` is
    /// replaced with `<name>@<repoURL>#v<version>`. Required for `sync`,
    /// unused by read-only commands.
    #[serde(default)]
    pub install_command: Option<String>,
}

impl SyncConfig {
    /// Default config file name, looked up in the project root.
    pub const DEFAULT_FILE: &'static str = "plugsync.yml";

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PlugsyncError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let config: SyncConfig =
            serde_yaml::from_str(&content).map_err(|e| PlugsyncError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let mut seen = HashSet::new();
        for dep in &self.dependencies {
            if !seen.insert(dep.name.as_str()) {
                return Err(PlugsyncError::ConfigParseError {
                    path: path.to_path_buf(),
                    message: format!("duplicate dependency name '{}'", dep.name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("plugsync.yml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_full_config() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
dependencies:
  - name: tech.example.uploader
    manifest_url: https://example.com/uploader/package.json
    repo_url: https://github.com/example/uploader.git
manifest_path: Packages/manifest.json
cache_path: .plugsync/package-check.json
install_command: vpm add "{source}"
"#,
        );

        let config = SyncConfig::load(&path).unwrap();
        assert_eq!(config.dependencies.len(), 1);
        assert_eq!(config.dependencies[0].name, "tech.example.uploader");
        assert_eq!(config.install_command.as_deref(), Some(r#"vpm add "{source}""#));
    }

    #[test]
    fn defaults_apply_when_fields_omitted() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "dependencies: []\n");

        let config = SyncConfig::load(&path).unwrap();
        assert_eq!(config.manifest_path, PathBuf::from("Packages/manifest.json"));
        assert_eq!(
            config.cache_path,
            PathBuf::from(".plugsync/package-check.json")
        );
        assert!(config.install_command.is_none());
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let err = SyncConfig::load(&temp.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, PlugsyncError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "dependencies: [not: closed");

        let err = SyncConfig::load(&path).unwrap_err();
        assert!(matches!(err, PlugsyncError::ConfigParseError { .. }));
    }

    #[test]
    fn duplicate_dependency_names_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"
dependencies:
  - name: pkg
    manifest_url: https://example.com/a.json
    repo_url: https://example.com/a.git
  - name: pkg
    manifest_url: https://example.com/b.json
    repo_url: https://example.com/b.git
"#,
        );

        let err = SyncConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("duplicate dependency name"));
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let config = SyncConfig {
            dependencies: vec![TrackedDependency {
                name: "pkg".into(),
                manifest_url: "https://example.com/package.json".into(),
                repo_url: "https://example.com/repo.git".into(),
            }],
            manifest_path: default_manifest_path(),
            cache_path: default_cache_path(),
            install_command: None,
        };

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: SyncConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.dependencies, config.dependencies);
    }
}
