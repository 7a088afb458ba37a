//! Persisted dependency-check cache.
//!
//! After a run verifies the tracked packages, the (name → version) pairs
//! are written to a small JSON document. The next run compares the cached
//! versions against the freshly fetched remote versions and skips all
//! installation work when they match.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// On-disk shape of the check cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheRecord {
    /// Last-verified version per tracked dependency name.
    versions: BTreeMap<String, String>,
    /// When the record was written.
    checked_at: DateTime<Utc>,
}

/// Stores and queries the last-verified version set.
pub struct CheckCache {
    path: PathBuf,
}

impl CheckCache {
    /// Create a cache backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff a readable cache record exists and every name in `current`
    /// is cached at exactly the same version.
    ///
    /// A missing or corrupt cache file is never an error; it simply means
    /// the check is not fresh.
    pub fn has_fresh_check(&self, current: &BTreeMap<String, String>) -> bool {
        let Some(record) = self.load() else {
            return false;
        };

        current
            .iter()
            .all(|(name, version)| record.versions.get(name) == Some(version))
    }

    /// Write the verified version set, replacing any previous record and
    /// creating parent directories as needed.
    pub fn save(&self, current: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let record = CacheRecord {
            versions: current.clone(),
            checked_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| anyhow::anyhow!("failed to serialize check cache: {}", e))?;
        fs::write(&self.path, json)?;

        tracing::debug!(
            "Wrote check cache with {} entries to {}",
            current.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Read the cached record, currently held versions only.
    pub fn cached_versions(&self) -> Option<BTreeMap<String, String>> {
        self.load().map(|r| r.versions)
    }

    /// Delete the cache file if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn load(&self) -> Option<CacheRecord> {
        let content = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn versions(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_cache_is_not_fresh() {
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("check.json"));

        assert!(!cache.has_fresh_check(&versions(&[("a", "1.0.0")])));
    }

    #[test]
    fn corrupt_cache_is_not_fresh_and_not_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("check.json");
        fs::write(&path, "{ definitely not json").unwrap();

        let cache = CheckCache::new(path);
        assert!(!cache.has_fresh_check(&versions(&[("a", "1.0.0")])));
    }

    #[test]
    fn save_then_matching_check_is_fresh() {
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("check.json"));
        let current = versions(&[("a", "1.0.0"), ("b", "2.0.0")]);

        cache.save(&current).unwrap();

        assert!(cache.has_fresh_check(&current));
    }

    #[test]
    fn version_bump_invalidates_freshness() {
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("check.json"));

        cache.save(&versions(&[("a", "1.0.0")])).unwrap();

        assert!(!cache.has_fresh_check(&versions(&[("a", "1.1.0")])));
    }

    #[test]
    fn missing_tracked_name_invalidates_freshness() {
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("check.json"));

        cache.save(&versions(&[("a", "1.0.0")])).unwrap();

        assert!(!cache.has_fresh_check(&versions(&[("a", "1.0.0"), ("b", "2.0.0")])));
    }

    #[test]
    fn extra_cached_names_are_ignored() {
        // Stale keys from a previously tracked dependency don't hurt
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("check.json"));

        cache
            .save(&versions(&[("a", "1.0.0"), ("old", "0.1.0")]))
            .unwrap();

        assert!(cache.has_fresh_check(&versions(&[("a", "1.0.0")])));
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("nested").join("dir").join("check.json"));

        cache.save(&versions(&[("a", "1.0.0")])).unwrap();

        assert!(cache.path().exists());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("check.json"));

        cache.save(&versions(&[("a", "1.0.0")])).unwrap();
        cache.save(&versions(&[("a", "2.0.0")])).unwrap();

        assert_eq!(
            cache.cached_versions().unwrap(),
            versions(&[("a", "2.0.0")])
        );
    }

    #[test]
    fn clear_removes_file_and_tolerates_absence() {
        let temp = TempDir::new().unwrap();
        let cache = CheckCache::new(temp.path().join("check.json"));

        cache.save(&versions(&[("a", "1.0.0")])).unwrap();
        cache.clear().unwrap();
        assert!(!cache.path().exists());

        // Second clear is a no-op
        cache.clear().unwrap();
    }
}
