//! Feature cache: matched labels per image path.
//!
//! The cache is owned by a [`FeatureTagger`](super::FeatureTagger) rather than
//! living in a global, and is guarded by an `RwLock` so concurrent requests
//! can share one tagger. Whether an entry is still usable is decided by a
//! pluggable [`InvalidationPolicy`]; the default never invalidates, so a file
//! rewritten in place keeps its old labels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use crate::config::InvalidationMode;
use crate::types::Label;

/// A cached tagging result.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedFeatures {
    pub labels: Vec<Label>,
    /// File modification time when the entry was stored, if the platform reports it
    pub modified: Option<SystemTime>,
}

/// Decides whether a cached entry may be served.
pub trait InvalidationPolicy: Send + Sync {
    /// Return `true` to drop the entry and re-tag the image.
    fn is_stale(&self, path: &Path, entry: &CachedFeatures) -> bool;
}

/// Entries live for the whole process.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInvalidate;

impl InvalidationPolicy for NeverInvalidate {
    fn is_stale(&self, _path: &Path, _entry: &CachedFeatures) -> bool {
        false
    }
}

/// Entries go stale when the file's modification time changes or the file disappears.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifiedTime;

impl InvalidationPolicy for ModifiedTime {
    fn is_stale(&self, path: &Path, entry: &CachedFeatures) -> bool {
        let current = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        match (current, entry.modified) {
            (Some(now), Some(then)) => now != then,
            (None, _) => true,
            (Some(_), None) => false,
        }
    }
}

/// Path-keyed cache of matched labels.
pub struct FeatureCache {
    entries: RwLock<HashMap<PathBuf, CachedFeatures>>,
    policy: Box<dyn InvalidationPolicy>,
}

impl FeatureCache {
    /// Create an empty cache with the given invalidation policy.
    pub fn new(policy: Box<dyn InvalidationPolicy>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Create an empty cache for a configured invalidation mode.
    pub fn from_mode(mode: InvalidationMode) -> Self {
        match mode {
            InvalidationMode::Never => Self::new(Box::new(NeverInvalidate)),
            InvalidationMode::Modified => Self::new(Box::new(ModifiedTime)),
        }
    }

    /// Look up the labels for `path`, dropping the entry if the policy says it is stale.
    pub fn get(&self, path: &Path) -> Option<Vec<Label>> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            let entry = entries.get(path)?;
            if !self.policy.is_stale(path, entry) {
                return Some(entry.labels.clone());
            }
        }

        tracing::debug!("Cached features for {:?} are stale", path);
        self.invalidate(path);
        None
    }

    /// Store the labels for `path`, recording its current modification time.
    pub fn insert(&self, path: &Path, labels: Vec<Label>) {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(path.to_path_buf(), CachedFeatures { labels, modified });
    }

    /// Remove one entry. Returns whether it was present.
    pub fn invalidate(&self, path: &Path) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(path).is_some()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FeatureCache {
    fn default() -> Self {
        Self::new(Box::new(NeverInvalidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn labels(v: &[&str]) -> Vec<Label> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_insert_and_get() {
        let cache = FeatureCache::default();
        let path = Path::new("/nonexistent/a.jpg");
        assert!(cache.get(path).is_none());

        cache.insert(path, labels(&["dress"]));
        assert_eq!(cache.get(path), Some(labels(&["dress"])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_never_invalidate_keeps_missing_files() {
        let cache = FeatureCache::from_mode(InvalidationMode::Never);
        let path = Path::new("/nonexistent/gone.png");
        cache.insert(path, labels(&["skirt"]));
        assert_eq!(cache.get(path), Some(labels(&["skirt"])));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = FeatureCache::default();
        cache.insert(Path::new("a"), labels(&["top"]));
        cache.insert(Path::new("b"), labels(&[]));
        assert!(cache.invalidate(Path::new("a")));
        assert!(!cache.invalidate(Path::new("a")));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_modified_time_policy_detects_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.jpg");
        std::fs::write(&path, b"v1").unwrap();

        let cache = FeatureCache::from_mode(InvalidationMode::Modified);
        cache.insert(&path, labels(&["dress"]));
        assert_eq!(cache.get(&path), Some(labels(&["dress"])));

        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        assert!(cache.get(&path).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_modified_time_policy_drops_deleted_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.jpg");
        std::fs::write(&path, b"v1").unwrap();

        let cache = FeatureCache::new(Box::new(ModifiedTime));
        cache.insert(&path, labels(&["dress"]));
        std::fs::remove_file(&path).unwrap();
        assert!(cache.get(&path).is_none());
    }
}
