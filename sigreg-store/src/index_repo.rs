//! Signal Index repository
//!
//! The index file is reloaded on every call; nothing is cached between
//! operations.

use std::path::PathBuf;

use sigreg_core::{SignalIndex, StoreConfig};
use tracing::debug;

use crate::{read_json, write_json_atomic, StoreError};

/// Read / modify / write access to the persisted index
#[derive(Debug, Clone)]
pub struct IndexRepository {
    path: PathBuf,
}

impl IndexRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.index_path())
    }

    /// Load the index; a missing file is an empty index
    pub fn load(&self) -> Result<SignalIndex, StoreError> {
        match read_json(&self.path)? {
            Some(index) => Ok(index),
            None => {
                debug!("No index at {}, starting empty", self.path.display());
                Ok(SignalIndex::new())
            }
        }
    }

    /// Persist the whole index atomically
    pub fn save(&self, index: &SignalIndex) -> Result<(), StoreError> {
        write_json_atomic(&self.path, index)
    }

    /// Load, apply `f`, save, and return what `f` returned
    ///
    /// Not atomic with respect to other writers.
    pub fn update<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut SignalIndex) -> R,
    {
        let mut index = self.load()?;
        let result = f(&mut index);
        self.save(&index)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sigreg_core::IndexEntry;
    use tempfile::TempDir;

    fn entry(title: &str, embedding_ref: Option<&str>) -> IndexEntry {
        let now = Utc::now();
        IndexEntry {
            title: title.to_string(),
            path: format!("{}.md", title),
            category: "note".to_string(),
            embedding_ref: embedding_ref.map(str::to_string),
            created: now,
            updated: now,
        }
    }

    #[test]
    fn test_missing_index_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo = IndexRepository::new(dir.path().join("index.json"));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let repo = IndexRepository::from_config(&StoreConfig::rooted(dir.path()));

        let mut index = SignalIndex::new();
        index.upsert("lib.b", entry("b", Some("embeddings/lib-b.json")));
        index.upsert("lib.a", entry("a", None));
        repo.save(&index).unwrap();

        assert_eq!(repo.load().unwrap(), index);
    }

    #[test]
    fn test_update_preserves_created() {
        let dir = TempDir::new().unwrap();
        let repo = IndexRepository::new(dir.path().join("index.json"));

        let first = entry("a", None);
        let created = first.created;
        repo.update(|index| index.upsert("a", first)).unwrap();

        let mut second = entry("a", Some("embeddings/a.json"));
        second.created = created + Duration::hours(1);
        let replaced = repo.update(|index| index.upsert("a", second)).unwrap();

        assert!(replaced.is_some());
        let loaded = repo.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("a").unwrap().created, created);
    }

    #[test]
    fn test_corrupt_index_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let repo = IndexRepository::new(path);
        assert!(repo.load().is_err());
    }
}
