//! Vector Store - one embedding per signal
//!
//! Vectors are JSON arrays under `<root>/<embeddings_dir>/<key>.json`, where
//! the key is the filesystem-safe transform of the signal id. The handle
//! recorded in the index is the path relative to the store root.
//!
//! Distinct ids can share a key (`a.b`, `a/b` and `a b` all become `a-b`).
//! Such signals share one vector file and the last save wins for all of them.

use std::path::{Path, PathBuf};

use sigreg_core::{storage_key, StoreConfig};
use tracing::debug;

use crate::{read_json, write_json_atomic, StoreError};

/// Persists and loads signal vectors
#[derive(Debug, Clone)]
pub struct VectorStore {
    root: PathBuf,
    embeddings_dir: PathBuf,
}

impl VectorStore {
    pub fn new<P: Into<PathBuf>, D: Into<PathBuf>>(root: P, embeddings_dir: D) -> Self {
        Self {
            root: root.into(),
            embeddings_dir: embeddings_dir.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.root, &config.embeddings_dir)
    }

    /// Handle under which the vector of `signal_id` is stored
    pub fn handle_for(&self, signal_id: &str) -> String {
        self.embeddings_dir
            .join(format!("{}.json", storage_key(signal_id)))
            .to_string_lossy()
            .into_owned()
    }

    /// Store the vector for `signal_id`, returning its handle
    pub fn save(&self, signal_id: &str, vector: &[f32]) -> Result<String, StoreError> {
        let handle = self.handle_for(signal_id);
        let path = self.resolve(&handle)?;
        validate(&path, vector)?;
        if path.exists() {
            debug!("Overwriting vector {} for {}", handle, signal_id);
        }
        write_json_atomic(&path, vector)?;
        Ok(handle)
    }

    /// Load the vector behind `handle`
    pub fn load(&self, handle: &str) -> Result<Vec<f32>, StoreError> {
        let path = self.resolve(handle)?;
        let vector: Vec<f32> = read_json(&path)?.ok_or_else(|| StoreError::Io {
            path: path.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        validate(&path, &vector)?;
        Ok(vector)
    }

    fn resolve(&self, handle: &str) -> Result<PathBuf, StoreError> {
        if handle.trim().is_empty() {
            return Err(StoreError::InvalidHandle(handle.to_string()));
        }
        Ok(self.root.join(handle))
    }
}

fn validate(path: &Path, vector: &[f32]) -> Result<(), StoreError> {
    let reason = if vector.is_empty() {
        "empty vector"
    } else if vector.iter().any(|x| !x.is_finite()) {
        "non-finite component"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidVector {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> VectorStore {
        VectorStore::from_config(&StoreConfig::rooted(dir.path()))
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let handle = store.save("library.patterns.retry", &[0.25, -1.5, 3.0]).unwrap();
        assert_eq!(handle, Path::new("embeddings").join("library-patterns-retry.json").to_string_lossy());
        assert!(dir.path().join(&handle).exists());
        assert_eq!(store.load(&handle).unwrap(), vec![0.25, -1.5, 3.0]);
    }

    #[test]
    fn test_colliding_keys_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let first = store.save("a.b", &[1.0, 0.0]).unwrap();
        let second = store.save("a b", &[0.0, 1.0]).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.load(&first).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_rejects_invalid_vectors() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(matches!(store.save("a", &[]), Err(StoreError::InvalidVector { .. })));
        assert!(matches!(
            store.save("a", &[1.0, f32::NAN]),
            Err(StoreError::InvalidVector { .. })
        ));
        assert!(!dir.path().join("embeddings/a.json").exists());
    }

    #[test]
    fn test_load_failures() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(matches!(store.load("embeddings/missing.json"), Err(StoreError::Io { .. })));
        assert!(matches!(store.load(""), Err(StoreError::InvalidHandle(_))));

        std::fs::create_dir_all(dir.path().join("embeddings")).unwrap();
        std::fs::write(dir.path().join("embeddings/corrupt.json"), "[1.0, \"x\"]").unwrap();
        assert!(matches!(store.load("embeddings/corrupt.json"), Err(StoreError::Json { .. })));

        std::fs::write(dir.path().join("embeddings/empty.json"), "[]").unwrap();
        assert!(matches!(
            store.load("embeddings/empty.json"),
            Err(StoreError::InvalidVector { .. })
        ));
    }
}
