//! Per-signal record store
//!
//! Holds the full signal record, derived from registration. The index stays
//! the authority on which signals exist.

use std::path::PathBuf;

use sigreg_core::{record_stem, Signal, StoreConfig};

use crate::{read_json, write_json_atomic, StoreError};

#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.root.join(&config.signals_dir))
    }

    /// File holding the record of `signal_id`
    pub fn path_for(&self, signal_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", record_stem(signal_id)))
    }

    pub fn save(&self, signal: &Signal) -> Result<PathBuf, StoreError> {
        let path = self.path_for(&signal.id);
        write_json_atomic(&path, signal)?;
        Ok(path)
    }

    pub fn load(&self, signal_id: &str) -> Result<Option<Signal>, StoreError> {
        read_json(&self.path_for(signal_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigreg_core::SignalDefaults;
    use tempfile::TempDir;

    #[test]
    fn test_record_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::from_config(&StoreConfig::rooted(dir.path()));

        let mut signal = Signal::builder("library.patterns.retry", &SignalDefaults::default())
            .title("Retry")
            .body("Retry with backoff")
            .path("docs/retry.md")
            .build();
        signal.embedding_ref = Some("embeddings/library-patterns-retry.json".to_string());

        let path = store.save(&signal).unwrap();
        assert_eq!(path, dir.path().join("signals/library/retry.json"));
        assert_eq!(store.load("library.patterns.retry").unwrap(), Some(signal));
    }

    #[test]
    fn test_record_json_fields() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        let signal = Signal::builder("x.y", &SignalDefaults::default()).build();

        let path = store.save(&signal).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(json["type"], "artifact");
        assert_eq!(json["source"], "library");
        assert!(json.get("embedding_ref").is_none());
    }

    #[test]
    fn test_missing_record() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        assert!(store.load("nope").unwrap().is_none());
    }
}
