//! Registrar
//!
//! Registers an artifact as a signal:
//! 1. Split front-matter and body (malformed metadata is ignored)
//! 2. Resolve the id (explicit, front-matter, or synthesized)
//! 3. Embed title + intent + key phrases and store the vector
//! 4. Upsert the index, keeping `created` of a prior registration
//! 5. Write the full per-signal record

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use sigreg_core::{
    parse_frontmatter, synthesize_id, IndexEntry, RegistryConfig, Signal, SignalDefaults,
};
use sigreg_embed::{embed_with_timeout, embedding_timeout, EmbeddingOutcome, SharedProvider};
use sigreg_store::{IndexRepository, RecordStore, StoreError, VectorStore};

/// Errors that abort a registration
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read artifact {path}: {source}")]
    ReadArtifact {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Index error: {0}")]
    Index(#[from] StoreError),
}

/// Builds signals from artifacts and persists them
pub struct Registrar {
    provider: SharedProvider,
    timeout: Duration,
    defaults: SignalDefaults,
    index: IndexRepository,
    vectors: VectorStore,
    records: RecordStore,
}

impl Registrar {
    pub fn new(config: &RegistryConfig, provider: SharedProvider) -> Self {
        Self {
            provider,
            timeout: embedding_timeout(&config.embedding),
            defaults: config.defaults.clone(),
            index: IndexRepository::from_config(&config.store),
            vectors: VectorStore::from_config(&config.store),
            records: RecordStore::from_config(&config.store),
        }
    }

    /// Register the artifact stored at `path`
    ///
    /// An unreadable file fails before anything is written.
    pub async fn register_file(
        &self,
        path: &Path,
        explicit_id: Option<&str>,
    ) -> Result<Signal, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::ReadArtifact {
            path: path.to_path_buf(),
            source,
        })?;
        self.register(&content, &path.to_string_lossy(), explicit_id)
            .await
    }

    /// Register artifact `content` that originated at `artifact_path`
    pub async fn register(
        &self,
        content: &str,
        artifact_path: &str,
        explicit_id: Option<&str>,
    ) -> Result<Signal, RegistryError> {
        let parsed = parse_frontmatter(content);
        let id = self.resolve_id(explicit_id, parsed.metadata.id.as_deref());

        let mut signal = Signal::builder(id.as_str(), &self.defaults)
            .metadata(&parsed.metadata)
            .body(&parsed.body)
            .path(artifact_path)
            .build();

        signal.embedding_ref = self.store_embedding(&signal).await;

        let replaced = self.index.update(|index| {
            if let Some(handle) = &signal.embedding_ref {
                if let Some(other) = index.vector_owner(handle, &signal.id) {
                    warn!("{} now shares vector {} with {}", signal.id, handle, other);
                }
            }
            if let Some(created) = index.created_of(&signal.id) {
                signal.created = created;
            }
            index.upsert(&signal.id, IndexEntry::from(&signal))
        })?;

        if replaced.is_some() {
            self.note_reregistration(&signal);
        }

        match self.records.save(&signal) {
            Ok(path) => debug!("Wrote record {}", path.display()),
            Err(e) => warn!("Failed to write record for {}: {}", signal.id, e),
        }

        info!(
            "Registered: {} ({}, embedded: {})",
            signal.id,
            if replaced.is_some() { "updated" } else { "new" },
            signal.embedding_ref.is_some()
        );
        Ok(signal)
    }

    fn resolve_id(&self, explicit: Option<&str>, from_metadata: Option<&str>) -> String {
        non_blank(explicit)
            .or_else(|| non_blank(from_metadata))
            .map(str::to_string)
            .unwrap_or_else(|| synthesize_id(&self.defaults.id_prefix, Utc::now()))
    }

    /// Embed the signal and persist its vector; `None` degrades gracefully
    async fn store_embedding(&self, signal: &Signal) -> Option<String> {
        let text = signal.embedding_text();
        let vector = match embed_with_timeout(self.provider.as_ref(), &text, self.timeout).await {
            EmbeddingOutcome::Vector(vector) => vector,
            EmbeddingOutcome::Unavailable(_) => return None,
        };

        match self.vectors.save(&signal.id, &vector) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to store vector for {}: {}", signal.id, e);
                None
            }
        }
    }

    fn note_reregistration(&self, signal: &Signal) {
        match self.records.load(&signal.id) {
            Ok(Some(prior)) if prior.id == signal.id && prior.content_hash == signal.content_hash => {
                debug!("{} re-registered with unchanged content", signal.id);
            }
            Ok(_) => debug!("{} re-registered", signal.id),
            Err(e) => debug!("Prior record for {} unreadable: {}", signal.id, e),
        }
    }
}

fn non_blank(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}
