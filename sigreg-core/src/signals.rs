//! Signals registered from source artifacts
//!
//! A signal is the unit of registered knowledge:
//! - Identified by a stable, globally unique id
//! - Described by metadata taken from the artifact's front-matter
//! - Summarized by a bounded intent derived from the artifact body
//! - Optionally backed by a stored embedding vector

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{ArtifactMetadata, SignalDefaults, SIGNAL_TYPE};

/// A registered signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Globally unique id; the last dotted segment names the record file
    pub id: String,

    /// Provenance kind (always "artifact")
    #[serde(rename = "type")]
    pub signal_type: String,

    /// Collection the artifact came from
    pub source: String,

    pub category: String,
    pub title: String,
    pub domain_tags: Vec<String>,

    /// Bounded single-line summary of the artifact body
    pub intent: String,

    pub key_phrases: Vec<String>,

    /// Location of the originating artifact (informational)
    pub path: String,

    /// Content-based hash of the artifact body
    pub content_hash: String,

    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,

    /// Handle to the stored vector, absent when no embedding was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_ref: Option<String>,
}

impl Signal {
    /// Create a new signal builder seeded with `defaults`
    pub fn builder(id: impl Into<String>, defaults: &SignalDefaults) -> SignalBuilder {
        SignalBuilder::new(id, defaults)
    }

    /// Text submitted to the embedding provider for this signal
    pub fn embedding_text(&self) -> String {
        compose_embedding_text(&self.title, &self.intent, &self.key_phrases)
    }

    /// Filesystem-safe key used to address this signal's vector
    pub fn storage_key(&self) -> String {
        storage_key(&self.id)
    }

    /// File stem of this signal's full record
    pub fn record_stem(&self) -> String {
        record_stem(&self.id)
    }

    fn compute_content_hash(body: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        format!("{:x}", hasher.finalize())[..16].to_string()
    }
}

/// Builder for signals
pub struct SignalBuilder {
    id: String,
    source: String,
    category: String,
    title: String,
    domain_tags: Vec<String>,
    key_phrases: Vec<String>,
    intent: String,
    intent_max_chars: usize,
    body: String,
    path: String,
    created: Option<DateTime<Utc>>,
}

impl SignalBuilder {
    pub fn new(id: impl Into<String>, defaults: &SignalDefaults) -> Self {
        Self {
            id: id.into(),
            source: defaults.source.clone(),
            category: defaults.category.clone(),
            title: defaults.title.clone(),
            domain_tags: defaults.domain_tags.clone(),
            key_phrases: defaults.key_phrases.clone(),
            intent: String::new(),
            intent_max_chars: defaults.intent_max_chars,
            body: String::new(),
            path: String::new(),
            created: None,
        }
    }

    /// Override defaults with whatever the artifact's front-matter supplied
    pub fn metadata(mut self, metadata: &ArtifactMetadata) -> Self {
        if let Some(category) = &metadata.category {
            self.category = category.clone();
        }
        if let Some(title) = &metadata.title {
            self.title = title.clone();
        }
        if let Some(tags) = &metadata.domain_tags {
            self.domain_tags = tags.clone();
        }
        if let Some(phrases) = &metadata.key_phrases {
            self.key_phrases = phrases.clone();
        }
        if let Some(created) = metadata.created {
            self.created = Some(created);
        }
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Artifact body; the intent is derived from it
    pub fn body(mut self, body: &str) -> Self {
        self.intent = derive_intent(body, self.intent_max_chars);
        self.body = body.to_string();
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn build(self) -> Signal {
        let now = Utc::now();
        let content_hash = Signal::compute_content_hash(&self.body);

        Signal {
            id: self.id,
            signal_type: SIGNAL_TYPE.to_string(),
            source: self.source,
            category: self.category,
            title: self.title,
            domain_tags: self.domain_tags,
            intent: self.intent,
            key_phrases: self.key_phrases,
            path: self.path,
            content_hash,
            created: self.created.unwrap_or(now),
            updated: now,
            embedding_ref: None,
        }
    }
}

static UNSAFE_KEY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").unwrap());

/// Compose the embedding input from a title, an intent and key phrases
///
/// Registration and correlation both go through this function.
pub fn compose_embedding_text(title: &str, intent: &str, key_phrases: &[String]) -> String {
    format!("{} {} {}", title, intent, key_phrases.join(" "))
}

/// Bounded prefix of `body` with line breaks collapsed to spaces
pub fn derive_intent(body: &str, max_chars: usize) -> String {
    body.chars()
        .take(max_chars)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Filesystem-safe transform of a signal id (dots and path characters become `-`)
///
/// The transform is not injective: ids differing only in replaced
/// characters map to the same key.
pub fn storage_key(id: &str) -> String {
    UNSAFE_KEY_CHARS.replace_all(id, "-").into_owned()
}

/// Record file stem: the last dotted segment of the id, made filesystem-safe
pub fn record_stem(id: &str) -> String {
    match id.rsplit('.').next() {
        Some(segment) if !segment.is_empty() => storage_key(segment),
        _ => storage_key(id),
    }
}

/// Synthesize an id from `prefix`, a second-granularity timestamp and a
/// random suffix that keeps same-second registrations apart
pub fn synthesize_id(prefix: &str, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}.{}-{}", prefix, now.format("%Y%m%d%H%M%S"), &suffix[..8])
}
