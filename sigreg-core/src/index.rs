//! Signal Index - the authoritative id -> summary mapping
//!
//! The index is the only source of truth for "does signal X exist".
//! Iteration follows insertion order, which is also the tie-break order
//! when correlation scores are equal.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Signal;

/// Summary view of a signal as stored in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub title: String,
    pub path: String,
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_ref: Option<String>,

    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<&Signal> for IndexEntry {
    fn from(signal: &Signal) -> Self {
        Self {
            title: signal.title.clone(),
            path: signal.path.clone(),
            category: signal.category.clone(),
            embedding_ref: signal.embedding_ref.clone(),
            created: signal.created,
            updated: signal.updated,
        }
    }
}

/// Ordered mapping of signal id to index entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalIndex {
    entries: IndexMap<String, IndexEntry>,
}

impl SignalIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an entry by id
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// Whether a signal is registered
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// `created` timestamp of a prior registration of `id`, if any
    pub fn created_of(&self, id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(id).map(|entry| entry.created)
    }

    /// Insert or replace the entry for `id`, keeping the prior `created`
    ///
    /// An existing id keeps its position in iteration order.
    /// Returns the replaced entry.
    pub fn upsert(&mut self, id: &str, mut entry: IndexEntry) -> Option<IndexEntry> {
        if let Some(created) = self.created_of(id) {
            entry.created = created;
        }
        self.entries.insert(id.to_string(), entry)
    }

    /// Entries in index order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Entries that carry a stored vector, paired with its handle
    ///
    /// Entries without a handle are excluded from scoring entirely.
    pub fn scorable(&self) -> impl Iterator<Item = (&str, &IndexEntry, &str)> {
        self.iter().filter_map(|(id, entry)| {
            entry
                .embedding_ref
                .as_deref()
                .map(|handle| (id, entry, handle))
        })
    }

    /// First signal other than `id` whose vector lives at `handle`
    pub fn vector_owner(&self, handle: &str, id: &str) -> Option<&str> {
        self.scorable()
            .find(|(other, _, other_handle)| *other != id && *other_handle == handle)
            .map(|(other, _, _)| other)
    }

    /// Number of registered signals
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn entry(title: &str, embedding_ref: Option<&str>) -> IndexEntry {
        let now = Utc::now();
        IndexEntry {
            title: title.to_string(),
            path: format!("docs/{}.md", title),
            category: "unknown".to_string(),
            embedding_ref: embedding_ref.map(str::to_string),
            created: now,
            updated: now,
        }
    }

    #[test]
    fn test_upsert_preserves_created_and_position() {
        let mut index = SignalIndex::new();
        let first = entry("a", None);
        let original_created = first.created;
        index.upsert("a", first);
        index.upsert("b", entry("b", None));

        let mut again = entry("a2", Some("embeddings/a.json"));
        again.created = original_created + Duration::days(3);
        again.updated = original_created + Duration::days(3);
        let replaced = index.upsert("a", again);

        assert!(replaced.is_some());
        assert_eq!(index.len(), 2);
        let a = index.get("a").unwrap();
        assert_eq!(a.created, original_created);
        assert_eq!(a.title, "a2");
        let ids: Vec<_> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_scorable_skips_entries_without_vectors() {
        let mut index = SignalIndex::new();
        index.upsert("with", entry("with", Some("embeddings/with.json")));
        index.upsert("without", entry("without", None));

        let scorable: Vec<_> = index.scorable().map(|(id, _, handle)| (id, handle)).collect();
        assert_eq!(scorable, vec![("with", "embeddings/with.json")]);
    }

    #[test]
    fn test_vector_owner() {
        let mut index = SignalIndex::new();
        index.upsert("a.b", entry("dotted", Some("embeddings/a-b.json")));
        index.upsert("c", entry("c", Some("embeddings/c.json")));

        assert_eq!(index.vector_owner("embeddings/a-b.json", "a/b"), Some("a.b"));
        assert_eq!(index.vector_owner("embeddings/a-b.json", "a.b"), None);
        assert_eq!(index.vector_owner("embeddings/none.json", "a/b"), None);
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let mut index = SignalIndex::new();
        for name in ["zeta", "alpha", "mid"] {
            index.upsert(name, entry(name, Some("embeddings/x.json")));
        }
        index.upsert("bare", entry("bare", None));

        let json = serde_json::to_string_pretty(&index).unwrap();
        assert!(!json.contains("\"embedding_ref\": null"));
        let loaded: SignalIndex = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, index);
        let ids: Vec<_> = loaded.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid", "bare"]);
    }

    #[test]
    fn test_entry_from_signal() {
        let mut signal = Signal::builder("lib.one", &crate::SignalDefaults::default())
            .title("One")
            .path("one.md")
            .build();
        signal.embedding_ref = Some("embeddings/lib-one.json".to_string());

        let entry = IndexEntry::from(&signal);
        assert_eq!(entry.title, "One");
        assert_eq!(entry.path, "one.md");
        assert_eq!(entry.embedding_ref.as_deref(), Some("embeddings/lib-one.json"));
        assert_eq!(entry.created, signal.created);
    }
}
