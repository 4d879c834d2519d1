//! Front-matter extraction from artifact documents
//!
//! Artifacts are markdown-like documents that may open with a YAML block
//! delimited by `---` lines. Missing or malformed front-matter never fails:
//! it yields empty metadata and the document is treated as all body.

use chrono::{DateTime, NaiveDate, Utc};
use serde_yaml::Value;
use tracing::{debug, warn};

/// Metadata recognised in an artifact's front-matter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactMetadata {
    pub id: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub domain_tags: Option<Vec<String>>,
    pub key_phrases: Option<Vec<String>>,
    pub created: Option<DateTime<Utc>>,
}

impl ArtifactMetadata {
    /// Pick known fields out of a YAML mapping, ignoring ill-typed ones
    pub fn from_yaml(value: &Value) -> Self {
        let Some(mapping) = value.as_mapping() else {
            return Self::default();
        };
        let field = |name: &str| mapping.get(Value::String(name.to_string()));

        Self {
            id: field("id").and_then(scalar_string),
            category: field("category").and_then(scalar_string),
            title: field("title").and_then(scalar_string),
            domain_tags: field("domain_tags").and_then(string_list),
            key_phrases: field("key_phrases").and_then(string_list),
            created: field("created").and_then(scalar_string).and_then(|s| parse_timestamp(&s)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An artifact split into metadata and body
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArtifact {
    pub metadata: ArtifactMetadata,
    pub body: String,
}

/// Split `content` into front-matter metadata and body
pub fn parse_frontmatter(content: &str) -> ParsedArtifact {
    let unparsed = || ParsedArtifact {
        metadata: ArtifactMetadata::default(),
        body: content.to_string(),
    };

    let mut lines = content.split_inclusive('\n');
    match lines.next() {
        Some(first) if is_delimiter(first) => {}
        _ => return unparsed(),
    }

    let mut yaml = String::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if is_delimiter(line) {
            closed = true;
            break;
        }
        yaml.push_str(line);
    }

    if !closed {
        debug!("Front-matter block is not terminated, treating artifact as body");
        return unparsed();
    }

    let body = lines.collect::<String>().trim().to_string();
    let metadata = match serde_yaml::from_str::<Value>(&yaml) {
        Ok(value) => ArtifactMetadata::from_yaml(&value),
        Err(e) => {
            warn!("Malformed front-matter ignored: {}", e);
            ArtifactMetadata::default()
        }
    };

    ParsedArtifact { metadata, body }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_sequence()
        .map(|items| items.iter().filter_map(scalar_string).collect())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_full_frontmatter() {
        let content = "---\nid: library.patterns.retry\ntitle: Retry with backoff\ncategory: pattern\ndomain_tags: [resilience, networking]\nkey_phrases:\n  - exponential backoff\n  - jitter\ncreated: 2025-03-01T10:00:00Z\n---\n\nRetry failed calls with growing delays.\n";
        let parsed = parse_frontmatter(content);

        assert_eq!(parsed.metadata.id.as_deref(), Some("library.patterns.retry"));
        assert_eq!(parsed.metadata.title.as_deref(), Some("Retry with backoff"));
        assert_eq!(parsed.metadata.category.as_deref(), Some("pattern"));
        assert_eq!(
            parsed.metadata.domain_tags,
            Some(vec!["resilience".to_string(), "networking".to_string()])
        );
        assert_eq!(parsed.metadata.key_phrases.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            parsed.metadata.created,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(parsed.body, "Retry failed calls with growing delays.");
    }

    #[test]
    fn test_no_frontmatter() {
        let parsed = parse_frontmatter("Just a body\nwith lines");
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "Just a body\nwith lines");
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let content = "---\ntitle: Dangling\nno end";
        let parsed = parse_frontmatter(content);
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_malformed_yaml_keeps_body() {
        let parsed = parse_frontmatter("---\ntitle: [unclosed\n---\nBody text\n");
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "Body text");
    }

    #[test]
    fn test_ill_typed_fields_are_ignored() {
        let parsed =
            parse_frontmatter("---\ntitle:\n  nested: map\nkey_phrases: not-a-list\nid: 42\n---\nx");
        assert_eq!(parsed.metadata.title, None);
        assert_eq!(parsed.metadata.key_phrases, None);
        assert_eq!(parsed.metadata.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_body_may_contain_delimiters() {
        let parsed = parse_frontmatter("---\r\ntitle: A---B\r\n---\r\nbefore\n---\nafter");
        assert_eq!(parsed.metadata.title.as_deref(), Some("A---B"));
        assert_eq!(parsed.body, "before\n---\nafter");
    }

    #[test]
    fn test_date_only_created() {
        let parsed = parse_frontmatter("---\ncreated: 2024-06-30\n---\n");
        assert_eq!(
            parsed.metadata.created,
            Some(Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap())
        );
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_non_mapping_yaml() {
        let parsed = parse_frontmatter("---\n- just\n- a list\n---\nbody");
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "body");
    }
}
