//! Registry configuration
//!
//! Loaded from an optional TOML file; every section and field falls back to
//! its default, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    DEFAULT_AUTO_APPEND_THRESHOLD, DEFAULT_INTENT_MAX_CHARS, DEFAULT_MAX_MATCHES,
    DEFAULT_SUGGEST_THRESHOLD,
};

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid thresholds: suggest ({suggest}) must not exceed auto-append ({auto_append})")]
    Thresholds { suggest: f64, auto_append: f64 },

    #[error("Invalid threshold {name} = {value}: must lie within [0, 1]")]
    ThresholdRange { name: &'static str, value: f64 },

    #[error("Invalid max_matches: must be at least 1")]
    MaxMatches,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub defaults: SignalDefaults,
    pub correlation: CorrelationConfig,
    pub store: StoreConfig,
    pub embedding: EmbeddingSettings,
}

impl RegistryConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.correlation;
        for (name, value) in [
            ("suggest_threshold", c.suggest_threshold),
            ("auto_append_threshold", c.auto_append_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdRange { name, value });
            }
        }
        if c.max_matches == 0 {
            return Err(ConfigError::MaxMatches);
        }
        if c.suggest_threshold > c.auto_append_threshold {
            return Err(ConfigError::Thresholds {
                suggest: c.suggest_threshold,
                auto_append: c.auto_append_threshold,
            });
        }
        Ok(())
    }
}

/// Values used when an artifact's front-matter omits a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalDefaults {
    pub category: String,
    pub title: String,
    pub domain_tags: Vec<String>,
    pub key_phrases: Vec<String>,
    pub source: String,
    /// Prefix of synthesized ids
    pub id_prefix: String,
    pub intent_max_chars: usize,
}

impl Default for SignalDefaults {
    fn default() -> Self {
        Self {
            category: "unknown".to_string(),
            title: "Untitled".to_string(),
            domain_tags: Vec::new(),
            key_phrases: Vec::new(),
            source: "library".to_string(),
            id_prefix: "unknown".to_string(),
            intent_max_chars: DEFAULT_INTENT_MAX_CHARS,
        }
    }
}

/// Tier thresholds and result size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    pub suggest_threshold: f64,
    pub auto_append_threshold: f64,
    pub max_matches: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            suggest_threshold: DEFAULT_SUGGEST_THRESHOLD,
            auto_append_threshold: DEFAULT_AUTO_APPEND_THRESHOLD,
            max_matches: DEFAULT_MAX_MATCHES,
        }
    }
}

/// On-disk layout, relative to `root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub index_file: PathBuf,
    pub embeddings_dir: PathBuf,
    pub signals_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index_file: PathBuf::from("index.json"),
            embeddings_dir: PathBuf::from("embeddings"),
            signals_dir: PathBuf::from("signals/library"),
        }
    }
}

impl StoreConfig {
    /// Layout rooted at `root` with default relative paths
    pub fn rooted<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    #[default]
    Openai,
    Ollama,
    Disabled,
}

/// Embedding backend settings (credentials come from the environment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProviderKind,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: "text-embedding-3-small".to_string(),
            base_url: None,
            timeout_secs: 30,
        }
    }
}
