//! Embedding provider abstraction

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Embedding provider errors
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Missing API credentials")]
    MissingCredentials,

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// Maps text to a fixed-length vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed `text` with a single attempt
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Thread-safe reference to an embedding provider
pub type SharedProvider = Arc<dyn EmbeddingProvider>;

/// Result of asking a provider for an embedding
#[derive(Debug)]
pub enum EmbeddingOutcome {
    Vector(Vec<f32>),
    Unavailable(EmbedError),
}

impl EmbeddingOutcome {
    pub fn into_vector(self) -> Option<Vec<f32>> {
        match self {
            Self::Vector(v) => Some(v),
            Self::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Vector(_))
    }
}

/// Embed `text`, bounded by `timeout`
///
/// Every failure (credentials, transport, empty or timed-out response) is
/// reported as [`EmbeddingOutcome::Unavailable`].
pub async fn embed_with_timeout(
    provider: &dyn EmbeddingProvider,
    text: &str,
    timeout: Duration,
) -> EmbeddingOutcome {
    let result = match tokio::time::timeout(timeout, provider.embed(text)).await {
        Ok(Ok(vector)) if vector.is_empty() => Err(EmbedError::EmptyResponse),
        Ok(result) => result,
        Err(_) => Err(EmbedError::Timeout(timeout)),
    };

    match result {
        Ok(vector) => {
            debug!(
                "Embedded {} chars with {} ({} dims)",
                text.len(),
                provider.model_name(),
                vector.len()
            );
            EmbeddingOutcome::Vector(vector)
        }
        Err(e) => {
            warn!("Embedding unavailable ({}): {}", provider.model_name(), e);
            EmbeddingOutcome::Unavailable(e)
        }
    }
}

/// Provider that never produces a vector
#[derive(Debug, Default, Clone)]
pub struct DisabledProvider;

#[async_trait]
impl EmbeddingProvider for DisabledProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Err(EmbedError::Config("embeddings are disabled".to_string()))
    }

    fn model_name(&self) -> &str {
        "disabled"
    }
}
