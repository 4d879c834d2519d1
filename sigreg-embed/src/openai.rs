//! OpenAI-compatible embedding backend

use async_openai::{config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;

use crate::{EmbedError, EmbeddingProvider};

/// OpenAI-compatible backend configuration
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingConfig {
    /// API key; empty means the provider is unavailable
    pub api_key: String,
    /// Base URL (for OpenRouter, local servers, etc.)
    pub base_url: Option<String>,
    /// Model name
    pub model: String,
}

impl Default for OpenAIEmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: "text-embedding-3-small".to_string(),
        }
    }
}

/// Embedding provider backed by an OpenAI-compatible API
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    config: OpenAIEmbeddingConfig,
}

impl OpenAIEmbedder {
    pub fn new(config: OpenAIEmbeddingConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let client = Client::with_config(openai_config);

        Self { client, config }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if self.config.api_key.trim().is_empty() {
            return Err(EmbedError::MissingCredentials);
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.config.model)
            .input(text)
            .build()
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or(EmbedError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let embedder = OpenAIEmbedder::new(OpenAIEmbeddingConfig::default());
        let result = embedder.embed("anything").await;
        assert!(matches!(result, Err(EmbedError::MissingCredentials)));
    }
}
