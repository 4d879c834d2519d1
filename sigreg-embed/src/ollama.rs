//! Ollama embedding backend

use async_trait::async_trait;
use serde::Deserialize;

use crate::{EmbedError, EmbeddingProvider};

/// Default Ollama server address
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama backend configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server base URL
    pub base_url: String,
    /// Model name (e.g., nomic-embed-text)
    pub model: String,
}

impl OllamaConfig {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_URL, "nomic-embed-text")
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

/// Embedding provider backed by a local Ollama server
pub struct OllamaEmbedder {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaEmbedder {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "prompt": text,
        });

        let response = self
            .client
            .post(self.config.endpoint())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(EmbedError::Api(format!("Ollama API error {}: {}", status, text)));
        }

        let body: OllamaEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Api(e.to_string()))?;

        if body.embedding.is_empty() {
            return Err(EmbedError::EmptyResponse);
        }
        Ok(body.embedding)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
