//! Provider construction from settings

use std::sync::Arc;
use std::time::Duration;

use sigreg_core::{EmbeddingProviderKind, EmbeddingSettings};
use tracing::info;

use crate::{
    DisabledProvider, OllamaConfig, OllamaEmbedder, OpenAIEmbedder, OpenAIEmbeddingConfig,
    SharedProvider, DEFAULT_OLLAMA_URL,
};

/// Build the provider selected by `settings`
///
/// `api_key` is only consulted by the OpenAI backend; a missing key still
/// yields a provider, one whose calls report missing credentials.
pub fn create_provider(settings: &EmbeddingSettings, api_key: Option<&str>) -> SharedProvider {
    match settings.provider {
        EmbeddingProviderKind::Openai => {
            let config = OpenAIEmbeddingConfig {
                api_key: api_key.unwrap_or_default().to_string(),
                base_url: settings.base_url.clone(),
                model: settings.model.clone(),
            };
            info!("Using OpenAI-compatible embeddings ({})", config.model);
            Arc::new(OpenAIEmbedder::new(config))
        }
        EmbeddingProviderKind::Ollama => {
            let base_url = settings.base_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
            info!("Using Ollama embeddings at {} ({})", base_url, settings.model);
            Arc::new(OllamaEmbedder::new(OllamaConfig::new(base_url, &settings.model)))
        }
        EmbeddingProviderKind::Disabled => {
            info!("Embeddings disabled");
            Arc::new(DisabledProvider)
        }
    }
}

/// Per-call timeout from settings
pub fn embedding_timeout(settings: &EmbeddingSettings) -> Duration {
    Duration::from_secs(settings.timeout_secs)
}
