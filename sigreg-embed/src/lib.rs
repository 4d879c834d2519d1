//! sigreg Embeddings
//!
//! Embedding provider backends:
//! - **OpenAI**: OpenAI-compatible `/embeddings` APIs via `async-openai`
//! - **Ollama**: local models over Ollama's HTTP API
//! - **Disabled**: always unavailable, for offline registries
//!
//! Callers never see provider errors directly: [`embed_with_timeout`] turns
//! every call into an [`EmbeddingOutcome`].

pub mod factory;
pub mod ollama;
pub mod openai;
pub mod provider;

pub use factory::*;
pub use ollama::*;
pub use openai::*;
pub use provider::*;
