//! Correlator
//!
//! Scores a query against every indexed signal that has a stored vector and
//! recommends what to do with the artifact the query describes. A correlation
//! always yields a complete result; local failures only remove candidates.

use std::time::Duration;

use tracing::{debug, info, warn};

use sigreg_core::{
    cosine_similarity, CorrelationConfig, CorrelationQuery, CorrelationResult, RegistryConfig,
    SignalIndex, SignalMatch,
};
use sigreg_embed::{embed_with_timeout, embedding_timeout, SharedProvider};
use sigreg_store::{IndexRepository, VectorStore};

/// Ranks existing signals against new artifacts
pub struct Correlator {
    provider: SharedProvider,
    timeout: Duration,
    config: CorrelationConfig,
    index: IndexRepository,
    vectors: VectorStore,
}

impl Correlator {
    pub fn new(config: &RegistryConfig, provider: SharedProvider) -> Self {
        Self {
            provider,
            timeout: embedding_timeout(&config.embedding),
            config: config.correlation.clone(),
            index: IndexRepository::from_config(&config.store),
            vectors: VectorStore::from_config(&config.store),
        }
    }

    /// Correlate `query` against the registered signals
    pub async fn correlate(&self, query: &CorrelationQuery) -> CorrelationResult {
        let text = query.embedding_text();
        let Some(query_vector) = embed_with_timeout(self.provider.as_ref(), &text, self.timeout)
            .await
            .into_vector()
        else {
            info!("No query embedding, recommending CREATE");
            return CorrelationResult::unavailable();
        };

        let index = match self.index.load() {
            Ok(index) => index,
            Err(e) => {
                warn!("Index unreadable, correlating against nothing: {}", e);
                SignalIndex::new()
            }
        };

        let candidates = self.score(&index, &query_vector);
        let result = CorrelationResult::from_candidates(candidates, &self.config);

        info!(
            "Correlation: {} (score: {:.2}, {} matches)",
            result.recommendation,
            result.top_score,
            result.matches.len()
        );
        result
    }

    /// Score every signal with a stored vector, in index order
    fn score(&self, index: &SignalIndex, query: &[f32]) -> Vec<SignalMatch> {
        index
            .scorable()
            .filter_map(|(signal_id, entry, handle)| {
                let stored = match self.vectors.load(handle) {
                    Ok(vector) => vector,
                    Err(e) => {
                        debug!("Skipping {}: {}", signal_id, e);
                        return None;
                    }
                };

                let Some(score) = cosine_similarity(query, &stored) else {
                    debug!("Skipping {}: similarity undefined", signal_id);
                    return None;
                };

                debug!("{} scored {:.4}", signal_id, score);
                Some(SignalMatch {
                    signal_id: signal_id.to_string(),
                    score,
                    title: entry.title.clone(),
                    path: entry.path.clone(),
                })
            })
            .collect()
    }
}
