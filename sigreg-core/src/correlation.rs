//! Correlation results and recommendation tiers
//!
//! A correlation ranks existing signals against a query and turns the best
//! score into one of three recommendations:
//! - **CREATE**: nothing similar enough, treat the artifact as new
//! - **SUGGEST**: plausible relation, defer to an upstream decision
//! - **AUTO-APPEND**: near-duplicate, safe to merge automatically

use serde::{Deserialize, Serialize};

use crate::{compose_embedding_text, CorrelationConfig};

/// Recommendation tier derived from the top similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "CREATE")]
    Create,
    #[serde(rename = "SUGGEST")]
    Suggest,
    #[serde(rename = "AUTO-APPEND")]
    AutoAppend,
}

impl Recommendation {
    /// Classify a score; each tier is inclusive at its lower bound
    pub fn classify(score: f64, config: &CorrelationConfig) -> Self {
        if score >= config.auto_append_threshold {
            Self::AutoAppend
        } else if score >= config.suggest_threshold {
            Self::Suggest
        } else {
            Self::Create
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Suggest => "SUGGEST",
            Self::AutoAppend => "AUTO-APPEND",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of a candidate artifact to correlate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub key_phrases: Vec<String>,
}

impl CorrelationQuery {
    /// Same composition as registration uses
    pub fn embedding_text(&self) -> String {
        compose_embedding_text(&self.title, &self.intent, &self.key_phrases)
    }
}

/// One scored existing signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMatch {
    pub signal_id: String,
    pub score: f64,
    pub title: String,
    pub path: String,
}

/// Outcome of a single correlation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Best first, at most `max_matches`
    pub matches: Vec<SignalMatch>,
    pub top_score: f64,
    pub recommendation: Recommendation,
    pub suggested_target: Option<String>,
}

impl CorrelationResult {
    /// Result used when no query vector could be produced
    pub fn unavailable() -> Self {
        Self {
            matches: Vec::new(),
            top_score: 0.0,
            recommendation: Recommendation::Create,
            suggested_target: None,
        }
    }

    /// Rank scored candidates (given in index order) and classify the best one
    pub fn from_candidates(candidates: Vec<SignalMatch>, config: &CorrelationConfig) -> Self {
        let matches = rank_matches(candidates, config.max_matches);
        let top_score = matches.first().map_or(0.0, |m| m.score);

        Self {
            recommendation: Recommendation::classify(top_score, config),
            suggested_target: matches.first().map(|m| m.signal_id.clone()),
            top_score,
            matches,
        }
    }
}

/// Sort descending by score and keep the first `limit`
///
/// The sort is stable, so equal scores keep their incoming order.
pub fn rank_matches(mut candidates: Vec<SignalMatch>, limit: usize) -> Vec<SignalMatch> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(limit);
    candidates
}
