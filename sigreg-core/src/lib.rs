//! sigreg Core - Signal model and correlation primitives
//!
//! This crate provides the foundational primitives:
//! - Signals registered from source artifacts
//! - The signal index (id -> summary record)
//! - Cosine similarity, ranking and recommendation tiers
//! - Front-matter extraction from artifact documents
//! - Registry configuration with explicit defaults

pub mod config;
pub mod correlation;
pub mod frontmatter;
pub mod index;
pub mod signals;
pub mod similarity;

pub use config::*;
pub use correlation::*;
pub use frontmatter::*;
pub use index::*;
pub use signals::*;
pub use similarity::*;

/// Provenance tag carried by every registered signal
pub const SIGNAL_TYPE: &str = "artifact";

/// Score at or above which a related signal is suggested
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.70;

/// Score at or above which a new artifact is merged automatically
pub const DEFAULT_AUTO_APPEND_THRESHOLD: f64 = 0.90;

/// Maximum matches reported by a correlation
pub const DEFAULT_MAX_MATCHES: usize = 5;

/// Maximum characters of body text kept as a signal's intent
pub const DEFAULT_INTENT_MAX_CHARS: usize = 200;
