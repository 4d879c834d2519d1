//! sigreg Engine
//!
//! Decides, for each newly produced artifact, whether it duplicates an
//! existing signal, should be merged into one, or is new:
//! - [`Registrar`] turns an artifact into a signal, stores its vector and
//!   upserts the index and the per-signal record
//! - [`Correlator`] ranks indexed signals against a query and recommends
//!   CREATE, SUGGEST or AUTO-APPEND
//!
//! Every call reloads persisted state and runs to completion; there is no
//! in-process state between calls.

pub mod correlator;
pub mod registrar;

pub use correlator::*;
pub use registrar::*;
