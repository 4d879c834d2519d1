//! sigreg Store
//!
//! Filesystem persistence for the registry:
//! - Atomic JSON writes (temp file + rename)
//! - Signal Index repository (read / modify / write)
//! - Vector Store (one numeric array per signal)
//! - Per-signal record store
//!
//! No locking is done here. Concurrent writers racing on the same index
//! lose updates (last writer wins); callers serialize registrations.

pub mod files;
pub mod index_repo;
pub mod records;
pub mod vectors;

pub use files::*;
pub use index_repo::*;
pub use records::*;
pub use vectors::*;
