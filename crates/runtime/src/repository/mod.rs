//! Repository layer for dynamic runtime data.
//!
//! Repositories hold the resting snapshots written at every phase transition.
//! Static game content (skills, items, opponents) is handled by oracles, not
//! repositories.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::{FileSnapshotRepository, SNAPSHOT_FORMAT_VERSION};
pub use memory::InMemorySnapshotRepo;
pub use traits::SnapshotRepository;
