//! Error types raised by repository implementations.

use game_core::SnapshotError;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("snapshot repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted data in snapshot {sequence}: {reason}")]
    CorruptedData { sequence: u64, reason: String },

    #[error("snapshot {sequence} checksum mismatch: expected {expected}, found {actual}")]
    ChecksumMismatch {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("snapshot {sequence} has format version {found}, expected {expected}")]
    UnsupportedVersion {
        sequence: u64,
        found: u32,
        expected: u32,
    },

    #[error("snapshot {sequence} failed validation: {source}")]
    InvalidSnapshot {
        sequence: u64,
        #[source]
        source: SnapshotError,
    },
}

impl RepositoryError {
    /// True if the stored bytes are unusable, as opposed to an I/O failure.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::CorruptedData { .. }
                | Self::ChecksumMismatch { .. }
                | Self::UnsupportedVersion { .. }
                | Self::InvalidSnapshot { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
