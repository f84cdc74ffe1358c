//! File-based SnapshotRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use game_core::GameState;
use game_core::state::digest_bytes;
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, Result, SnapshotRepository};

/// Current on-disk envelope format.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// On-disk wrapper around an encoded [`GameState`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    checksum: [u8; 32],
    payload: Vec<u8>,
}

/// File-based implementation of SnapshotRepository.
///
/// # File Format
///
/// Snapshots are stored as `state_{sequence}.bin`, each a bincode
/// [`SnapshotEnvelope`] holding the format version, the SHA-256 of the
/// payload, and the bincode-encoded state. Writes go to a temp file first and
/// are renamed into place, so a crash never leaves a half-written snapshot.
pub struct FileSnapshotRepository {
    base_dir: PathBuf,
}

impl FileSnapshotRepository {
    /// Create a new file-based snapshot repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to a snapshot file.
    pub fn state_path(&self, sequence: u64) -> PathBuf {
        self.base_dir.join(format!("state_{}.bin", sequence))
    }

    fn decode(sequence: u64, bytes: &[u8]) -> Result<GameState> {
        let envelope: SnapshotEnvelope =
            bincode::deserialize(bytes).map_err(|e| RepositoryError::CorruptedData {
                sequence,
                reason: e.to_string(),
            })?;

        if envelope.version != SNAPSHOT_FORMAT_VERSION {
            return Err(RepositoryError::UnsupportedVersion {
                sequence,
                found: envelope.version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        let actual = digest_bytes(&envelope.payload);
        if actual != envelope.checksum {
            return Err(RepositoryError::ChecksumMismatch {
                sequence,
                expected: hex::encode(envelope.checksum),
                actual: hex::encode(actual),
            });
        }

        GameState::decode(&envelope.payload)
            .map_err(|source| RepositoryError::InvalidSnapshot { sequence, source })
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, sequence: u64, state: &GameState) -> Result<()> {
        let path = self.state_path(sequence);
        let temp_path = path.with_extension("bin.tmp");

        let payload = state
            .encode()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_FORMAT_VERSION,
            checksum: digest_bytes(&payload),
            payload,
        };
        let bytes = bincode::serialize(&envelope)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes).map_err(RepositoryError::Io)?;
        fs::rename(&temp_path, &path).map_err(RepositoryError::Io)?;

        tracing::debug!(
            sequence,
            checksum = %hex::encode(envelope.checksum),
            "Saved snapshot to {}",
            path.display()
        );

        Ok(())
    }

    fn load(&self, sequence: u64) -> Result<Option<GameState>> {
        let path = self.state_path(sequence);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let state = Self::decode(sequence, &bytes)?;

        tracing::debug!(sequence, "Loaded snapshot from {}", path.display());

        Ok(Some(state))
    }

    fn exists(&self, sequence: u64) -> bool {
        self.state_path(sequence).exists()
    }

    fn delete(&self, sequence: u64) -> Result<()> {
        let path = self.state_path(sequence);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!(sequence, "Deleted snapshot");
        }

        Ok(())
    }

    fn list_sequences(&self) -> Result<Vec<u64>> {
        let mut sequences = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(sequence_str) = filename
                    .strip_prefix("state_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && let Ok(sequence) = sequence_str.parse::<u64>()
            {
                sequences.push(sequence);
            }
        }

        sequences.sort_unstable();
        Ok(sequences)
    }
}
