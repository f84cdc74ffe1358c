//! Deterministic snapshot encoding.
//!
//! Requires the `serde` feature. The same bytes are produced for equal states,
//! so the digest doubles as an integrity check for persisted saves.

use super::GameState;
use super::error::SnapshotError;

impl GameState {
    /// Encodes the state with bincode.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    /// Decodes and validates a state produced by [`GameState::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let state: GameState =
            bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }

    /// SHA-256 digest of the encoded state.
    pub fn digest(&self) -> Result<[u8; 32], SnapshotError> {
        Ok(digest_bytes(&self.encode()?))
    }
}

/// SHA-256 over raw snapshot bytes.
pub fn digest_bytes(bytes: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}
