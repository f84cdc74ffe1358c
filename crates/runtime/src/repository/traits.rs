//! Repository contract for saving and loading resting game snapshots.

use game_core::{GameState, Phase};

use super::Result;

/// Repository for game state persistence and loading.
///
/// Snapshots are keyed by [`GameState::sequence`], which increases with every
/// phase transition, so the highest key is always the most recent save.
/// Only resting phases are ever stored.
pub trait SnapshotRepository: Send + Sync {
    /// Save a snapshot under `sequence`, replacing any previous one.
    fn save(&self, sequence: u64, state: &GameState) -> Result<()>;

    /// Load a snapshot by sequence.
    fn load(&self, sequence: u64) -> Result<Option<GameState>>;

    /// Check if a snapshot exists.
    fn exists(&self, sequence: u64) -> bool;

    /// Delete a snapshot.
    fn delete(&self, sequence: u64) -> Result<()>;

    /// List all stored sequences in ascending order.
    fn list_sequences(&self) -> Result<Vec<u64>>;

    /// Load the most recent snapshot.
    fn latest(&self) -> Result<Option<(u64, GameState)>> {
        let Some(&sequence) = self.list_sequences()?.last() else {
            return Ok(None);
        };
        Ok(self.load(sequence)?.map(|state| (sequence, state)))
    }

    /// Load the most recent snapshot taken in `phase`.
    ///
    /// Corrupt snapshots are skipped; I/O failures still abort the scan.
    fn latest_in_phase(&self, phase: Phase) -> Result<Option<(u64, GameState)>> {
        for sequence in self.list_sequences()?.into_iter().rev() {
            let state = match self.load(sequence) {
                Ok(Some(state)) => state,
                Ok(None) => continue,
                Err(error) if error.is_corruption() => {
                    tracing::warn!(sequence, %error, "Skipping corrupt snapshot");
                    continue;
                }
                Err(error) => return Err(error),
            };
            if state.phase == phase {
                return Ok(Some((sequence, state)));
            }
        }
        Ok(None)
    }
}
