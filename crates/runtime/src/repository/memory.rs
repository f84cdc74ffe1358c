//! In-memory SnapshotRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use game_core::GameState;

use crate::repository::{RepositoryError, Result, SnapshotRepository};

/// In-memory implementation of SnapshotRepository.
///
/// Snapshots are kept decoded; validation happens when they are resumed.
#[derive(Default)]
pub struct InMemorySnapshotRepo {
    states: RwLock<BTreeMap<u64, GameState>>,
}

impl InMemorySnapshotRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.states.read().map(|states| states.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotRepository for InMemorySnapshotRepo {
    fn save(&self, sequence: u64, state: &GameState) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.insert(sequence, state.clone());
        Ok(())
    }

    fn load(&self, sequence: u64) -> Result<Option<GameState>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.get(&sequence).cloned())
    }

    fn exists(&self, sequence: u64) -> bool {
        self.states
            .read()
            .map(|states| states.contains_key(&sequence))
            .unwrap_or(false)
    }

    fn delete(&self, sequence: u64) -> Result<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        states.remove(&sequence);
        Ok(())
    }

    fn list_sequences(&self) -> Result<Vec<u64>> {
        let states = self
            .states
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(states.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Phase, Player, StartingPlayer};

    fn state(sequence: u64, phase: Phase) -> GameState {
        let mut state = GameState::new(Player::from_template(&StartingPlayer::default()));
        state.sequence = sequence;
        state.phase = phase;
        state
    }

    #[test]
    fn latest_in_phase_skips_newer_phases() {
        let repo = InMemorySnapshotRepo::new();
        repo.save(0, &state(0, Phase::Exploration)).unwrap();
        repo.save(1, &state(1, Phase::Exploration)).unwrap();
        repo.save(2, &state(2, Phase::GameOver)).unwrap();

        let (sequence, latest) = repo.latest().unwrap().unwrap();
        assert_eq!(sequence, 2);
        assert_eq!(latest.phase, Phase::GameOver);

        let (sequence, _) = repo.latest_in_phase(Phase::Exploration).unwrap().unwrap();
        assert_eq!(sequence, 1);
        assert!(repo.latest_in_phase(Phase::Victory).unwrap().is_none());
    }

    #[test]
    fn delete_removes_snapshot() {
        let repo = InMemorySnapshotRepo::new();
        repo.save(3, &state(3, Phase::Exploration)).unwrap();
        assert!(repo.exists(3));
        repo.delete(3).unwrap();
        assert!(!repo.exists(3));
        assert!(repo.is_empty());
        assert!(repo.latest().unwrap().is_none());
    }
}
