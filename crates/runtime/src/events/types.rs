//! Event payloads published by the runtime.

use game_core::{Outcome, Phase};
use serde::{Deserialize, Serialize};

/// Session lifecycle events: phase changes and persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// The state machine moved between phases.
    Changed { from: Phase, to: Phase, sequence: u64 },

    /// A resting snapshot was written to the repository.
    SnapshotSaved { sequence: u64, phase: Phase },

    /// An encounter ended with the given outcome.
    EncounterFinished { outcome: Outcome },

    /// An encounter hit a fatal error and was rolled back to its checkpoint.
    EncounterAborted { reason: String, sequence: u64 },

    /// A persisted save could not be resumed; a new game was started instead.
    SaveDiscarded { reason: String },
}
