//! State machine and progression errors.

use crate::combat::CombatError;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{InventoryError, ItemId, Phase, SnapshotError};

use super::PhaseTransition;

/// Errors raised by exploration-phase progression operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error("{0} is not equipment")]
    NotEquipment(ItemId),

    #[error("{0} cannot be used")]
    NotUsable(ItemId),

    #[error("{0} cannot be used outside combat")]
    NotSelfTargeted(ItemId),
}

impl GameError for ProgressionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Oracle(_) => ErrorSeverity::Validation,
            Self::Inventory(_)
            | Self::NotEquipment(_)
            | Self::NotUsable(_)
            | Self::NotSelfTargeted(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Oracle(_) => "PROGRESSION_ORACLE",
            Self::Inventory(_) => "PROGRESSION_INVENTORY",
            Self::NotEquipment(_) => "PROGRESSION_NOT_EQUIPMENT",
            Self::NotUsable(_) => "PROGRESSION_NOT_USABLE",
            Self::NotSelfTargeted(_) => "PROGRESSION_NOT_SELF_TARGETED",
        }
    }
}

/// Errors surfaced by the game state machine.
#[derive(Clone, Debug, thiserror::Error)]
pub enum MachineError {
    #[error("operation requires the {expected} phase, current phase is {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("no encounter in progress")]
    NoEncounter,

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(#[from] SnapshotError),

    /// The encounter hit a fatal error. The machine is back in exploration
    /// with the pre-encounter state carried by `transition`.
    #[error("encounter aborted: {source}")]
    EncounterAborted {
        source: CombatError,
        transition: Box<PhaseTransition>,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl MachineError {
    /// The recovery transition for an aborted encounter.
    pub fn transition(&self) -> Option<&PhaseTransition> {
        match self {
            Self::EncounterAborted { transition, .. } => Some(transition),
            _ => None,
        }
    }
}

impl GameError for MachineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. } | Self::NoEncounter => ErrorSeverity::Validation,
            Self::Combat(error) => error.severity(),
            Self::Progression(error) => error.severity(),
            Self::CorruptSnapshot(_) | Self::EncounterAborted { .. } => ErrorSeverity::Fatal,
            Self::Oracle(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "MACHINE_WRONG_PHASE",
            Self::NoEncounter => "MACHINE_NO_ENCOUNTER",
            Self::Combat(error) => error.error_code(),
            Self::Progression(error) => error.error_code(),
            Self::CorruptSnapshot(error) => error.error_code(),
            Self::EncounterAborted { .. } => "MACHINE_ENCOUNTER_ABORTED",
            Self::Oracle(_) => "MACHINE_ORACLE",
        }
    }
}
