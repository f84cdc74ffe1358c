//! Snapshot validation errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{ItemId, StatusId};

/// Invariant violations detected when validating a persisted [`super::GameState`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot was taken mid-encounter")]
    MidEncounter,

    #[error("player level must be at least 1")]
    InvalidLevel,

    #[error("health {current} exceeds maximum {maximum}")]
    HealthOutOfBounds { current: u32, maximum: u32 },

    #[error("resource {current} exceeds maximum {maximum}")]
    ResourceOutOfBounds { current: u32, maximum: u32 },

    #[error("defeated player stored in exploration phase")]
    DefeatedInExploration,

    #[error("inventory slot for {item} is empty")]
    EmptySlot { item: ItemId },

    #[error("inventory holds more than one slot for {item}")]
    DuplicateSlot { item: ItemId },

    #[error("{status} stored with zero duration or stacks")]
    ExpiredStatus { status: StatusId },

    #[error("snapshot could not be decoded: {0}")]
    Decode(String),
}

impl GameError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MidEncounter => "SNAPSHOT_MID_ENCOUNTER",
            Self::InvalidLevel => "SNAPSHOT_INVALID_LEVEL",
            Self::HealthOutOfBounds { .. } => "SNAPSHOT_HEALTH_OUT_OF_BOUNDS",
            Self::ResourceOutOfBounds { .. } => "SNAPSHOT_RESOURCE_OUT_OF_BOUNDS",
            Self::DefeatedInExploration => "SNAPSHOT_DEFEATED_IN_EXPLORATION",
            Self::EmptySlot { .. } => "SNAPSHOT_EMPTY_SLOT",
            Self::DuplicateSlot { .. } => "SNAPSHOT_DUPLICATE_SLOT",
            Self::ExpiredStatus { .. } => "SNAPSHOT_EXPIRED_STATUS",
            Self::Decode(_) => "SNAPSHOT_DECODE",
        }
    }
}
