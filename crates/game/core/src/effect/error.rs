use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, StatusId};

/// Errors raised while resolving an effect. Nothing is mutated when one occurs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("effect requires a target")]
    MissingTarget,

    #[error("{0} is not a living enemy of the source")]
    InvalidTarget(EntityId),

    #[error("no living enemies to target")]
    NoLivingEnemies,

    #[error("source {0} is not a participant")]
    UnknownSource(EntityId),

    #[error("unknown status {0}")]
    UnknownStatus(StatusId),
}

impl ResolveError {
    /// True for the target-selection failures callers surface as `InvalidTarget`.
    pub fn is_target_error(&self) -> bool {
        matches!(
            self,
            Self::MissingTarget | Self::InvalidTarget(_) | Self::NoLivingEnemies
        )
    }
}

impl GameError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingTarget | Self::InvalidTarget(_) | Self::NoLivingEnemies => {
                ErrorSeverity::Recoverable
            }
            Self::UnknownSource(_) | Self::UnknownStatus(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingTarget => "RESOLVE_MISSING_TARGET",
            Self::InvalidTarget(_) => "RESOLVE_INVALID_TARGET",
            Self::NoLivingEnemies => "RESOLVE_NO_LIVING_ENEMIES",
            Self::UnknownSource(_) => "RESOLVE_UNKNOWN_SOURCE",
            Self::UnknownStatus(_) => "RESOLVE_UNKNOWN_STATUS",
        }
    }
}
