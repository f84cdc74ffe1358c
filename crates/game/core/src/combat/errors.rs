//! Combat engine errors.

use crate::effect::ResolveError;
use crate::env::OracleError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{EntityId, ItemId, SkillId};

/// Reason an action was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IllegalAction {
    #[error("it is not the player's turn")]
    NotPlayerTurn,

    #[error("the encounter is over")]
    EncounterConcluded,

    #[error("an encounter needs at least one opponent")]
    NoOpponents,

    #[error("too many opponents ({0})")]
    TooManyOpponents(usize),

    #[error("{0} is not known")]
    SkillNotKnown(SkillId),

    #[error("{skill} is on cooldown for {remaining} more turn(s)")]
    OnCooldown { skill: SkillId, remaining: u32 },

    #[error("{0} is not held")]
    ItemNotHeld(ItemId),

    #[error("{0} cannot be used")]
    ItemNotUsable(ItemId),

    #[error("{0} cannot use items")]
    NoInventory(EntityId),
}

/// Errors surfaced by the combat engine.
///
/// Every variant except `InvariantViolation` is raised before any mutation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("illegal action: {reason}")]
    IllegalAction {
        reason: IllegalAction,
        context: ErrorContext,
    },

    #[error("insufficient resource: requires {required}, has {available}")]
    InsufficientResource {
        required: u32,
        available: u32,
        context: ErrorContext,
    },

    #[error("invalid target: {source}")]
    InvalidTarget {
        source: ResolveError,
        context: ErrorContext,
    },

    #[error("invariant violated: {reason}")]
    InvariantViolation {
        reason: String,
        context: ErrorContext,
    },

    #[error("content lookup failed: {0}")]
    Oracle(#[from] OracleError),
}

impl CombatError {
    pub fn illegal(reason: IllegalAction, context: ErrorContext) -> Self {
        Self::IllegalAction { reason, context }
    }

    pub fn invariant(reason: impl Into<String>, context: ErrorContext) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
            context,
        }
    }

    pub(crate) fn from_resolve(error: ResolveError, context: ErrorContext) -> Self {
        match error {
            ResolveError::UnknownStatus(status) => OracleError::UnknownStatus(status).into(),
            ResolveError::UnknownSource(source) => Self::invariant(
                format!("actor {source} is not a participant"),
                context,
            ),
            error => Self::InvalidTarget {
                source: error,
                context,
            },
        }
    }

    /// True when the encounter cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self.severity(), ErrorSeverity::Fatal)
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::IllegalAction { .. }
            | Self::InsufficientResource { .. }
            | Self::InvalidTarget { .. } => ErrorSeverity::Recoverable,
            Self::Oracle(_) => ErrorSeverity::Internal,
            Self::InvariantViolation { .. } => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::IllegalAction { context, .. }
            | Self::InsufficientResource { context, .. }
            | Self::InvalidTarget { context, .. }
            | Self::InvariantViolation { context, .. } => Some(context),
            Self::Oracle(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::IllegalAction { .. } => "COMBAT_ILLEGAL_ACTION",
            Self::InsufficientResource { .. } => "COMBAT_INSUFFICIENT_RESOURCE",
            Self::InvalidTarget { .. } => "COMBAT_INVALID_TARGET",
            Self::InvariantViolation { .. } => "COMBAT_INVARIANT_VIOLATION",
            Self::Oracle(_) => "COMBAT_ORACLE",
        }
    }
}
