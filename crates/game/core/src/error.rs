//! Error classification shared by every game-core error enum.
//!
//! Each module keeps its own error type next to the operation that raises it
//! (`ResolveError` beside the resolver, `CombatError` beside the engine). All
//! of them report an [`ErrorSeverity`] so callers can decide between
//! re-prompting the player and aborting the encounter.
//!
//! Recoverable errors are always raised before any state is touched.

use crate::state::EntityId;

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Bad player choice; ask again. Skill on cooldown, not enough resource.
    Recoverable,

    /// Request that can never succeed as issued: unknown id, wrong phase.
    Validation,

    /// Content or state disagree with each other, e.g. a dangling catalog id.
    Internal,

    /// State is broken. The encounter is rolled back or the save discarded.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Internal and fatal errors both abort the running encounter.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where in an encounter an error was raised.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    pub actor: Option<EntityId>,

    pub turn: u32,

    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(turn: u32) -> Self {
        Self {
            actor: None,
            turn,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Implemented by every error enum in game-core.
///
/// Severity follows what the caller can do about the error, not how bad the
/// consequences look.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier used in log fields. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
