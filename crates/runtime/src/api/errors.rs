//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the state machine, repositories, content loading, and
//! player input so clients can bubble them up with consistent context.

use game_core::{ErrorSeverity, GameError, MachineError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Machine(#[from] MachineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to load content: {0}")]
    Content(String),

    #[error("player input closed")]
    InputClosed,

    #[error("player input failed: {0}")]
    Input(String),
}

impl RuntimeError {
    /// Severity of the underlying game error, if any.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Machine(error) => error.severity(),
            Self::Repository(error) if error.is_corruption() => ErrorSeverity::Fatal,
            Self::Repository(_) | Self::Content(_) => ErrorSeverity::Internal,
            Self::InputClosed | Self::Input(_) => ErrorSeverity::Validation,
        }
    }

    /// True if the caller may simply retry with different input.
    pub fn is_recoverable(&self) -> bool {
        self.severity().is_recoverable()
    }
}
