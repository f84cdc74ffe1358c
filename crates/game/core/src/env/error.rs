use crate::error::{ErrorSeverity, GameError};
use crate::state::{EffectId, ItemId, OpponentTemplateId, SkillId, StatusId};

/// A content reference could not be resolved through the oracles.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),

    #[error("unknown effect {0}")]
    UnknownEffect(EffectId),

    #[error("unknown status {0}")]
    UnknownStatus(StatusId),

    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    #[error("unknown opponent template {0}")]
    UnknownOpponent(OpponentTemplateId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSkill(_) => "ORACLE_UNKNOWN_SKILL",
            Self::UnknownEffect(_) => "ORACLE_UNKNOWN_EFFECT",
            Self::UnknownStatus(_) => "ORACLE_UNKNOWN_STATUS",
            Self::UnknownItem(_) => "ORACLE_UNKNOWN_ITEM",
            Self::UnknownOpponent(_) => "ORACLE_UNKNOWN_OPPONENT",
        }
    }
}
