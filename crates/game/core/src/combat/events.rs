use crate::effect::{Delta, DeltaKind};
use crate::state::{EntityId, StatusId};

use super::{CombatAction, Outcome, Rewards};

/// Why an entity's turn was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    Stunned,
    Defeated,
}

/// Ordered notifications produced by each combat step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    TurnStarted {
        actor: EntityId,
        turn: u32,
        round: u32,
    },
    TurnSkipped {
        actor: EntityId,
        reason: SkipReason,
    },
    ActionPerformed {
        actor: EntityId,
        action: CombatAction,
    },
    Damaged {
        source: EntityId,
        target: EntityId,
        amount: u32,
    },
    Healed {
        source: EntityId,
        target: EntityId,
        amount: u32,
    },
    ResourceChanged {
        source: EntityId,
        target: EntityId,
        amount: i32,
    },
    StatusApplied {
        source: EntityId,
        target: EntityId,
        status: StatusId,
        stacks: u8,
        remaining: u16,
    },
    StatusRemoved {
        target: EntityId,
        status: StatusId,
    },
    StatusExpired {
        target: EntityId,
        status: StatusId,
    },
    Defeated {
        entity: EntityId,
    },
    TurnEnded {
        actor: EntityId,
    },
    EncounterConcluded {
        outcome: Outcome,
        rewards: Option<Rewards>,
    },
}

impl CombatEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TurnStarted { .. } => "turn_started",
            Self::TurnSkipped { .. } => "turn_skipped",
            Self::ActionPerformed { .. } => "action_performed",
            Self::Damaged { .. } => "damaged",
            Self::Healed { .. } => "healed",
            Self::ResourceChanged { .. } => "resource_changed",
            Self::StatusApplied { .. } => "status_applied",
            Self::StatusRemoved { .. } => "status_removed",
            Self::StatusExpired { .. } => "status_expired",
            Self::Defeated { .. } => "defeated",
            Self::TurnEnded { .. } => "turn_ended",
            Self::EncounterConcluded { .. } => "encounter_concluded",
        }
    }
}

impl From<&Delta> for CombatEvent {
    fn from(delta: &Delta) -> Self {
        let Delta {
            source,
            target,
            change,
        } = *delta;
        match change {
            DeltaKind::Health(amount) if amount < 0 => Self::Damaged {
                source,
                target,
                amount: amount.unsigned_abs(),
            },
            DeltaKind::Health(amount) => Self::Healed {
                source,
                target,
                amount: amount.unsigned_abs(),
            },
            DeltaKind::Resource(amount) => Self::ResourceChanged {
                source,
                target,
                amount,
            },
            DeltaKind::StatusApplied {
                status,
                stacks,
                remaining,
            } => Self::StatusApplied {
                source,
                target,
                status,
                stacks,
                remaining,
            },
            DeltaKind::StatusRemoved { status } => Self::StatusRemoved { target, status },
        }
    }
}
