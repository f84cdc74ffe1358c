use crate::state::{EntityId, StatusId};

/// One attribute change produced by resolving an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    pub source: EntityId,
    pub target: EntityId,
    pub change: DeltaKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeltaKind {
    /// Signed health change, already clamped to the target's bounds.
    Health(i32),
    /// Signed resource change, already clamped to the target's bounds.
    Resource(i32),
    /// Status instance inserted or replaced with these values.
    StatusApplied {
        status: StatusId,
        stacks: u8,
        remaining: u16,
    },
    StatusRemoved { status: StatusId },
}

impl Delta {
    pub fn new(source: EntityId, target: EntityId, change: DeltaKind) -> Self {
        Self {
            source,
            target,
            change,
        }
    }
}
