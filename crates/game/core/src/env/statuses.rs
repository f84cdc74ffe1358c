use bitflags::bitflags;

use crate::state::StatusId;

pub trait StatusOracle: Send + Sync {
    fn status(&self, id: StatusId) -> Option<&StatusTemplate>;
}

/// What happens when a status is applied to an entity that already carries it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StackingPolicy {
    /// Reset remaining duration to the template default.
    Refresh,
    /// Add one stack up to `max_stacks`; duration unchanged.
    Stack,
    /// Keep the existing instance untouched.
    Ignore,
}

bitflags! {
    /// Behavioral traits of a status template.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct StatusFlags: u8 {
        /// The afflicted entity skips its turns (stun).
        const PREVENTS_ACTION = 1 << 0;
        /// Harmful effect; used by AI heuristics.
        const DEBUFF          = 1 << 1;
    }
}

/// Change applied at the start of each of the afflicted entity's turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeriodicEffect {
    /// Health loss per stack, not reduced by defense.
    Damage(u32),
    /// Health gain per stack.
    Heal(u32),
}

/// Immutable status template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTemplate {
    pub id: StatusId,
    pub name: String,
    /// Default duration in turns. Always greater than 0.
    pub duration: u16,
    pub stacking: StackingPolicy,
    /// Stack cap for [`StackingPolicy::Stack`]. Always at least 1.
    #[cfg_attr(feature = "serde", serde(default = "default_max_stacks"))]
    pub max_stacks: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: StatusFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub periodic: Option<PeriodicEffect>,
    /// Defense change per stack while active.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense_modifier: i32,
}

#[cfg(feature = "serde")]
fn default_max_stacks() -> u8 {
    1
}

impl StatusTemplate {
    pub fn prevents_action(&self) -> bool {
        self.flags.contains(StatusFlags::PREVENTS_ACTION)
    }
}
