use crate::state::{EffectId, SkillId};

/// Which participants a skill or effect may address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetingMode {
    /// The acting entity itself.
    SelfOnly,
    /// One living enemy chosen by the actor.
    SingleEnemy,
    /// Every living enemy at resolution time.
    AllEnemies,
}

impl TargetingMode {
    /// True when the actor must name a target.
    pub const fn needs_target(self) -> bool {
        matches!(self, Self::SingleEnemy)
    }
}

/// Immutable skill definition shared by every entity that knows it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    /// Resource spent on use.
    pub cost: u32,
    /// Turns before the skill can be used again.
    pub cooldown: u32,
    pub effect: EffectId,
    pub targeting: TargetingMode,
}

pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition>;
}
