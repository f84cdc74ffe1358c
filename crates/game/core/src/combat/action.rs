use crate::state::{EntityId, ItemId, SkillId};

/// An action chosen during action selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    /// Use a known skill. `target` is required for single-enemy skills.
    UseSkill {
        skill: SkillId,
        target: Option<EntityId>,
    },
    /// Consume one unit of a held consumable.
    UseItem {
        item: ItemId,
        target: Option<EntityId>,
    },
    /// Leave the encounter. Always succeeds.
    Flee,
    /// Pass the turn.
    Wait,
}

impl CombatAction {
    pub fn skill(skill: SkillId, target: Option<EntityId>) -> Self {
        Self::UseSkill { skill, target }
    }

    pub fn item(item: ItemId, target: Option<EntityId>) -> Self {
        Self::UseItem { item, target }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UseSkill { .. } => "use_skill",
            Self::UseItem { .. } => "use_item",
            Self::Flee => "flee",
            Self::Wait => "wait",
        }
    }
}
