use crate::combat::AiPolicy;
use crate::state::{ItemId, OpponentTemplateId, SkillId};

pub trait OpponentOracle: Send + Sync {
    fn template(&self, id: OpponentTemplateId) -> Option<&OpponentTemplate>;
}

/// Items granted on victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDrop {
    pub item: ItemId,
    pub count: u32,
}

/// Template from which encounter opponents are instantiated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpponentTemplate {
    pub id: OpponentTemplateId,
    pub name: String,
    pub max_health: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_resource: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: u32,
    pub speed: u32,
    pub skills: Vec<SkillId>,
    pub policy: AiPolicy,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: bool,
    /// Experience granted when the encounter is won.
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drops: Vec<ItemDrop>,
    /// Progress flags set to `true` when the encounter is won.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants_flags: Vec<String>,
}
