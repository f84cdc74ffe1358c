//! In-memory content catalog backing every oracle.

use std::collections::BTreeMap;

use crate::effect::EffectDefinition;
use crate::state::{EffectId, ItemId, OpponentTemplateId, SkillId, StatusId};

use super::{
    EffectOracle, ItemDefinition, ItemOracle, OpponentOracle, OpponentTemplate, SkillDefinition,
    SkillOracle, StatusOracle, StatusTemplate,
};

/// Immutable content tables keyed by id.
///
/// Built once at startup (usually by the content loader) and shared read-only
/// afterwards. Cross-references are not checked here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentCatalog {
    pub skills: BTreeMap<SkillId, SkillDefinition>,
    pub effects: BTreeMap<EffectId, EffectDefinition>,
    pub statuses: BTreeMap<StatusId, StatusTemplate>,
    pub items: BTreeMap<ItemId, ItemDefinition>,
    pub opponents: BTreeMap<OpponentTemplateId, OpponentTemplate>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, skill: SkillDefinition) -> Self {
        self.skills.insert(skill.id, skill);
        self
    }

    pub fn with_effect(mut self, effect: EffectDefinition) -> Self {
        self.effects.insert(effect.id, effect);
        self
    }

    pub fn with_status(mut self, status: StatusTemplate) -> Self {
        self.statuses.insert(status.id, status);
        self
    }

    pub fn with_item(mut self, item: ItemDefinition) -> Self {
        self.items.insert(item.id, item);
        self
    }

    pub fn with_opponent(mut self, opponent: OpponentTemplate) -> Self {
        self.opponents.insert(opponent.id, opponent);
        self
    }
}

impl SkillOracle for ContentCatalog {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }
}

impl EffectOracle for ContentCatalog {
    fn effect(&self, id: EffectId) -> Option<&EffectDefinition> {
        self.effects.get(&id)
    }
}

impl StatusOracle for ContentCatalog {
    fn status(&self, id: StatusId) -> Option<&StatusTemplate> {
        self.statuses.get(&id)
    }
}

impl ItemOracle for ContentCatalog {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(&id)
    }
}

impl OpponentOracle for ContentCatalog {
    fn template(&self, id: OpponentTemplateId) -> Option<&OpponentTemplate> {
        self.opponents.get(&id)
    }
}
