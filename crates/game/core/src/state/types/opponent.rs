use super::{EntityId, OpponentTemplateId, ResourceMeter, SkillId};
use crate::combat::AiPolicy;
use crate::env::OpponentTemplate;

/// An opponent instantiated from a template for a single encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Opponent {
    pub id: EntityId,
    pub template: OpponentTemplateId,
    /// Archetype name from the template.
    pub archetype: String,
    pub health: ResourceMeter,
    pub resource: ResourceMeter,
    pub defense: u32,
    pub speed: u32,
    pub skill_pool: Vec<SkillId>,
    pub policy: AiPolicy,
    /// Bosses cannot be fled from.
    pub boss: bool,
}

impl Opponent {
    pub fn from_template(id: EntityId, template: &OpponentTemplate) -> Self {
        Self {
            id,
            template: template.id,
            archetype: template.name.clone(),
            health: ResourceMeter::full(template.max_health),
            resource: ResourceMeter::full(template.max_resource),
            defense: template.defense,
            speed: template.speed,
            skill_pool: template.skills.clone(),
            policy: template.policy,
            boss: template.boss,
        }
    }
}
