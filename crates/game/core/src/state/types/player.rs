use std::collections::BTreeSet;

use super::{
    BoardPosition, EntityId, InventoryState, ResourceMeter, SkillId, StatusEffects,
};
use crate::config::StartingPlayer;

/// The controllable player character.
///
/// Health, resource and statuses change only through combat results written
/// back by the state machine; level, experience and inventory change only
/// through progression in the exploration phase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub level: u32,
    /// Experience accumulated towards the next level.
    pub experience: u32,
    pub health: ResourceMeter,
    pub resource: ResourceMeter,
    /// Base defense before equipment and status modifiers.
    pub defense: u32,
    /// Base speed before equipment bonuses.
    pub speed: u32,
    pub inventory: InventoryState,
    pub known_skills: BTreeSet<SkillId>,
    pub status_effects: StatusEffects,
    pub position: BoardPosition,
}

impl Player {
    /// Creates a level 1 player with full health and resource.
    ///
    /// Starting items are not granted here; the state machine adds them so
    /// that stack limits from the item catalog apply.
    pub fn from_template(template: &StartingPlayer) -> Self {
        Self {
            id: EntityId::PLAYER,
            name: template.name.clone(),
            level: 1,
            experience: 0,
            health: ResourceMeter::full(template.max_health),
            resource: ResourceMeter::full(template.max_resource),
            defense: template.defense,
            speed: template.speed,
            inventory: InventoryState::empty(),
            known_skills: template.skills.iter().copied().collect(),
            status_effects: StatusEffects::empty(),
            position: template.position,
        }
    }

    /// Quick check if the player is still standing.
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    pub fn knows(&self, skill: SkillId) -> bool {
        self.known_skills.contains(&skill)
    }
}
