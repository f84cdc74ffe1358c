use std::collections::BTreeMap;

use crate::effect::{Delta, DeltaKind};
use crate::env::{GameEnv, OracleError, StatusOracle};
use crate::state::{
    EntityId, Opponent, OpponentTemplateId, Player, ResourceMeter, SkillId, StatusEffect,
    StatusEffects,
};

use super::AiPolicy;

/// Which team a participant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

/// Encounter-local view of a participant.
///
/// Built from the player or an opponent when the encounter starts. Equipment
/// bonuses are folded into `defense` and `speed` at that point.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub side: Side,
    pub health: ResourceMeter,
    pub resource: ResourceMeter,
    /// Defense before status modifiers.
    pub defense: u32,
    pub speed: u32,
    pub skills: Vec<SkillId>,
    /// Remaining cooldown per skill. Absent means ready.
    pub cooldowns: BTreeMap<SkillId, u32>,
    pub statuses: StatusEffects,
    /// `None` for the player, who acts through external input.
    pub policy: Option<AiPolicy>,
    pub template: Option<OpponentTemplateId>,
    pub boss: bool,
}

impl Combatant {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        side: Side,
        health: ResourceMeter,
        resource: ResourceMeter,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            health,
            resource,
            defense: 0,
            speed: 0,
            skills: Vec::new(),
            cooldowns: BTreeMap::new(),
            statuses: StatusEffects::empty(),
            policy: None,
            template: None,
            boss: false,
        }
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_skills(mut self, skills: Vec<SkillId>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_policy(mut self, policy: AiPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Builds the player's combatant, applying bonuses from equipped items.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::UnknownItem` if an equipped item has no definition.
    pub fn from_player(player: &Player, env: &GameEnv<'_>) -> Result<Self, OracleError> {
        let mut defense = i64::from(player.defense);
        let mut speed = i64::from(player.speed);
        for slot in player.inventory.equipped() {
            if let Some(bonus) = env.item(slot.item)?.equipment_bonus() {
                defense += i64::from(bonus.defense);
                speed += i64::from(bonus.speed);
            }
        }

        let mut combatant = Self::new(
            player.id,
            player.name.clone(),
            Side::Player,
            player.health,
            player.resource,
        )
        .with_defense(clamp_u32(defense))
        .with_speed(clamp_u32(speed))
        .with_skills(player.known_skills.iter().copied().collect());
        combatant.statuses = player.status_effects.clone();
        Ok(combatant)
    }

    pub fn from_opponent(opponent: &Opponent) -> Self {
        let mut combatant = Self::new(
            opponent.id,
            opponent.archetype.clone(),
            Side::Opponent,
            opponent.health,
            opponent.resource,
        )
        .with_defense(opponent.defense)
        .with_speed(opponent.speed)
        .with_skills(opponent.skill_pool.clone())
        .with_policy(opponent.policy);
        combatant.template = Some(opponent.template);
        combatant.boss = opponent.boss;
        combatant
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    #[inline]
    pub fn is_enemy_of(&self, other: &Combatant) -> bool {
        self.side != other.side
    }

    /// Defense including status modifiers, floored at 0.
    pub fn effective_defense(&self, statuses: &dyn StatusOracle) -> u32 {
        let modifier: i64 = self
            .statuses
            .iter()
            .filter_map(|instance| {
                statuses
                    .status(instance.status)
                    .map(|t| i64::from(t.defense_modifier) * i64::from(instance.stacks))
            })
            .sum();
        clamp_u32(i64::from(self.defense) + modifier)
    }

    /// True if any active status prevents acting.
    pub fn is_stunned(&self, statuses: &dyn StatusOracle) -> bool {
        self.statuses.iter().any(|instance| {
            statuses
                .status(instance.status)
                .is_some_and(|t| t.prevents_action())
        })
    }

    pub fn knows(&self, skill: SkillId) -> bool {
        self.skills.contains(&skill)
    }

    pub fn cooldown(&self, skill: SkillId) -> u32 {
        self.cooldowns.get(&skill).copied().unwrap_or(0)
    }

    pub fn start_cooldown(&mut self, skill: SkillId, turns: u32) {
        if turns > 0 {
            self.cooldowns.insert(skill, turns);
        }
    }

    /// Decrements every cooldown by one turn.
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    /// Applies a resolved delta addressed to this combatant.
    pub fn apply(&mut self, delta: &Delta) {
        debug_assert_eq!(delta.target, self.id);
        match delta.change {
            DeltaKind::Health(amount) => {
                self.health.apply(i64::from(amount));
            }
            DeltaKind::Resource(amount) => {
                self.resource.apply(i64::from(amount));
            }
            DeltaKind::StatusApplied {
                status,
                stacks,
                remaining,
            } => {
                self.statuses.upsert(
                    StatusEffect::new(status, remaining, delta.source).with_stacks(stacks),
                );
            }
            DeltaKind::StatusRemoved { status } => {
                self.statuses.remove(status);
            }
        }
    }
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}
