//! Opponent decision making.
//!
//! Policies are pure functions of the encounter state: the same state always
//! yields the same action. `Seeded` draws from [`PcgRng`] with a seed mixed
//! from the policy seed, the turn counter, and the actor id.

use crate::effect::EffectDefinition;
use crate::env::{GameEnv, PcgRng, SkillDefinition, TargetingMode, compute_seed};
use crate::state::EntityId;

use super::{CombatAction, Combatant, EncounterState};

/// Health percentage at or below which a defensive opponent heals.
const DEFENSIVE_HEAL_THRESHOLD: u32 = 50;

/// Closed set of opponent behaviors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiPolicy {
    /// Highest-damage usable skill on the weakest enemy.
    Aggressive,
    /// Heals when hurt, otherwise aggressive.
    Defensive,
    /// Uniform choice among usable skills and targets.
    Seeded(u64),
}

struct Candidate<'a> {
    skill: &'a SkillDefinition,
    effect: &'a EffectDefinition,
}

impl AiPolicy {
    /// Chooses an action for `actor`. Falls back to `Wait` when nothing is usable.
    pub fn select_action(
        self,
        actor: EntityId,
        state: &EncounterState,
        env: &GameEnv<'_>,
    ) -> CombatAction {
        let Some(me) = state.participant(actor) else {
            return CombatAction::Wait;
        };
        let enemies = state.living_enemies_of(actor);
        let candidates = usable_skills(me, !enemies.is_empty(), env);
        if candidates.is_empty() {
            return CombatAction::Wait;
        }

        match self {
            Self::Aggressive => aggressive(&candidates, &enemies),
            Self::Defensive => {
                let hurt = me.health.percent() <= DEFENSIVE_HEAL_THRESHOLD;
                let heal = candidates.iter().find(|c| {
                    c.effect.targeting == TargetingMode::SelfOnly && c.effect.heals_health()
                });
                match heal {
                    Some(heal) if hurt => CombatAction::skill(heal.skill.id, None),
                    _ => aggressive(&candidates, &enemies),
                }
            }
            Self::Seeded(seed) => {
                let turn = u64::from(state.turn);
                let pick = PcgRng::index(compute_seed(seed, turn, actor.0, 0), candidates.len());
                let choice = &candidates[pick];
                let target = match choice.effect.targeting {
                    TargetingMode::SingleEnemy => {
                        let index =
                            PcgRng::index(compute_seed(seed, turn, actor.0, 1), enemies.len());
                        enemies.get(index).map(|e| e.id)
                    }
                    _ => None,
                };
                CombatAction::skill(choice.skill.id, target)
            }
        }
    }
}

fn usable_skills<'a>(
    me: &Combatant,
    enemies_alive: bool,
    env: &GameEnv<'a>,
) -> Vec<Candidate<'a>> {
    me.skills
        .iter()
        .filter_map(|&id| {
            let skill = env.skill(id).ok()?;
            let effect = env.effect(skill.effect).ok()?;
            let ready = me.cooldown(id) == 0 && me.resource.current >= skill.cost;
            let has_target = effect.targeting == TargetingMode::SelfOnly || enemies_alive;
            (ready && has_target).then_some(Candidate { skill, effect })
        })
        .collect()
}

fn aggressive(candidates: &[Candidate<'_>], enemies: &[&Combatant]) -> CombatAction {
    let mut best = &candidates[0];
    for candidate in &candidates[1..] {
        if candidate.effect.damage_estimate() > best.effect.damage_estimate() {
            best = candidate;
        }
    }

    let target = match best.effect.targeting {
        TargetingMode::SingleEnemy => weakest(enemies),
        _ => None,
    };
    CombatAction::skill(best.skill.id, target)
}

/// Lowest current health, first in participant order on ties.
fn weakest(enemies: &[&Combatant]) -> Option<EntityId> {
    let mut weakest: Option<&Combatant> = None;
    for enemy in enemies {
        if weakest.is_none_or(|w| enemy.health.current < w.health.current) {
            weakest = Some(*enemy);
        }
    }
    weakest.map(|c| c.id)
}
