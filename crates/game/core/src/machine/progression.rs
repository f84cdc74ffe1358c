//! Exploration-phase progression: experience, items, skills.

use crate::combat::{Combatant, Rewards};
use crate::config::{CombatRules, ProgressionRules};
use crate::effect::{Delta, DeltaKind, ResolveContext, resolve};
use crate::env::{GameEnv, ItemKind, TargetingMode};
use crate::state::{GameState, InventoryError, ItemId, Player, SkillId, StatusEffect};

use super::ProgressionError;

/// Notable progression changes, reported alongside combat events.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressionEvent {
    ExperienceGained { amount: u32 },
    LevelUp { level: u32 },
    SkillLearned { skill: SkillId },
    ItemAcquired { item: ItemId, count: u32 },
    /// Reward items that did not fit in the inventory.
    ItemDiscarded { item: ItemId, count: u32 },
    FlagSet { name: String },
}

/// Adds experience and applies every level-up it pays for.
///
/// Each level-up raises both maxima, restores both meters to full, and
/// teaches the skills unlocked at the new level.
pub fn grant_experience(
    player: &mut Player,
    amount: u32,
    rules: &ProgressionRules,
    env: &GameEnv<'_>,
    events: &mut Vec<ProgressionEvent>,
) {
    if amount == 0 {
        return;
    }
    player.experience = player.experience.saturating_add(amount);
    events.push(ProgressionEvent::ExperienceGained { amount });

    loop {
        let threshold = rules.threshold(player.level);
        if player.level >= rules.max_level || threshold == 0 || player.experience < threshold {
            break;
        }
        player.experience -= threshold;
        player.level += 1;
        player.health.grow(rules.health_per_level);
        player.health.fill();
        player.resource.grow(rules.resource_per_level);
        player.resource.fill();
        events.push(ProgressionEvent::LevelUp {
            level: player.level,
        });

        for skill in rules.unlocks_at(player.level) {
            if env.skill(skill).is_ok() && player.known_skills.insert(skill) {
                events.push(ProgressionEvent::SkillLearned { skill });
            }
        }
    }
}

/// Adds up to `count` items, limited by the definition's stack size.
///
/// Returns the number actually added.
pub fn acquire_item(
    player: &mut Player,
    item: ItemId,
    count: u32,
    env: &GameEnv<'_>,
) -> Result<u32, ProgressionError> {
    let definition = env.item(item)?;
    Ok(player.inventory.add(item, count, definition.max_stack)?)
}

/// Inserts a skill into the known set. Returns false if it was already known.
pub fn learn_skill(
    player: &mut Player,
    skill: SkillId,
    env: &GameEnv<'_>,
) -> Result<bool, ProgressionError> {
    env.skill(skill)?;
    Ok(player.known_skills.insert(skill))
}

pub fn set_equipped(
    player: &mut Player,
    item: ItemId,
    equipped: bool,
    env: &GameEnv<'_>,
) -> Result<(), ProgressionError> {
    let definition = env.item(item)?;
    if !matches!(definition.kind, ItemKind::Equipment(_)) {
        return Err(ProgressionError::NotEquipment(item));
    }
    Ok(player.inventory.set_equipped(item, equipped)?)
}

/// Uses a self-targeted consumable outside combat.
pub fn use_item(
    player: &mut Player,
    item: ItemId,
    env: &GameEnv<'_>,
    rules: &CombatRules,
) -> Result<Vec<Delta>, ProgressionError> {
    let definition = env.item(item)?;
    let effect_id = match definition.effect {
        Some(effect) if definition.is_usable() => effect,
        _ => return Err(ProgressionError::NotUsable(item)),
    };
    let effect = env.effect(effect_id)?;
    if effect.targeting != TargetingMode::SelfOnly {
        return Err(ProgressionError::NotSelfTargeted(item));
    }
    if player.inventory.count(item) == 0 {
        return Err(crate::state::InventoryError::Missing { item }.into());
    }

    let participants = [Combatant::from_player(player, env)?];
    let ctx = ResolveContext::new(player.id, None, 0);
    let deltas = resolve(effect, &participants, &ctx, env.statuses(), rules)
        .map_err(|_| ProgressionError::NotSelfTargeted(item))?;

    player.inventory.remove(item, 1)?;
    for delta in &deltas {
        match delta.change {
            DeltaKind::Health(amount) => {
                player.health.apply(i64::from(amount));
            }
            DeltaKind::Resource(amount) => {
                player.resource.apply(i64::from(amount));
            }
            DeltaKind::StatusApplied {
                status,
                stacks,
                remaining,
            } => {
                player.status_effects.upsert(
                    StatusEffect::new(status, remaining, delta.source).with_stacks(stacks),
                );
            }
            DeltaKind::StatusRemoved { status } => {
                player.status_effects.remove(status);
            }
        }
    }
    Ok(deltas)
}

/// Applies encounter rewards. Items that do not fit are discarded.
///
/// A drop that names an item missing from the catalog is an error.
pub fn apply_rewards(
    state: &mut GameState,
    rewards: &Rewards,
    rules: &ProgressionRules,
    env: &GameEnv<'_>,
    events: &mut Vec<ProgressionEvent>,
) -> Result<(), ProgressionError> {
    grant_experience(&mut state.player, rewards.experience, rules, env, events);

    for drop in &rewards.items {
        let added = match acquire_item(&mut state.player, drop.item, drop.count, env) {
            Ok(added) => added,
            Err(ProgressionError::Inventory(
                InventoryError::Full | InventoryError::StackLimit { .. },
            )) => 0,
            Err(error) => return Err(error),
        };
        if added > 0 {
            events.push(ProgressionEvent::ItemAcquired {
                item: drop.item,
                count: added,
            });
        }
        if added < drop.count {
            events.push(ProgressionEvent::ItemDiscarded {
                item: drop.item,
                count: drop.count - added,
            });
        }
    }

    for flag in &rewards.flags {
        state.flags.set(flag.clone(), true);
        events.push(ProgressionEvent::FlagSet { name: flag.clone() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SkillUnlock, StartingPlayer};
    use crate::fixtures::{self, *};

    fn player() -> Player {
        Player::from_template(&StartingPlayer::default())
    }

    #[test]
    fn experience_levels_up_and_unlocks_skills() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut rules = ProgressionRules::default();
        rules.skill_unlocks.push(SkillUnlock {
            level: 3,
            skills: vec![FIREBALL],
        });

        let mut player = player();
        player.health.current = 5;
        let mut events = Vec::new();
        // 100 for level 1 -> 2, 200 for level 2 -> 3, 50 left over.
        grant_experience(&mut player, 350, &rules, &env, &mut events);

        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 50);
        assert_eq!(player.health, crate::state::ResourceMeter::full(30));
        assert_eq!(player.resource, crate::state::ResourceMeter::full(14));
        assert!(player.knows(FIREBALL));
        assert_eq!(events, vec![
            ProgressionEvent::ExperienceGained { amount: 350 },
            ProgressionEvent::LevelUp { level: 2 },
            ProgressionEvent::LevelUp { level: 3 },
            ProgressionEvent::SkillLearned { skill: FIREBALL },
        ]);
    }

    #[test]
    fn level_is_capped() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let rules = ProgressionRules {
            max_level: 2,
            ..ProgressionRules::default()
        };
        let mut player = player();
        grant_experience(&mut player, 10_000, &rules, &env, &mut Vec::new());
        assert_eq!(player.level, 2);
    }

    #[test]
    fn items_stack_up_to_the_definition_limit() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut player = player();

        assert_eq!(acquire_item(&mut player, POTION, 3, &env), Ok(3));
        assert_eq!(acquire_item(&mut player, POTION, 3, &env), Ok(2));
        assert_eq!(player.inventory.count(POTION), 5);
        assert_eq!(player.inventory.len(), 1);
        assert!(acquire_item(&mut player, ItemId(99), 1, &env).is_err());
    }

    #[test]
    fn rewards_discard_what_does_not_fit() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut state = GameState::new(player());
        acquire_item(&mut state.player, POTION, 5, &env).unwrap();
        let rewards = Rewards {
            experience: 0,
            items: vec![crate::env::ItemDrop {
                item: POTION,
                count: 2,
            }],
            flags: Vec::new(),
        };

        let mut events = Vec::new();
        apply_rewards(&mut state, &rewards, &ProgressionRules::default(), &env, &mut events)
            .unwrap();

        assert_eq!(state.player.inventory.count(POTION), 5);
        assert!(events.contains(&ProgressionEvent::ItemDiscarded {
            item: POTION,
            count: 2,
        }));
    }

    #[test]
    fn rewards_with_an_unknown_item_are_an_error() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut state = GameState::new(player());
        let rewards = Rewards {
            experience: 10,
            items: vec![crate::env::ItemDrop {
                item: ItemId(99),
                count: 1,
            }],
            flags: Vec::new(),
        };

        let mut events = Vec::new();
        let error = apply_rewards(
            &mut state,
            &rewards,
            &ProgressionRules::default(),
            &env,
            &mut events,
        )
        .unwrap_err();

        assert!(matches!(error, ProgressionError::Oracle(_)));
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, ProgressionEvent::ItemDiscarded { .. }))
        );
    }

    #[test]
    fn learning_is_idempotent_and_rejects_unknown_skills() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut player = player();

        assert_eq!(learn_skill(&mut player, STRIKE, &env), Ok(true));
        assert_eq!(learn_skill(&mut player, STRIKE, &env), Ok(false));
        assert!(learn_skill(&mut player, SkillId(404), &env).is_err());
    }

    #[test]
    fn only_equipment_can_be_equipped() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut player = player();
        acquire_item(&mut player, SHIELD, 1, &env).unwrap();
        acquire_item(&mut player, POTION, 1, &env).unwrap();

        set_equipped(&mut player, SHIELD, true, &env).unwrap();
        assert_eq!(player.inventory.equipped().count(), 1);
        assert_eq!(
            set_equipped(&mut player, POTION, true, &env),
            Err(ProgressionError::NotEquipment(POTION))
        );
    }

    #[test]
    fn potion_heals_outside_combat() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut player = player();
        acquire_item(&mut player, POTION, 1, &env).unwrap();
        player.health.current = 5;

        let deltas = use_item(&mut player, POTION, &env, &CombatRules::default()).unwrap();
        assert_eq!(deltas.len(), 1);
        assert_eq!(player.health.current, 13);
        assert_eq!(player.inventory.count(POTION), 0);
        assert!(use_item(&mut player, POTION, &env, &CombatRules::default()).is_err());
    }
}
