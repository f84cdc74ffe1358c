//! Pure effect resolution.
//!
//! Components resolve against a scratch copy of the participants so that
//! chained components clamp against already-changed values. The caller's
//! slice is never modified.

use crate::combat::Combatant;
use crate::config::CombatRules;
use crate::env::{PeriodicEffect, StackingPolicy, StatusOracle, TargetingMode};
use crate::state::EntityId;

use super::{Attribute, Delta, DeltaKind, EffectDefinition, EffectKind, ResolutionMode, ResolveError};

/// Who is acting and whom they aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveContext {
    pub source: EntityId,
    /// Required for [`TargetingMode::SingleEnemy`], ignored otherwise.
    pub primary_target: Option<EntityId>,
    /// Encounter turn counter, carried for diagnostics.
    pub turn: u32,
}

impl ResolveContext {
    pub fn new(source: EntityId, primary_target: Option<EntityId>, turn: u32) -> Self {
        Self {
            source,
            primary_target,
            turn,
        }
    }
}

/// Expands a targeting mode into concrete target ids.
///
/// # Errors
///
/// - `MissingTarget` when a single enemy is required but none was named
/// - `InvalidTarget` when the named target is not a living enemy of the source
/// - `NoLivingEnemies` when all-enemies targeting finds nobody
pub fn select_targets(
    targeting: TargetingMode,
    participants: &[Combatant],
    source: EntityId,
    primary_target: Option<EntityId>,
) -> Result<Vec<EntityId>, ResolveError> {
    let actor = participants
        .iter()
        .find(|c| c.id == source)
        .ok_or(ResolveError::UnknownSource(source))?;

    match targeting {
        TargetingMode::SelfOnly => Ok(vec![source]),
        TargetingMode::SingleEnemy => {
            let target = primary_target.ok_or(ResolveError::MissingTarget)?;
            let legal = participants
                .iter()
                .any(|c| c.id == target && c.is_alive() && c.is_enemy_of(actor));
            if legal {
                Ok(vec![target])
            } else {
                Err(ResolveError::InvalidTarget(target))
            }
        }
        TargetingMode::AllEnemies => {
            let targets: Vec<EntityId> = participants
                .iter()
                .filter(|c| c.is_alive() && c.is_enemy_of(actor))
                .map(|c| c.id)
                .collect();
            if targets.is_empty() {
                Err(ResolveError::NoLivingEnemies)
            } else {
                Ok(targets)
            }
        }
    }
}

/// Resolves `effect` into an ordered list of deltas.
pub fn resolve(
    effect: &EffectDefinition,
    participants: &[Combatant],
    ctx: &ResolveContext,
    statuses: &dyn StatusOracle,
    rules: &CombatRules,
) -> Result<Vec<Delta>, ResolveError> {
    let targets = select_targets(effect.targeting, participants, ctx.source, ctx.primary_target)?;

    let mut scratch = participants.to_vec();
    let mut deltas = Vec::new();

    for component in &effect.components {
        for &target in &targets {
            let Some(index) = position(&scratch, target) else {
                continue;
            };
            if effect.resolution == ResolutionMode::SkipDefeated && !scratch[index].is_alive() {
                continue;
            }
            resolve_component(
                component,
                ctx.source,
                index,
                &mut scratch,
                statuses,
                rules,
                &mut deltas,
            )?;
        }
    }

    Ok(deltas)
}

/// Periodic status ticks for `owner`, in status storage order.
///
/// Periodic damage ignores defense.
pub fn resolve_periodic(
    owner: &Combatant,
    statuses: &dyn StatusOracle,
) -> Result<Vec<Delta>, ResolveError> {
    let mut scratch = owner.clone();
    let mut deltas = Vec::new();

    for instance in owner.statuses.iter() {
        let template = statuses
            .status(instance.status)
            .ok_or(ResolveError::UnknownStatus(instance.status))?;
        let Some(periodic) = template.periodic else {
            continue;
        };

        let amount = match periodic {
            PeriodicEffect::Damage(per_stack) => {
                -(i64::from(per_stack) * i64::from(instance.stacks))
            }
            PeriodicEffect::Heal(per_stack) => i64::from(per_stack) * i64::from(instance.stacks),
        };
        let change = scratch.health.clamped_change(amount);
        if change != 0 {
            let delta = Delta::new(instance.source, owner.id, DeltaKind::Health(change));
            scratch.apply(&delta);
            deltas.push(delta);
        }
    }

    Ok(deltas)
}

fn position(participants: &[Combatant], id: EntityId) -> Option<usize> {
    participants.iter().position(|c| c.id == id)
}

fn push(scratch: &mut [Combatant], deltas: &mut Vec<Delta>, delta: Delta) {
    if let Some(index) = position(scratch, delta.target) {
        scratch[index].apply(&delta);
    }
    deltas.push(delta);
}

fn resolve_component(
    component: &EffectKind,
    source: EntityId,
    index: usize,
    scratch: &mut [Combatant],
    statuses: &dyn StatusOracle,
    rules: &CombatRules,
    deltas: &mut Vec<Delta>,
) -> Result<(), ResolveError> {
    let target = scratch[index].id;

    match *component {
        EffectKind::Damage { amount } => {
            let defense = scratch[index].effective_defense(statuses);
            let damage = amount.saturating_sub(defense).max(rules.min_damage);
            let change = scratch[index].health.clamped_change(-i64::from(damage));
            if change != 0 {
                push(scratch, deltas, Delta::new(source, target, DeltaKind::Health(change)));
            }
        }

        EffectKind::Heal { attribute, amount } => {
            let meter = match attribute {
                Attribute::Health => &scratch[index].health,
                Attribute::Resource => &scratch[index].resource,
            };
            let change = meter.clamped_change(i64::from(amount));
            if change != 0 {
                let kind = match attribute {
                    Attribute::Health => DeltaKind::Health(change),
                    Attribute::Resource => DeltaKind::Resource(change),
                };
                push(scratch, deltas, Delta::new(source, target, kind));
            }
        }

        EffectKind::DrainResource { amount } => {
            let drained = scratch[index].resource.clamped_change(-i64::from(amount));
            if drained == 0 {
                return Ok(());
            }
            push(scratch, deltas, Delta::new(source, target, DeltaKind::Resource(drained)));

            let Some(source_index) = position(scratch, source) else {
                return Err(ResolveError::UnknownSource(source));
            };
            let gained = scratch[source_index]
                .resource
                .clamped_change(-i64::from(drained));
            if gained != 0 {
                push(scratch, deltas, Delta::new(source, source, DeltaKind::Resource(gained)));
            }
        }

        EffectKind::ApplyStatus { status } => {
            let template = statuses
                .status(status)
                .ok_or(ResolveError::UnknownStatus(status))?;
            let carrier = &scratch[index].statuses;

            let applied = match carrier.get(status) {
                None if carrier.is_full() => None,
                None => Some((1, template.duration)),
                Some(existing) => match template.stacking {
                    StackingPolicy::Refresh if existing.remaining != template.duration => {
                        Some((existing.stacks, template.duration))
                    }
                    StackingPolicy::Stack if existing.stacks < template.max_stacks => {
                        Some((existing.stacks + 1, existing.remaining))
                    }
                    _ => None,
                },
            };

            if let Some((stacks, remaining)) = applied {
                let kind = DeltaKind::StatusApplied {
                    status,
                    stacks,
                    remaining,
                };
                push(scratch, deltas, Delta::new(source, target, kind));
            }
        }

        EffectKind::RemoveStatus { status } => {
            if scratch[index].statuses.has(status) {
                let kind = DeltaKind::StatusRemoved { status };
                push(scratch, deltas, Delta::new(source, target, kind));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Side;
    use crate::env::{ContentCatalog, StatusFlags, StatusTemplate};
    use crate::state::{EffectId, ResourceMeter, StatusId};

    const POISON: StatusId = StatusId(1);
    const GUARD: StatusId = StatusId(2);
    const BLEED: StatusId = StatusId(3);

    fn catalog() -> ContentCatalog {
        ContentCatalog::new()
            .with_status(StatusTemplate {
                id: POISON,
                name: "Poison".into(),
                duration: 3,
                stacking: StackingPolicy::Refresh,
                max_stacks: 1,
                flags: StatusFlags::DEBUFF,
                periodic: Some(PeriodicEffect::Damage(2)),
                defense_modifier: 0,
            })
            .with_status(StatusTemplate {
                id: GUARD,
                name: "Guard".into(),
                duration: 2,
                stacking: StackingPolicy::Ignore,
                max_stacks: 1,
                flags: StatusFlags::empty(),
                periodic: None,
                defense_modifier: 3,
            })
            .with_status(StatusTemplate {
                id: BLEED,
                name: "Bleed".into(),
                duration: 4,
                stacking: StackingPolicy::Stack,
                max_stacks: 3,
                flags: StatusFlags::DEBUFF,
                periodic: Some(PeriodicEffect::Damage(1)),
                defense_modifier: 0,
            })
    }

    fn hero(health: u32, defense: u32) -> Combatant {
        Combatant::new(
            EntityId::PLAYER,
            "Hero",
            Side::Player,
            ResourceMeter::full(health),
            ResourceMeter::full(10),
        )
        .with_defense(defense)
    }

    fn goblin(index: usize, health: u32) -> Combatant {
        Combatant::new(
            EntityId::opponent(index),
            "Goblin",
            Side::Opponent,
            ResourceMeter::full(health),
            ResourceMeter::full(6),
        )
    }

    fn effect(targeting: TargetingMode, components: Vec<EffectKind>) -> EffectDefinition {
        EffectDefinition::new(EffectId(1), targeting, components)
    }

    fn hit_player(participants: &[Combatant], amount: u32) -> Vec<Delta> {
        let strike = effect(TargetingMode::SingleEnemy, vec![EffectKind::Damage { amount }]);
        let ctx = ResolveContext::new(EntityId::opponent(0), Some(EntityId::PLAYER), 1);
        resolve(&strike, participants, &ctx, &catalog(), &CombatRules::default()).unwrap()
    }

    fn apply_all(participants: &mut [Combatant], deltas: &[Delta]) {
        for delta in deltas {
            let target = participants.iter_mut().find(|c| c.id == delta.target).unwrap();
            target.apply(delta);
        }
    }

    #[test]
    fn damage_is_reduced_by_defense_and_capped_by_health() {
        let mut participants = vec![hero(20, 2), goblin(0, 10)];

        for expected in [12, 4, 0] {
            let deltas = hit_player(&participants, 10);
            apply_all(&mut participants, &deltas);
            assert_eq!(participants[0].health.current, expected);
        }

        // Already at 0: nothing left to take.
        assert!(hit_player(&participants, 10).is_empty());
    }

    #[test]
    fn damage_never_drops_below_minimum() {
        let participants = vec![hero(20, 50), goblin(0, 10)];
        let deltas = hit_player(&participants, 3);
        assert_eq!(deltas[0].change, DeltaKind::Health(-1));
    }

    #[test]
    fn damage_formula_matches_clamp_for_all_small_inputs() {
        for health in 0..=12u32 {
            for defense in 0..=6u32 {
                for amount in 0..=12u32 {
                    let mut participants = vec![hero(12, defense), goblin(0, 10)];
                    participants[0].health.current = health;
                    let deltas = hit_player(&participants, amount);
                    apply_all(&mut participants, &deltas);

                    let expected = (health as i64
                        - i64::from(amount.saturating_sub(defense).max(1)))
                    .clamp(0, 12);
                    assert_eq!(i64::from(participants[0].health.current), expected);
                }
            }
        }
    }

    #[test]
    fn heal_is_capped_at_maximum() {
        let mut participants = vec![hero(20, 0), goblin(0, 10)];
        participants[0].health.current = 15;
        let heal = effect(
            TargetingMode::SelfOnly,
            vec![EffectKind::Heal {
                attribute: Attribute::Health,
                amount: 30,
            }],
        );
        let ctx = ResolveContext::new(EntityId::PLAYER, None, 1);
        let deltas = resolve(&heal, &participants, &ctx, &catalog(), &CombatRules::default())
            .unwrap();
        assert_eq!(deltas, vec![Delta::new(
            EntityId::PLAYER,
            EntityId::PLAYER,
            DeltaKind::Health(5)
        )]);

        participants[0].health.current = 20;
        let deltas = resolve(&heal, &participants, &ctx, &catalog(), &CombatRules::default())
            .unwrap();
        assert!(deltas.is_empty(), "zero-amount heal must not emit a delta");
    }

    #[test]
    fn drain_moves_only_what_the_target_has() {
        let mut participants = vec![hero(20, 0), goblin(0, 10)];
        participants[0].resource.current = 4;
        participants[1].resource.current = 3;
        let drain = effect(
            TargetingMode::SingleEnemy,
            vec![EffectKind::DrainResource { amount: 5 }],
        );
        let ctx = ResolveContext::new(EntityId::PLAYER, Some(EntityId::opponent(0)), 1);
        let deltas =
            resolve(&drain, &participants, &ctx, &catalog(), &CombatRules::default()).unwrap();

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].target, EntityId::opponent(0));
        assert_eq!(deltas[0].change, DeltaKind::Resource(-3));
        assert_eq!(deltas[1].target, EntityId::PLAYER);
        assert_eq!(deltas[1].change, DeltaKind::Resource(3));
    }

    #[test]
    fn refresh_resets_duration_without_exceeding_default() {
        let mut participants = vec![hero(20, 0), goblin(0, 10)];
        let poison = effect(
            TargetingMode::SingleEnemy,
            vec![EffectKind::ApplyStatus { status: POISON }],
        );
        let ctx = ResolveContext::new(EntityId::PLAYER, Some(EntityId::opponent(0)), 1);
        let rules = CombatRules::default();

        let deltas = resolve(&poison, &participants, &ctx, &catalog(), &rules).unwrap();
        apply_all(&mut participants, &deltas);
        participants[1].statuses.tick();
        assert_eq!(participants[1].statuses.get(POISON).unwrap().remaining, 2);

        for _ in 0..2 {
            let deltas = resolve(&poison, &participants, &ctx, &catalog(), &rules).unwrap();
            apply_all(&mut participants, &deltas);
            let instance = participants[1].statuses.get(POISON).unwrap();
            assert_eq!((instance.remaining, instance.stacks), (3, 1));
        }
    }

    #[test]
    fn stack_increments_up_to_cap() {
        let mut participants = vec![hero(20, 0), goblin(0, 10)];
        let bleed = effect(
            TargetingMode::SingleEnemy,
            vec![EffectKind::ApplyStatus { status: BLEED }],
        );
        let ctx = ResolveContext::new(EntityId::PLAYER, Some(EntityId::opponent(0)), 1);
        let rules = CombatRules::default();

        for applications in 1..=5u8 {
            let deltas = resolve(&bleed, &participants, &ctx, &catalog(), &rules).unwrap();
            apply_all(&mut participants, &deltas);
            let instance = participants[1].statuses.get(BLEED).unwrap();
            assert_eq!(instance.stacks, applications.min(3));
            assert_eq!(instance.remaining, 4);
        }
    }

    #[test]
    fn ignore_keeps_existing_instance() {
        let mut participants = vec![hero(20, 0), goblin(0, 10)];
        let guard = effect(
            TargetingMode::SelfOnly,
            vec![EffectKind::ApplyStatus { status: GUARD }],
        );
        let ctx = ResolveContext::new(EntityId::PLAYER, None, 1);
        let rules = CombatRules::default();

        let deltas = resolve(&guard, &participants, &ctx, &catalog(), &rules).unwrap();
        apply_all(&mut participants, &deltas);
        participants[0].statuses.tick();

        let deltas = resolve(&guard, &participants, &ctx, &catalog(), &rules).unwrap();
        assert!(deltas.is_empty());
        assert_eq!(participants[0].statuses.get(GUARD).unwrap().remaining, 1);
    }

    #[test]
    fn status_defense_modifier_reduces_damage() {
        let mut participants = vec![hero(20, 2), goblin(0, 10)];
        let guard = effect(
            TargetingMode::SelfOnly,
            vec![EffectKind::ApplyStatus { status: GUARD }],
        );
        let ctx = ResolveContext::new(EntityId::PLAYER, None, 1);
        let deltas =
            resolve(&guard, &participants, &ctx, &catalog(), &CombatRules::default()).unwrap();
        apply_all(&mut participants, &deltas);

        let deltas = hit_player(&participants, 10);
        assert_eq!(deltas[0].change, DeltaKind::Health(-5));
    }

    #[test]
    fn all_enemies_skips_targets_defeated_earlier_in_batch() {
        let participants = vec![hero(20, 0), goblin(0, 3), goblin(1, 20)];
        let components = vec![
            EffectKind::Damage { amount: 5 },
            EffectKind::ApplyStatus { status: POISON },
        ];
        let ctx = ResolveContext::new(EntityId::PLAYER, None, 1);
        let rules = CombatRules::default();

        let skip = effect(TargetingMode::AllEnemies, components.clone());
        let deltas = resolve(&skip, &participants, &ctx, &catalog(), &rules).unwrap();
        let poisoned: Vec<_> = deltas
            .iter()
            .filter(|d| matches!(d.change, DeltaKind::StatusApplied { .. }))
            .map(|d| d.target)
            .collect();
        assert_eq!(poisoned, vec![EntityId::opponent(1)]);

        let snapshot = effect(TargetingMode::AllEnemies, components)
            .with_resolution(ResolutionMode::Snapshot);
        let deltas = resolve(&snapshot, &participants, &ctx, &catalog(), &rules).unwrap();
        let poisoned = deltas
            .iter()
            .filter(|d| matches!(d.change, DeltaKind::StatusApplied { .. }))
            .count();
        assert_eq!(poisoned, 2);
    }

    #[test]
    fn all_enemies_ignores_already_defeated() {
        let mut participants = vec![hero(20, 0), goblin(0, 3), goblin(1, 20)];
        participants[1].health.current = 0;
        let targets = select_targets(
            TargetingMode::AllEnemies,
            &participants,
            EntityId::PLAYER,
            None,
        )
        .unwrap();
        assert_eq!(targets, vec![EntityId::opponent(1)]);
    }

    #[test]
    fn single_enemy_requires_living_enemy() {
        let mut participants = vec![hero(20, 0), goblin(0, 3)];
        let strike = effect(TargetingMode::SingleEnemy, vec![EffectKind::Damage { amount: 4 }]);
        let rules = CombatRules::default();

        let missing = ResolveContext::new(EntityId::PLAYER, None, 1);
        assert_eq!(
            resolve(&strike, &participants, &missing, &catalog(), &rules),
            Err(ResolveError::MissingTarget)
        );

        let own_side = ResolveContext::new(EntityId::PLAYER, Some(EntityId::PLAYER), 1);
        assert_eq!(
            resolve(&strike, &participants, &own_side, &catalog(), &rules),
            Err(ResolveError::InvalidTarget(EntityId::PLAYER))
        );

        participants[1].health.current = 0;
        let dead = ResolveContext::new(EntityId::PLAYER, Some(EntityId::opponent(0)), 1);
        assert_eq!(
            resolve(&strike, &participants, &dead, &catalog(), &rules),
            Err(ResolveError::InvalidTarget(EntityId::opponent(0)))
        );
    }

    #[test]
    fn resolve_leaves_inputs_untouched() {
        let participants = vec![hero(20, 0), goblin(0, 10)];
        let before = participants.clone();
        let deltas = hit_player(&participants, 7);
        assert!(!deltas.is_empty());
        assert_eq!(participants, before);
    }

    #[test]
    fn periodic_damage_scales_with_stacks_and_ignores_defense() {
        let mut victim = goblin(0, 10).with_defense(10);
        victim.statuses.upsert(
            crate::state::StatusEffect::new(BLEED, 2, EntityId::PLAYER).with_stacks(3),
        );
        let deltas = resolve_periodic(&victim, &catalog()).unwrap();
        assert_eq!(deltas, vec![Delta::new(
            EntityId::PLAYER,
            EntityId::opponent(0),
            DeltaKind::Health(-3)
        )]);
    }
}
