//! Turn loop driving a single encounter.
//!
//! Stages run `TurnStart → ActionSelection → ActionResolution → TurnEnd`
//! until the encounter concludes. Opponent turns run synchronously; the
//! engine only stops to wait for the player's action or at conclusion.

use crate::config::{CombatRules, GameConfig};
use crate::effect::{Delta, DeltaKind, ResolveContext, resolve, resolve_periodic, select_targets};
use crate::env::GameEnv;
use crate::error::ErrorContext;
use crate::state::{
    EntityId, InventoryState, Opponent, OpponentTemplateId, Player, ResourceMeter,
};

use super::turns::{compute_turn_order, next_living};
use super::{
    CombatAction, CombatError, CombatEvent, CombatPhase, Combatant, EncounterState, IllegalAction,
    Outcome, Rewards, SkipReason,
};

/// Player-facing result of a concluded encounter, used for write-back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterResult {
    pub outcome: Outcome,
    pub health: ResourceMeter,
    pub resource: ResourceMeter,
    pub inventory: InventoryState,
    pub rewards: Option<Rewards>,
}

/// Authoritative reducer for an [`EncounterState`].
#[derive(Clone, Debug)]
pub struct CombatEngine {
    state: EncounterState,
    rules: CombatRules,
}

impl CombatEngine {
    /// Builds the encounter and runs every turn up to the player's first
    /// action selection (or conclusion).
    ///
    /// # Errors
    ///
    /// - `IllegalAction` for an empty or oversized opponent list
    /// - `Oracle` when a template or equipped item is unknown
    /// - `InvariantViolation` if the opening turns break an invariant
    pub fn start(
        player: &Player,
        opponents: &[OpponentTemplateId],
        env: &GameEnv<'_>,
        rules: CombatRules,
    ) -> Result<(Self, Vec<CombatEvent>), CombatError> {
        let context = ErrorContext::new(0);
        if opponents.is_empty() {
            return Err(CombatError::illegal(IllegalAction::NoOpponents, context));
        }
        if opponents.len() > GameConfig::MAX_OPPONENTS {
            return Err(CombatError::illegal(
                IllegalAction::TooManyOpponents(opponents.len()),
                context,
            ));
        }

        let mut participants = Vec::with_capacity(opponents.len() + 1);
        participants.push(Combatant::from_player(player, env)?);
        for (index, &template_id) in opponents.iter().enumerate() {
            let template = env.opponent(template_id)?;
            let opponent = Opponent::from_template(EntityId::opponent(index), template);
            participants.push(Combatant::from_opponent(&opponent));
        }

        let mut state = EncounterState::new(participants, player.inventory.clone());
        state.turn_order = compute_turn_order(&state.participants);
        state.phase = CombatPhase::TurnStart;

        let mut engine = Self { state, rules };
        let mut events = Vec::new();
        engine.advance(env, &mut events)?;
        Ok((engine, events))
    }

    pub fn state(&self) -> &EncounterState {
        &self.state
    }

    pub fn phase(&self) -> CombatPhase {
        self.state.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    pub fn is_concluded(&self) -> bool {
        self.state.phase == CombatPhase::Concluded
    }

    /// True when the engine is waiting for [`Self::submit`].
    pub fn awaiting_player(&self) -> bool {
        self.state.phase == CombatPhase::ActionSelection
            && self.state.current_actor() == Some(EntityId::PLAYER)
    }

    /// Result for write-back, once concluded.
    pub fn result(&self) -> Option<EncounterResult> {
        if !self.is_concluded() {
            return None;
        }
        let player = self.state.player()?;
        Some(EncounterResult {
            outcome: self.state.outcome,
            health: player.health,
            resource: player.resource,
            inventory: self.state.inventory.clone(),
            rewards: self.state.rewards.clone(),
        })
    }

    /// Applies the player's action and runs until the next player selection
    /// or conclusion.
    ///
    /// Recoverable errors leave the encounter exactly as it was.
    pub fn submit(
        &mut self,
        action: CombatAction,
        env: &GameEnv<'_>,
    ) -> Result<Vec<CombatEvent>, CombatError> {
        let context = self.state.context();
        if self.is_concluded() {
            return Err(CombatError::illegal(IllegalAction::EncounterConcluded, context));
        }
        if !self.awaiting_player() {
            return Err(CombatError::illegal(IllegalAction::NotPlayerTurn, context));
        }

        let mut next = self.state.clone();
        let mut events = Vec::new();
        next.phase = CombatPhase::ActionResolution;
        perform(&mut next, EntityId::PLAYER, action, env, &self.rules, &mut events)?;
        next.phase = CombatPhase::TurnEnd;
        self.state = next;

        self.advance(env, &mut events)?;
        Ok(events)
    }

    fn advance(
        &mut self,
        env: &GameEnv<'_>,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), CombatError> {
        loop {
            self.state.check_invariants()?;

            match self.state.phase {
                CombatPhase::TurnStart => {
                    if self.state.turn >= self.rules.max_turns {
                        return Err(CombatError::invariant(
                            format!("turn limit of {} reached", self.rules.max_turns),
                            self.state.context(),
                        ));
                    }
                    begin_turn(&mut self.state, env, events)?;
                }
                CombatPhase::ActionSelection => {
                    let actor = current_actor(&self.state)?;
                    let Some(policy) = self.state.participant(actor).and_then(|c| c.policy) else {
                        return Ok(());
                    };

                    let action = policy.select_action(actor, &self.state, env);
                    self.state.phase = CombatPhase::ActionResolution;
                    perform(&mut self.state, actor, action, env, &self.rules, events).map_err(
                        |error| {
                            if error.is_fatal() {
                                error
                            } else {
                                CombatError::invariant(
                                    format!("{actor} selected an unusable action: {error}"),
                                    self.state.context(),
                                )
                            }
                        },
                    )?;
                    self.state.phase = CombatPhase::TurnEnd;
                }
                CombatPhase::TurnEnd => end_turn(&mut self.state, env, events)?,
                CombatPhase::Concluded => return Ok(()),
                CombatPhase::Init | CombatPhase::ActionResolution => {
                    return Err(CombatError::invariant(
                        format!("engine resumed in {} stage", self.state.phase),
                        self.state.context(),
                    ));
                }
            }
        }
    }
}

fn current_actor(state: &EncounterState) -> Result<EntityId, CombatError> {
    state
        .current_actor()
        .ok_or_else(|| CombatError::invariant("no current actor", state.context()))
}

fn participant_index(state: &EncounterState, id: EntityId) -> Result<usize, CombatError> {
    state
        .participants
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| CombatError::invariant(format!("{id} is not a participant"), state.context()))
}

/// Applies deltas to live participants, emitting one event per delta plus a
/// `Defeated` event for every participant whose health reaches 0.
fn apply_deltas(state: &mut EncounterState, deltas: &[Delta], events: &mut Vec<CombatEvent>) {
    for delta in deltas {
        let Some(target) = state.participant_mut(delta.target) else {
            continue;
        };
        let was_alive = target.is_alive();
        target.apply(delta);
        events.push(CombatEvent::from(delta));
        if was_alive && !target.is_alive() {
            events.push(CombatEvent::Defeated {
                entity: delta.target,
            });
        }
    }
}

fn begin_turn(
    state: &mut EncounterState,
    env: &GameEnv<'_>,
    events: &mut Vec<CombatEvent>,
) -> Result<(), CombatError> {
    let actor = current_actor(state)?;
    let index = participant_index(state, actor)?;
    state.turn += 1;
    events.push(CombatEvent::TurnStarted {
        actor,
        turn: state.turn,
        round: state.round,
    });

    if !state.participants[index].is_alive() {
        events.push(CombatEvent::TurnSkipped {
            actor,
            reason: SkipReason::Defeated,
        });
        state.phase = CombatPhase::TurnEnd;
        return Ok(());
    }

    // Stun is read before ticking so a one-turn stun still costs a turn.
    let stunned = state.participants[index].is_stunned(env.statuses());

    let ticks = resolve_periodic(&state.participants[index], env.statuses())
        .map_err(|e| CombatError::from_resolve(e, state.context()))?;
    apply_deltas(state, &ticks, events);

    let combatant = &mut state.participants[index];
    for expired in combatant.statuses.tick() {
        events.push(CombatEvent::StatusExpired {
            target: actor,
            status: expired.status,
        });
    }
    combatant.tick_cooldowns();

    let skip = if !combatant.is_alive() {
        Some(SkipReason::Defeated)
    } else if stunned {
        Some(SkipReason::Stunned)
    } else {
        None
    };

    state.phase = match skip {
        Some(reason) => {
            events.push(CombatEvent::TurnSkipped { actor, reason });
            CombatPhase::TurnEnd
        }
        None => CombatPhase::ActionSelection,
    };
    Ok(())
}

/// Validates and resolves one action for `actor`.
///
/// Mutates `state` as it goes; callers that must stay untouched on failure
/// pass a copy.
fn perform(
    state: &mut EncounterState,
    actor: EntityId,
    action: CombatAction,
    env: &GameEnv<'_>,
    rules: &CombatRules,
    events: &mut Vec<CombatEvent>,
) -> Result<(), CombatError> {
    let context = state.context();
    let index = participant_index(state, actor)?;

    let (effect, target) = match action {
        CombatAction::UseSkill { skill, target } => {
            let me = &state.participants[index];
            if !me.knows(skill) {
                return Err(CombatError::illegal(IllegalAction::SkillNotKnown(skill), context));
            }
            let definition = env.skill(skill)?;
            let remaining = me.cooldown(skill);
            if remaining > 0 {
                return Err(CombatError::illegal(
                    IllegalAction::OnCooldown { skill, remaining },
                    context,
                ));
            }
            if me.resource.current < definition.cost {
                return Err(CombatError::InsufficientResource {
                    required: definition.cost,
                    available: me.resource.current,
                    context,
                });
            }
            let effect = env.effect(definition.effect)?;
            select_targets(effect.targeting, &state.participants, actor, target)
                .map_err(|e| CombatError::from_resolve(e, context.clone()))?;

            events.push(CombatEvent::ActionPerformed { actor, action });
            state.participants[index].start_cooldown(skill, definition.cooldown);
            if definition.cost > 0 {
                let cost = i32::try_from(definition.cost).unwrap_or(i32::MAX);
                let payment = Delta::new(actor, actor, DeltaKind::Resource(-cost));
                apply_deltas(state, &[payment], events);
            }
            (effect, target)
        }

        CombatAction::UseItem { item, target } => {
            if !actor.is_player() {
                return Err(CombatError::illegal(IllegalAction::NoInventory(actor), context));
            }
            if state.inventory.count(item) == 0 {
                return Err(CombatError::illegal(IllegalAction::ItemNotHeld(item), context));
            }
            let definition = env.item(item)?;
            let effect_id = match definition.effect {
                Some(effect) if definition.is_usable() => effect,
                _ => {
                    return Err(CombatError::illegal(IllegalAction::ItemNotUsable(item), context));
                }
            };
            let effect = env.effect(effect_id)?;
            select_targets(effect.targeting, &state.participants, actor, target)
                .map_err(|e| CombatError::from_resolve(e, context.clone()))?;

            state
                .inventory
                .remove(item, 1)
                .map_err(|e| CombatError::invariant(e.to_string(), context.clone()))?;
            events.push(CombatEvent::ActionPerformed { actor, action });
            (effect, target)
        }

        CombatAction::Flee => {
            if !actor.is_player() {
                return Err(CombatError::illegal(IllegalAction::NotPlayerTurn, context));
            }
            events.push(CombatEvent::ActionPerformed { actor, action });
            state.outcome = Outcome::Fled;
            return Ok(());
        }

        CombatAction::Wait => {
            events.push(CombatEvent::ActionPerformed { actor, action });
            return Ok(());
        }
    };

    let ctx = ResolveContext::new(actor, target, state.turn);
    let deltas = resolve(effect, &state.participants, &ctx, env.statuses(), rules)
        .map_err(|e| CombatError::from_resolve(e, context))?;
    apply_deltas(state, &deltas, events);
    Ok(())
}

fn end_turn(
    state: &mut EncounterState,
    env: &GameEnv<'_>,
    events: &mut Vec<CombatEvent>,
) -> Result<(), CombatError> {
    let actor = current_actor(state)?;
    events.push(CombatEvent::TurnEnded { actor });

    // A dead player cannot return to exploration, so defeat wins ties.
    let outcome = if state.player_defeated() {
        Outcome::Defeat
    } else if state.outcome == Outcome::Fled {
        Outcome::Fled
    } else if state.all_opponents_defeated() {
        Outcome::Victory
    } else {
        Outcome::Ongoing
    };

    if outcome.is_concluded() {
        let rewards = match outcome {
            Outcome::Victory => Some(Rewards::from_templates(
                state.opponents().filter_map(|o| o.template),
                env,
            )?),
            _ => None,
        };
        state.outcome = outcome;
        state.rewards = rewards.clone();
        state.phase = CombatPhase::Concluded;
        events.push(CombatEvent::EncounterConcluded { outcome, rewards });
        return Ok(());
    }

    let (next, wrapped) = next_living(&state.turn_order, state.turn_index, &state.participants)
        .ok_or_else(|| CombatError::invariant("no living participants", state.context()))?;
    if wrapped {
        state.round += 1;
    }
    state.turn_index = next;
    state.phase = CombatPhase::TurnStart;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ContentCatalog;
    use crate::fixtures::{self, *};
    use crate::state::StatusId;

    fn hero() -> Player {
        let mut player = Player::from_template(&fixtures::config().starting_player);
        player.inventory.add(POTION, 2, 5).unwrap();
        player.inventory.add(SHIELD, 1, 1).unwrap();
        player
    }

    fn start(
        catalog: &ContentCatalog,
        player: &Player,
        opponents: &[OpponentTemplateId],
    ) -> (CombatEngine, Vec<CombatEvent>) {
        let env = GameEnv::from_catalog(catalog);
        CombatEngine::start(player, opponents, &env, CombatRules::default()).unwrap()
    }

    fn health(engine: &CombatEngine, id: EntityId) -> u32 {
        engine.state().participant(id).unwrap().health.current
    }

    #[test]
    fn repeated_hits_defeat_the_player() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let (mut engine, _) = start(&catalog, &hero(), &[GOBLIN]);
        assert!(engine.awaiting_player());

        for expected in [12, 4] {
            engine.submit(CombatAction::Wait, &env).unwrap();
            assert_eq!(health(&engine, EntityId::PLAYER), expected);
            assert!(engine.awaiting_player());
        }

        let events = engine.submit(CombatAction::Wait, &env).unwrap();
        assert_eq!(health(&engine, EntityId::PLAYER), 0);
        assert_eq!(engine.outcome(), Outcome::Defeat);
        assert!(events.contains(&CombatEvent::Defeated {
            entity: EntityId::PLAYER
        }));
        assert_eq!(events.last(), Some(&CombatEvent::EncounterConcluded {
            outcome: Outcome::Defeat,
            rewards: None,
        }));
    }

    #[test]
    fn insufficient_resource_leaves_state_unchanged() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let mut player = hero();
        player.resource.current = 3;
        let (mut engine, _) = start(&catalog, &player, &[GOBLIN]);
        let before = engine.state().clone();

        let error = engine
            .submit(CombatAction::skill(FIREBALL, None), &env)
            .unwrap_err();
        assert!(matches!(error, CombatError::InsufficientResource {
            required: 5,
            available: 3,
            ..
        }));
        assert_eq!(engine.state(), &before);
        assert!(engine.awaiting_player());
    }

    #[test]
    fn defeating_every_opponent_concludes_in_victory() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let (mut engine, _) = start(&catalog, &hero(), &[RAT, RAT]);

        let events = engine
            .submit(CombatAction::skill(FIREBALL, None), &env)
            .unwrap();
        let kinds: Vec<&str> = events.iter().map(CombatEvent::as_str).collect();
        assert_eq!(kinds, vec![
            "action_performed",
            "resource_changed",
            "damaged",
            "defeated",
            "damaged",
            "defeated",
            "turn_ended",
            "encounter_concluded",
        ]);

        let result = engine.result().unwrap();
        assert_eq!(result.outcome, Outcome::Victory);
        let rewards = result.rewards.unwrap();
        assert_eq!(rewards.experience, 10);
        assert_eq!(result.resource.current, 5);
    }

    #[test]
    fn faster_opponent_acts_first() {
        let catalog = fixtures::catalog();
        let (engine, events) = start(&catalog, &hero(), &[DRAGON]);
        assert_eq!(engine.state().turn_order, vec![
            EntityId::opponent(0),
            EntityId::PLAYER
        ]);
        assert!(events.contains(&CombatEvent::Damaged {
            source: EntityId::opponent(0),
            target: EntityId::PLAYER,
            amount: 8,
        }));
        assert_eq!(health(&engine, EntityId::PLAYER), 12);
    }

    #[test]
    fn stunned_opponent_skips_its_turn() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let (mut engine, _) = start(&catalog, &hero(), &[GOBLIN]);

        let events = engine
            .submit(
                CombatAction::skill(STUN_BLOW, Some(EntityId::opponent(0))),
                &env,
            )
            .unwrap();
        let goblin = EntityId::opponent(0);
        let start = events
            .iter()
            .position(|e| matches!(e, CombatEvent::TurnStarted { actor, .. } if *actor == goblin))
            .unwrap();
        assert_eq!(&events[start + 1..start + 4], &[
            CombatEvent::StatusExpired {
                target: goblin,
                status: STUN,
            },
            CombatEvent::TurnSkipped {
                actor: goblin,
                reason: SkipReason::Stunned,
            },
            CombatEvent::TurnEnded { actor: goblin },
        ]);
        assert_eq!(health(&engine, EntityId::PLAYER), 20);
        assert_eq!(health(&engine, goblin), 6);
        assert_eq!(engine.state().round, 2);
    }

    #[test]
    fn poison_ticks_at_owner_turn_start() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let (mut engine, _) = start(&catalog, &hero(), &[TROLL]);
        let troll = EntityId::opponent(0);

        engine
            .submit(CombatAction::skill(VENOM, Some(troll)), &env)
            .unwrap();
        assert_eq!(health(&engine, troll), 48);
        let poison: StatusId = POISON;
        assert_eq!(
            engine
                .state()
                .participant(troll)
                .unwrap()
                .statuses
                .get(poison)
                .map(|s| s.remaining),
            Some(2)
        );

        engine.submit(CombatAction::Wait, &env).unwrap();
        engine.submit(CombatAction::Wait, &env).unwrap();
        assert_eq!(health(&engine, troll), 44);
        assert!(engine.state().participant(troll).unwrap().statuses.is_empty());
    }

    #[test]
    fn cooldown_blocks_reuse_until_it_expires() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let (mut engine, _) = start(&catalog, &hero(), &[TROLL]);

        engine
            .submit(CombatAction::skill(FIREBALL, None), &env)
            .unwrap();
        let error = engine
            .submit(CombatAction::skill(FIREBALL, None), &env)
            .unwrap_err();
        assert!(matches!(error, CombatError::IllegalAction {
            reason: IllegalAction::OnCooldown { remaining: 1, .. },
            ..
        }));

        engine.submit(CombatAction::Wait, &env).unwrap();
        engine
            .submit(CombatAction::skill(FIREBALL, None), &env)
            .unwrap();
        assert_eq!(health(&engine, EntityId::opponent(0)), 34);
    }

    #[test]
    fn flee_always_ends_the_encounter() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);

        let (mut engine, _) = start(&catalog, &hero(), &[GOBLIN]);
        engine.submit(CombatAction::Flee, &env).unwrap();
        assert_eq!(engine.outcome(), Outcome::Fled);
        assert!(engine.result().unwrap().rewards.is_none());

        let (mut engine, _) = start(&catalog, &hero(), &[DRAGON]);
        engine.submit(CombatAction::Flee, &env).unwrap();
        assert_eq!(engine.outcome(), Outcome::Fled);
    }

    #[test]
    fn items_are_consumed_from_the_encounter_inventory() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let player = hero();
        let (mut engine, _) = start(&catalog, &player, &[GOBLIN]);

        engine.submit(CombatAction::Wait, &env).unwrap();
        let events = engine
            .submit(CombatAction::item(POTION, None), &env)
            .unwrap();
        assert!(events.contains(&CombatEvent::Healed {
            source: EntityId::PLAYER,
            target: EntityId::PLAYER,
            amount: 8,
        }));
        assert_eq!(engine.state().inventory.count(POTION), 1);
        assert_eq!(player.inventory.count(POTION), 2);

        for (item, reason) in [
            (SHIELD, IllegalAction::ItemNotUsable(SHIELD)),
            (KEY, IllegalAction::ItemNotHeld(KEY)),
        ] {
            let error = engine
                .submit(CombatAction::item(item, None), &env)
                .unwrap_err();
            assert!(
                matches!(error, CombatError::IllegalAction { reason: r, .. } if r == reason)
            );
        }
    }

    #[test]
    fn invalid_targets_are_rejected() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let (mut engine, _) = start(&catalog, &hero(), &[GOBLIN]);

        for target in [None, Some(EntityId::PLAYER), Some(EntityId::opponent(7))] {
            let error = engine
                .submit(CombatAction::skill(STRIKE, target), &env)
                .unwrap_err();
            assert!(matches!(error, CombatError::InvalidTarget { .. }));
        }
        assert!(engine.awaiting_player());
    }

    #[test]
    fn encounter_terminates_under_monotonic_damage() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let (mut engine, _) = start(&catalog, &hero(), &[GOBLIN, RAT]);

        let mut submissions = 0;
        while !engine.is_concluded() {
            let target = engine
                .state()
                .living_enemies_of(EntityId::PLAYER)
                .first()
                .map(|c| c.id);
            engine
                .submit(CombatAction::skill(STRIKE, target), &env)
                .unwrap();
            submissions += 1;
            assert!(submissions < 20, "encounter did not terminate");
        }
        assert_eq!(engine.outcome(), Outcome::Victory);

        let error = engine.submit(CombatAction::Wait, &env).unwrap_err();
        assert!(matches!(error, CombatError::IllegalAction {
            reason: IllegalAction::EncounterConcluded,
            ..
        }));
    }

    #[test]
    fn turn_limit_is_an_invariant_violation() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let rules = CombatRules {
            max_turns: 6,
            ..CombatRules::default()
        };
        let (mut engine, _) = CombatEngine::start(&hero(), &[TROLL], &env, rules).unwrap();

        let mut result = Ok(Vec::new());
        for _ in 0..5 {
            result = engine.submit(CombatAction::Wait, &env);
            if result.is_err() {
                break;
            }
        }
        let error = result.unwrap_err();
        assert!(error.is_fatal());
        assert!(matches!(error, CombatError::InvariantViolation { .. }));
    }

    #[test]
    fn empty_opponent_list_is_rejected() {
        let catalog = fixtures::catalog();
        let env = GameEnv::from_catalog(&catalog);
        let result = CombatEngine::start(&hero(), &[], &env, CombatRules::default());
        assert!(matches!(result, Err(CombatError::IllegalAction {
            reason: IllegalAction::NoOpponents,
            ..
        })));
    }
}
