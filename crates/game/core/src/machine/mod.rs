//! Top-level game state machine.
//!
//! Phases move `Exploration → Encounter → (Exploration | GameOver)` and
//! `Exploration → Victory`. Every transition yields a [`PhaseTransition`]
//! carrying the resting snapshot to persist; nothing is ever persisted
//! mid-encounter. When an encounter starts, the snapshot is the exploration
//! state at the boundary, so a resumed session never starts mid-turn.
mod errors;
pub mod progression;

pub use errors::{MachineError, ProgressionError};
pub use progression::ProgressionEvent;

use crate::combat::{CombatAction, CombatEngine, CombatError, CombatEvent, Outcome};
use crate::config::GameConfig;
use crate::effect::Delta;
use crate::env::GameEnv;
use crate::error::{ErrorContext, GameError};
use crate::state::{
    BoardPosition, FlagValue, GameState, ItemId, OpponentTemplateId, Phase, Player, SkillId,
};

/// A phase change together with the snapshot to persist for it.
///
/// `snapshot.phase` is always a resting phase: entering an encounter carries
/// the exploration state at the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    pub snapshot: GameState,
}

/// Everything one machine step produced, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub events: Vec<CombatEvent>,
    pub progression: Vec<ProgressionEvent>,
    pub transitions: Vec<PhaseTransition>,
}

impl StepOutcome {
    fn with_events(events: Vec<CombatEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// The outcome, if this step concluded the encounter.
    pub fn concluded(&self) -> Option<Outcome> {
        self.events.iter().find_map(|event| match event {
            CombatEvent::EncounterConcluded { outcome, .. } => Some(*outcome),
            _ => None,
        })
    }
}

struct ActiveEncounter {
    engine: CombatEngine,
    /// Exploration state persisted at the encounter boundary.
    checkpoint: GameState,
}

/// Sole owner and mutator of the [`GameState`].
pub struct GameStateMachine {
    state: GameState,
    config: GameConfig,
    encounter: Option<ActiveEncounter>,
}

impl GameStateMachine {
    /// Starts a new game from the configured starting player.
    ///
    /// # Errors
    ///
    /// Returns an error if a starting skill or item is missing from the catalog.
    pub fn new_game(config: GameConfig, env: &GameEnv<'_>) -> Result<Self, MachineError> {
        let state = fresh_state(&config, env)?;
        Ok(Self {
            state,
            config,
            encounter: None,
        })
    }

    /// Starts a new game whose first snapshot sorts after `previous`.
    ///
    /// Used when earlier saves exist but cannot be resumed.
    pub fn new_game_after(
        config: GameConfig,
        env: &GameEnv<'_>,
        previous: u64,
    ) -> Result<Self, MachineError> {
        let mut machine = Self::new_game(config, env)?;
        machine.state.sequence = previous + 1;
        Ok(machine)
    }

    /// Resumes from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::CorruptSnapshot` if the snapshot breaks an invariant.
    pub fn resume(snapshot: GameState, config: GameConfig) -> Result<Self, MachineError> {
        snapshot.validate()?;
        Ok(Self {
            state: snapshot,
            config,
            encounter: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn encounter(&self) -> Option<&CombatEngine> {
        self.encounter.as_ref().map(|active| &active.engine)
    }

    /// The current state if it may be persisted (any phase but `Encounter`).
    pub fn snapshot(&self) -> Option<&GameState> {
        (self.state.phase != Phase::Encounter).then_some(&self.state)
    }

    fn require(&self, expected: Phase) -> Result<(), MachineError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(MachineError::WrongPhase {
                expected,
                actual: self.state.phase,
            })
        }
    }

    // ========================================================================
    // Encounters
    // ========================================================================

    /// Starts an encounter against the given opponent templates.
    ///
    /// Opponents faster than the player act before this returns, so the
    /// encounter may already be concluded.
    pub fn enter_encounter(
        &mut self,
        opponents: &[OpponentTemplateId],
        env: &GameEnv<'_>,
    ) -> Result<StepOutcome, MachineError> {
        self.require(Phase::Exploration)?;

        let mut checkpoint = self.state.clone();
        checkpoint.sequence += 1;
        let (engine, events) =
            CombatEngine::start(&checkpoint.player, opponents, env, self.config.combat)?;

        self.state = checkpoint.clone();
        self.state.phase = Phase::Encounter;

        let mut outcome = StepOutcome::with_events(events);
        outcome.transitions.push(PhaseTransition {
            from: Phase::Exploration,
            to: Phase::Encounter,
            snapshot: checkpoint.clone(),
        });
        self.encounter = Some(ActiveEncounter { engine, checkpoint });
        self.finish_if_concluded(env, &mut outcome)?;
        Ok(outcome)
    }

    /// Submits the player's action to the running encounter.
    ///
    /// Recoverable errors leave everything untouched. Internal or fatal
    /// combat errors abort the encounter and restore the boundary snapshot.
    pub fn submit_action(
        &mut self,
        action: CombatAction,
        env: &GameEnv<'_>,
    ) -> Result<StepOutcome, MachineError> {
        self.require(Phase::Encounter)?;
        let active = self.encounter.as_mut().ok_or(MachineError::NoEncounter)?;

        match active.engine.submit(action, env) {
            Ok(events) => {
                let mut outcome = StepOutcome::with_events(events);
                self.finish_if_concluded(env, &mut outcome)?;
                Ok(outcome)
            }
            Err(error) if error.severity().is_internal() => Err(self.abort(error)),
            Err(error) => Err(error.into()),
        }
    }

    fn abort(&mut self, source: CombatError) -> MachineError {
        let checkpoint = match self.encounter.take() {
            Some(active) => active.checkpoint,
            None => {
                let mut state = self.state.clone();
                state.phase = Phase::Exploration;
                state
            }
        };
        self.roll_back(checkpoint, source)
    }

    fn roll_back(&mut self, checkpoint: GameState, source: CombatError) -> MachineError {
        self.state = checkpoint.clone();
        MachineError::EncounterAborted {
            source,
            transition: Box::new(PhaseTransition {
                from: Phase::Encounter,
                to: Phase::Exploration,
                snapshot: checkpoint,
            }),
        }
    }

    fn finish_if_concluded(
        &mut self,
        env: &GameEnv<'_>,
        outcome: &mut StepOutcome,
    ) -> Result<(), MachineError> {
        let Some(result) = self
            .encounter
            .as_ref()
            .and_then(|active| active.engine.result())
        else {
            return Ok(());
        };
        if !result.outcome.is_concluded() {
            return Ok(());
        }
        let Some(active) = self.encounter.take() else {
            return Ok(());
        };

        let mut state = active.checkpoint.clone();
        state.player.health = result.health;
        state.player.resource = result.resource;
        state.player.inventory = result.inventory;
        state.player.status_effects.clear();

        match result.outcome {
            Outcome::Defeat => {
                state.phase = Phase::GameOver;
                state.sequence += 1;
                outcome.transitions.push(PhaseTransition {
                    from: Phase::Encounter,
                    to: Phase::GameOver,
                    snapshot: state.clone(),
                });
            }
            _ => {
                if let Some(rewards) = &result.rewards
                    && let Err(error) = progression::apply_rewards(
                        &mut state,
                        rewards,
                        &self.config.progression,
                        env,
                        &mut outcome.progression,
                    )
                {
                    let source = match error {
                        ProgressionError::Oracle(error) => CombatError::Oracle(error),
                        error => CombatError::invariant(error.to_string(), ErrorContext::default()),
                    };
                    return Err(self.roll_back(active.checkpoint, source));
                }
                state.phase = Phase::Exploration;
                state.sequence += 1;
                outcome.transitions.push(PhaseTransition {
                    from: Phase::Encounter,
                    to: Phase::Exploration,
                    snapshot: state.clone(),
                });
                if let Some(transition) = self.check_victory(&mut state) {
                    outcome.transitions.push(transition);
                }
            }
        }

        self.state = state;
        Ok(())
    }

    fn check_victory(&self, state: &mut GameState) -> Option<PhaseTransition> {
        if state.phase != Phase::Exploration || !state.flags.is_set(&self.config.victory_flag) {
            return None;
        }
        state.phase = Phase::Victory;
        state.sequence += 1;
        Some(PhaseTransition {
            from: Phase::Exploration,
            to: Phase::Victory,
            snapshot: state.clone(),
        })
    }

    // ========================================================================
    // Restart / Reset
    // ========================================================================

    /// Leaves `GameOver` by reloading a persisted exploration snapshot.
    pub fn restart(&mut self, snapshot: GameState) -> Result<PhaseTransition, MachineError> {
        self.require(Phase::GameOver)?;
        snapshot.validate()?;
        if snapshot.phase != Phase::Exploration {
            return Err(MachineError::WrongPhase {
                expected: Phase::Exploration,
                actual: snapshot.phase,
            });
        }

        let mut state = snapshot;
        state.sequence = self.state.sequence + 1;
        self.state = state.clone();
        Ok(PhaseTransition {
            from: Phase::GameOver,
            to: Phase::Exploration,
            snapshot: state,
        })
    }

    /// Discards everything and starts over from the starting player.
    pub fn reset(&mut self, env: &GameEnv<'_>) -> Result<PhaseTransition, MachineError> {
        let mut state = fresh_state(&self.config, env)?;
        state.sequence = self.state.sequence + 1;
        let from = self.state.phase;
        self.encounter = None;
        self.state = state.clone();
        Ok(PhaseTransition {
            from,
            to: Phase::Exploration,
            snapshot: state,
        })
    }

    // ========================================================================
    // Progression (exploration only)
    // ========================================================================

    pub fn grant_experience(
        &mut self,
        amount: u32,
        env: &GameEnv<'_>,
    ) -> Result<Vec<ProgressionEvent>, MachineError> {
        self.require(Phase::Exploration)?;
        let mut events = Vec::new();
        progression::grant_experience(
            &mut self.state.player,
            amount,
            &self.config.progression,
            env,
            &mut events,
        );
        Ok(events)
    }

    /// Returns the number of items actually added.
    pub fn acquire_item(
        &mut self,
        item: ItemId,
        count: u32,
        env: &GameEnv<'_>,
    ) -> Result<u32, MachineError> {
        self.require(Phase::Exploration)?;
        Ok(progression::acquire_item(
            &mut self.state.player,
            item,
            count,
            env,
        )?)
    }

    pub fn learn_skill(&mut self, skill: SkillId, env: &GameEnv<'_>) -> Result<bool, MachineError> {
        self.require(Phase::Exploration)?;
        Ok(progression::learn_skill(&mut self.state.player, skill, env)?)
    }

    pub fn use_item(&mut self, item: ItemId, env: &GameEnv<'_>) -> Result<Vec<Delta>, MachineError> {
        self.require(Phase::Exploration)?;
        Ok(progression::use_item(
            &mut self.state.player,
            item,
            env,
            &self.config.combat,
        )?)
    }

    pub fn equip(&mut self, item: ItemId, env: &GameEnv<'_>) -> Result<(), MachineError> {
        self.require(Phase::Exploration)?;
        Ok(progression::set_equipped(&mut self.state.player, item, true, env)?)
    }

    pub fn unequip(&mut self, item: ItemId, env: &GameEnv<'_>) -> Result<(), MachineError> {
        self.require(Phase::Exploration)?;
        Ok(progression::set_equipped(&mut self.state.player, item, false, env)?)
    }

    pub fn move_to(&mut self, position: BoardPosition) -> Result<(), MachineError> {
        self.require(Phase::Exploration)?;
        self.state.player.position = position;
        Ok(())
    }

    /// Sets a progress flag. Setting the victory flag ends the game.
    pub fn set_flag(
        &mut self,
        name: &str,
        value: impl Into<FlagValue>,
    ) -> Result<Option<PhaseTransition>, MachineError> {
        self.require(Phase::Exploration)?;
        self.state.flags.set(name, value);

        let mut state = self.state.clone();
        let transition = self.check_victory(&mut state);
        self.state = state;
        Ok(transition)
    }
}

fn fresh_state(config: &GameConfig, env: &GameEnv<'_>) -> Result<GameState, MachineError> {
    let starting = &config.starting_player;
    for &skill in &starting.skills {
        env.skill(skill)?;
    }

    let mut player = Player::from_template(starting);
    for &(item, count) in &starting.items {
        progression::acquire_item(&mut player, item, count, env)?;
    }
    Ok(GameState::new(player))
}
