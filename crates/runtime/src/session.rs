//! Game session orchestration.
//!
//! [`GameSession`] owns the [`GameStateMachine`], persists every phase
//! transition, and publishes combat, progression, and phase events on the
//! [`EventBus`]. Only one step runs at a time; the single await point is the
//! player's action selection in [`GameSession::drive_encounter`].

use std::sync::Arc;

use game_core::{
    BoardPosition, CombatAction, Delta, FlagValue, GameConfig, GameError, GameState,
    GameStateMachine, ItemId, MachineError, OpponentTemplateId, Outcome, Phase, PhaseTransition,
    ProgressionEvent, SkillId, StepOutcome,
};

use crate::api::{BoardCollaborator, NullBoard, PlayerInput, Result, RuntimeError};
use crate::events::{Event, EventBus, PhaseEvent};
use crate::oracle::OracleManager;
use crate::repository::SnapshotRepository;

/// One player's game: state machine, content, persistence, and observers.
pub struct GameSession {
    machine: GameStateMachine,
    oracles: OracleManager,
    repository: Option<Arc<dyn SnapshotRepository>>,
    bus: EventBus,
    board: Box<dyn BoardCollaborator>,
    /// Outcome of the most recent encounter, once it has concluded.
    last_outcome: Option<Outcome>,
}

impl GameSession {
    /// Starts a fresh game and persists its first snapshot.
    pub fn new_game(
        config: GameConfig,
        oracles: OracleManager,
        repository: Option<Arc<dyn SnapshotRepository>>,
        bus: EventBus,
    ) -> Result<Self> {
        let machine = GameStateMachine::new_game(config, &oracles.as_game_env())?;
        let session = Self::with_machine(machine, oracles, repository, bus);
        session.persist_current()?;
        Ok(session)
    }

    /// Resumes the most recent snapshot, or starts a new game if there is none.
    ///
    /// A save that fails its checksum or invariant checks is reported on the
    /// bus and replaced by a new game whose sequence sorts after it.
    pub fn load_or_new(
        config: GameConfig,
        oracles: OracleManager,
        repository: Arc<dyn SnapshotRepository>,
        bus: EventBus,
    ) -> Result<Self> {
        let reason = match repository.latest() {
            Ok(Some((sequence, snapshot))) => {
                match GameStateMachine::resume(snapshot, config.clone()) {
                    Ok(machine) => {
                        tracing::info!(sequence, phase = %machine.phase(), "Resumed saved game");
                        return Ok(Self::with_machine(
                            machine,
                            oracles,
                            Some(repository),
                            bus,
                        ));
                    }
                    Err(error) => error.to_string(),
                }
            }
            Ok(None) => {
                tracing::info!("No saved game found, starting a new one");
                return Self::new_game(config, oracles, Some(repository), bus);
            }
            Err(error) if error.is_corruption() => error.to_string(),
            Err(error) => return Err(error.into()),
        };

        tracing::warn!(%reason, "Saved game is corrupt, starting a new game");
        bus.publish(Event::Phase(PhaseEvent::SaveDiscarded {
            reason: reason.clone(),
        }));

        let previous = repository.list_sequences()?.last().copied().unwrap_or(0);
        let machine = GameStateMachine::new_game_after(config, &oracles.as_game_env(), previous)?;
        let session = Self::with_machine(machine, oracles, Some(repository), bus);
        session.persist_current()?;
        Ok(session)
    }

    fn with_machine(
        machine: GameStateMachine,
        oracles: OracleManager,
        repository: Option<Arc<dyn SnapshotRepository>>,
        bus: EventBus,
    ) -> Self {
        Self {
            machine,
            oracles,
            repository,
            bus,
            board: Box::new(NullBoard),
            last_outcome: None,
        }
    }

    /// Installs the board collaborator notified when exploration resumes.
    pub fn with_board(mut self, board: impl BoardCollaborator + 'static) -> Self {
        self.board = Box::new(board);
        self
    }

    pub fn state(&self) -> &GameState {
        self.machine.state()
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn machine(&self) -> &GameStateMachine {
        &self.machine
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    // ========================================================================
    // Encounters
    // ========================================================================

    /// Starts an encounter triggered by the board.
    pub fn enter_encounter(&mut self, opponents: &[OpponentTemplateId]) -> Result<StepOutcome> {
        let env = self.oracles.as_game_env();
        let outcome = match self.machine.enter_encounter(opponents, &env) {
            Ok(outcome) => outcome,
            Err(error) => {
                self.record_abort(&error)?;
                return Err(error.into());
            }
        };
        tracing::info!(opponents = opponents.len(), "Encounter started");
        self.last_outcome = None;
        self.dispatch(&outcome)?;
        Ok(outcome)
    }

    /// Submits one player action.
    ///
    /// Recoverable rejections leave the encounter untouched. A fatal error
    /// rolls back to the pre-encounter snapshot, which is persisted before the
    /// error is returned.
    pub fn submit_action(&mut self, action: CombatAction) -> Result<StepOutcome> {
        let env = self.oracles.as_game_env();
        match self.machine.submit_action(action, &env) {
            Ok(outcome) => {
                self.dispatch(&outcome)?;
                Ok(outcome)
            }
            Err(error) => {
                if !self.record_abort(&error)? {
                    tracing::warn!(
                        code = error.error_code(),
                        action = action.as_str(),
                        %error,
                        "Action rejected"
                    );
                }
                Err(error.into())
            }
        }
    }

    /// Runs the current encounter to its end, asking `input` for every player
    /// action. Rejected actions are reported back and the player is asked
    /// again.
    ///
    /// Returns immediately if the encounter already concluded on entry.
    pub async fn drive_encounter(&mut self, input: &dyn PlayerInput) -> Result<Outcome> {
        while let Some(engine) = self.machine.encounter() {
            let action = input.choose_action(engine.state()).await?;
            match self.submit_action(action) {
                Ok(_) => {}
                Err(error) if error.is_recoverable() => input.action_rejected(&error).await,
                Err(error) => return Err(error),
            }
        }
        self.last_outcome
            .ok_or(RuntimeError::Machine(MachineError::NoEncounter))
    }

    /// Outcome of the most recent encounter, once it has concluded.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    // ========================================================================
    // Game over / reset
    // ========================================================================

    /// Leaves game over by reloading the latest exploration snapshot.
    ///
    /// Falls back to a new game when no usable snapshot exists.
    pub fn restart(&mut self) -> Result<PhaseTransition> {
        if self.machine.phase() != Phase::GameOver {
            return Err(MachineError::WrongPhase {
                expected: Phase::GameOver,
                actual: self.machine.phase(),
            }
            .into());
        }

        let snapshot = match &self.repository {
            Some(repository) => match repository.latest_in_phase(Phase::Exploration) {
                Ok(found) => found.map(|(_, state)| state),
                Err(error) if error.is_corruption() => {
                    tracing::warn!(%error, "Checkpoint is corrupt, resetting instead");
                    None
                }
                Err(error) => return Err(error.into()),
            },
            None => None,
        };

        let transition = match snapshot {
            Some(snapshot) => self.machine.restart(snapshot)?,
            None => self.machine.reset(&self.oracles.as_game_env())?,
        };
        self.record_transition(&transition)?;
        Ok(transition)
    }

    /// Abandons the current game and starts over.
    pub fn reset(&mut self) -> Result<PhaseTransition> {
        let transition = self.machine.reset(&self.oracles.as_game_env())?;
        self.record_transition(&transition)?;
        Ok(transition)
    }

    // ========================================================================
    // Exploration
    // ========================================================================

    pub fn move_to(&mut self, position: BoardPosition) -> Result<()> {
        self.machine.move_to(position)?;
        Ok(())
    }

    pub fn grant_experience(&mut self, amount: u32) -> Result<Vec<ProgressionEvent>> {
        let events = self
            .machine
            .grant_experience(amount, &self.oracles.as_game_env())?;
        self.publish_progression(&events);
        Ok(events)
    }

    pub fn acquire_item(&mut self, item: ItemId, count: u32) -> Result<u32> {
        let added = self
            .machine
            .acquire_item(item, count, &self.oracles.as_game_env())?;
        if added > 0 {
            self.publish_progression(&[ProgressionEvent::ItemAcquired { item, count: added }]);
        }
        Ok(added)
    }

    pub fn learn_skill(&mut self, skill: SkillId) -> Result<bool> {
        let learned = self.machine.learn_skill(skill, &self.oracles.as_game_env())?;
        if learned {
            self.publish_progression(&[ProgressionEvent::SkillLearned { skill }]);
        }
        Ok(learned)
    }

    pub fn use_item(&mut self, item: ItemId) -> Result<Vec<Delta>> {
        Ok(self.machine.use_item(item, &self.oracles.as_game_env())?)
    }

    pub fn equip(&mut self, item: ItemId) -> Result<()> {
        Ok(self.machine.equip(item, &self.oracles.as_game_env())?)
    }

    pub fn unequip(&mut self, item: ItemId) -> Result<()> {
        Ok(self.machine.unequip(item, &self.oracles.as_game_env())?)
    }

    /// Sets a progress flag; the victory flag ends the game.
    pub fn set_flag(
        &mut self,
        name: &str,
        value: impl Into<FlagValue>,
    ) -> Result<Option<PhaseTransition>> {
        let transition = self.machine.set_flag(name, value)?;
        self.publish_progression(&[ProgressionEvent::FlagSet {
            name: name.to_string(),
        }]);
        if let Some(transition) = &transition {
            self.record_transition(transition)?;
        }
        Ok(transition)
    }

    /// Persists the current resting state under its sequence.
    pub fn save(&self) -> Result<()> {
        self.persist_current()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn dispatch(&mut self, outcome: &StepOutcome) -> Result<()> {
        for event in &outcome.events {
            self.bus.publish(Event::Combat(event.clone()));
        }
        self.publish_progression(&outcome.progression);

        if let Some(result) = outcome.concluded() {
            tracing::info!(outcome = %result, "Encounter concluded");
            self.last_outcome = Some(result);
            self.bus
                .publish(Event::Phase(PhaseEvent::EncounterFinished { outcome: result }));
        }

        for transition in &outcome.transitions {
            self.record_transition(transition)?;
        }

        if matches!(outcome.concluded(), Some(Outcome::Victory | Outcome::Fled)) {
            let player = &self.machine.state().player;
            self.board.on_exploration_resume(player, player.position);
        }
        Ok(())
    }

    /// Persists the rollback carried by an aborted encounter. Returns whether
    /// `error` was an abort.
    fn record_abort(&self, error: &MachineError) -> Result<bool> {
        let Some(transition) = error.transition() else {
            return Ok(false);
        };
        tracing::error!(
            code = error.error_code(),
            %error,
            "Encounter aborted, restoring the pre-encounter snapshot"
        );
        self.bus.publish(Event::Phase(PhaseEvent::EncounterAborted {
            reason: error.to_string(),
            sequence: transition.snapshot.sequence,
        }));
        self.record_transition(transition)?;
        Ok(true)
    }

    fn publish_progression(&self, events: &[ProgressionEvent]) {
        for event in events {
            self.bus.publish(Event::Progression(event.clone()));
        }
    }

    fn record_transition(&self, transition: &PhaseTransition) -> Result<()> {
        let sequence = transition.snapshot.sequence;
        tracing::info!(
            from = %transition.from,
            to = %transition.to,
            sequence,
            "Phase changed"
        );
        self.bus.publish(Event::Phase(PhaseEvent::Changed {
            from: transition.from,
            to: transition.to,
            sequence,
        }));
        self.persist(&transition.snapshot)
    }

    fn persist_current(&self) -> Result<()> {
        match self.machine.snapshot() {
            Some(state) => self.persist(state),
            None => Ok(()),
        }
    }

    fn persist(&self, state: &GameState) -> Result<()> {
        let Some(repository) = &self.repository else {
            return Ok(());
        };
        repository.save(state.sequence, state)?;
        self.bus.publish(Event::Phase(PhaseEvent::SnapshotSaved {
            sequence: state.sequence,
            phase: state.phase,
        }));
        Ok(())
    }
}
