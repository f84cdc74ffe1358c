//! Detached encounter state owned by the combat engine.

use crate::error::ErrorContext;
use crate::state::{EntityId, InventoryState};

use super::{CombatError, Combatant, Rewards, Side};

/// Engine stage within the turn loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    Init,
    TurnStart,
    ActionSelection,
    ActionResolution,
    TurnEnd,
    Concluded,
}

/// How an encounter ended, or `Ongoing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    #[default]
    Ongoing,
    Victory,
    Defeat,
    Fled,
}

impl Outcome {
    pub fn is_concluded(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Everything the engine mutates during one encounter.
///
/// Built from copies of the player and the opponent templates; the game
/// state is untouched until the machine writes the result back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterState {
    /// Player first, then opponents in trigger order.
    pub participants: Vec<Combatant>,
    /// Player inventory copy; consumed items are removed here.
    pub inventory: InventoryState,
    /// Fixed at start.
    pub turn_order: Vec<EntityId>,
    /// Index into `turn_order` of the acting entity.
    pub turn_index: usize,
    /// Turns started so far.
    pub turn: u32,
    /// Starts at 1; incremented each time the order wraps.
    pub round: u32,
    pub phase: CombatPhase,
    pub outcome: Outcome,
    /// Set when the encounter concludes in victory.
    pub rewards: Option<Rewards>,
}

impl EncounterState {
    pub fn new(participants: Vec<Combatant>, inventory: InventoryState) -> Self {
        Self {
            participants,
            inventory,
            turn_order: Vec::new(),
            turn_index: 0,
            turn: 0,
            round: 1,
            phase: CombatPhase::Init,
            outcome: Outcome::Ongoing,
            rewards: None,
        }
    }

    /// The entity whose turn it is.
    pub fn current_actor(&self) -> Option<EntityId> {
        self.turn_order.get(self.turn_index).copied()
    }

    pub fn participant(&self, id: EntityId) -> Option<&Combatant> {
        self.participants.iter().find(|c| c.id == id)
    }

    pub fn participant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.participants.iter_mut().find(|c| c.id == id)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.participants.iter().find(|c| c.side == Side::Player)
    }

    pub fn opponents(&self) -> impl Iterator<Item = &Combatant> {
        self.participants.iter().filter(|c| c.side == Side::Opponent)
    }

    pub fn living_enemies_of(&self, id: EntityId) -> Vec<&Combatant> {
        let Some(actor) = self.participant(id) else {
            return Vec::new();
        };
        self.participants
            .iter()
            .filter(|c| c.is_alive() && c.is_enemy_of(actor))
            .collect()
    }

    pub fn all_opponents_defeated(&self) -> bool {
        self.opponents().all(|c| !c.is_alive())
    }

    pub fn player_defeated(&self) -> bool {
        self.player().is_none_or(|p| !p.is_alive())
    }

    pub fn context(&self) -> ErrorContext {
        let context = ErrorContext::new(self.turn);
        match self.current_actor() {
            Some(actor) => context.with_actor(actor),
            None => context,
        }
    }

    /// Verifies meter bounds and turn order consistency.
    ///
    /// # Errors
    ///
    /// Returns `CombatError::InvariantViolation` describing the first broken invariant.
    pub fn check_invariants(&self) -> Result<(), CombatError> {
        for c in &self.participants {
            if !c.health.is_within_bounds() {
                return Err(CombatError::invariant(
                    format!("{} health {} out of bounds", c.id, c.health),
                    self.context(),
                ));
            }
            if !c.resource.is_within_bounds() {
                return Err(CombatError::invariant(
                    format!("{} resource {} out of bounds", c.id, c.resource),
                    self.context(),
                ));
            }
            if c.statuses.iter().any(|s| s.remaining == 0 || s.stacks == 0) {
                return Err(CombatError::invariant(
                    format!("{} carries an expired status", c.id),
                    self.context(),
                ));
            }
        }

        if self.phase == CombatPhase::Init {
            return Ok(());
        }

        let consistent = self.turn_order.len() == self.participants.len()
            && self.turn_index < self.turn_order.len()
            && self.participants.iter().all(|c| {
                self.turn_order.iter().filter(|id| **id == c.id).count() == 1
            });
        if !consistent {
            return Err(CombatError::invariant("turn order is corrupt", self.context()));
        }

        Ok(())
    }
}
