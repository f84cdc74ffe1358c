//! Turn-based combat.
//!
//! The [`CombatEngine`] owns a detached [`EncounterState`] built from copies
//! of the player and opponent templates. It validates actions, resolves them
//! through [`crate::effect`], and reports everything as ordered
//! [`CombatEvent`]s. The game state is only touched when the state machine
//! writes an [`EncounterResult`] back.
mod action;
mod combatant;
mod encounter;
mod engine;
mod errors;
mod events;
mod policy;
mod rewards;
mod turns;

pub use action::CombatAction;
pub use combatant::{Combatant, Side};
pub use encounter::{CombatPhase, EncounterState, Outcome};
pub use engine::{CombatEngine, EncounterResult};
pub use errors::{CombatError, IllegalAction};
pub use events::{CombatEvent, SkipReason};
pub use policy::AiPolicy;
pub use rewards::Rewards;
pub use turns::compute_turn_order;
