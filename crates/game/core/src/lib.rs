//! Deterministic rules for turn-based tactical combat.
//!
//! `game-core` defines the canonical rules (effect resolution, the combat
//! turn loop, the top-level phase machine) and exposes pure APIs reused by the
//! runtime and offline tools. All game state mutation flows through
//! [`machine::GameStateMachine`]; content is read through the oracles in
//! [`env`]. The crate performs no I/O.
pub mod combat;
pub mod config;
pub mod effect;
pub mod env;
pub mod error;
pub mod machine;
pub mod state;

#[cfg(test)]
mod fixtures;

pub use combat::{
    AiPolicy, CombatAction, CombatEngine, CombatError, CombatEvent, CombatPhase, Combatant,
    EncounterResult, EncounterState, IllegalAction, Outcome, Rewards, Side, SkipReason,
};
pub use config::{CombatRules, GameConfig, ProgressionRules, SkillUnlock, StartingPlayer};
pub use effect::{
    Attribute, Delta, DeltaKind, EffectDefinition, EffectKind, ResolutionMode, ResolveContext,
    ResolveError,
};
pub use env::{
    ContentCatalog, EffectOracle, EquipmentBonus, GameEnv, ItemDefinition, ItemDrop, ItemKind,
    ItemOracle, OpponentOracle, OpponentTemplate, OracleError, PeriodicEffect, SkillDefinition,
    SkillOracle, StackingPolicy, StatusFlags, StatusOracle, StatusTemplate, TargetingMode,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use machine::{
    GameStateMachine, MachineError, PhaseTransition, ProgressionError, ProgressionEvent,
    StepOutcome,
};
pub use state::{
    BoardPosition, EffectId, EntityId, FlagValue, GameState, InventoryError, InventorySlot,
    InventoryState, ItemId, OpponentTemplateId, Phase, Player, ProgressFlags, ResourceMeter,
    SkillId, SnapshotError, StatusEffect, StatusEffects, StatusId,
};
