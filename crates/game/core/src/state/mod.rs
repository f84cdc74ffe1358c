//! Authoritative game state representation.
//!
//! This module owns the entity data structures, the persisted [`GameState`]
//! and its validation. Runtime layers clone or query this state but mutate it
//! exclusively through the state machine.
pub mod error;
mod game;
#[cfg(feature = "serde")]
mod snapshot;
pub mod types;

pub use error::SnapshotError;
pub use game::{FlagValue, GameState, Phase, ProgressFlags};
#[cfg(feature = "serde")]
pub use snapshot::digest_bytes;
pub use types::{
    BoardPosition, EffectId, EntityId, InventoryError, InventorySlot, InventoryState, ItemId,
    Opponent, OpponentTemplateId, Player, ResourceMeter, SkillId, StatusEffect, StatusEffects,
    StatusId,
};
