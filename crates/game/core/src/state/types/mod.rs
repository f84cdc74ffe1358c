pub mod common;
pub mod inventory;
pub mod opponent;
pub mod player;
pub mod status;

// Re-export common types
pub use common::{
    BoardPosition, EffectId, EntityId, ItemId, OpponentTemplateId, ResourceMeter, SkillId,
    StatusId,
};

// Re-export entity types
pub use inventory::{InventoryError, InventorySlot, InventoryState};
pub use opponent::Opponent;
pub use player::Player;
pub use status::{StatusEffect, StatusEffects};
