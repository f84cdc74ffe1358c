//! Status effect instances carried by an entity.
//!
//! Templates (default duration, stacking policy, flags) live in content and
//! are looked up through [`crate::env::StatusOracle`]. The state only stores
//! live instances.
//!
//! # Turn-based Duration
//!
//! `remaining` counts the afflicted entity's own turn starts. An instance is
//! removed on the turn its duration reaches 0, so a stored instance always
//! has `remaining > 0`.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::{EntityId, StatusId};

/// A live status effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub status: StatusId,
    /// Turns left before expiry.
    pub remaining: u16,
    pub stacks: u8,
    /// Entity that applied (or last refreshed) the effect.
    pub source: EntityId,
}

impl StatusEffect {
    pub fn new(status: StatusId, remaining: u16, source: EntityId) -> Self {
        Self {
            status,
            remaining,
            stacks: 1,
            source,
        }
    }

    pub fn with_stacks(mut self, stacks: u8) -> Self {
        self.stacks = stacks;
        self
    }
}

/// Active status effects on an entity, at most one instance per template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn get(&self, status: StatusId) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.status == status)
    }

    pub fn has(&self, status: StatusId) -> bool {
        self.get(status).is_some()
    }

    /// Inserts an instance, replacing any existing instance of the same template.
    ///
    /// Returns false when the set is full and the template is not already present.
    pub fn upsert(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.status == effect.status) {
            *existing = effect;
            return true;
        }
        self.effects.try_push(effect).is_ok()
    }

    /// Removes a status effect immediately.
    pub fn remove(&mut self, status: StatusId) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.status == status)?;
        Some(self.effects.remove(index))
    }

    /// Decrements every duration by one turn and removes the instances that reach 0.
    ///
    /// Returns the expired instances in storage order.
    pub fn tick(&mut self) -> Vec<StatusEffect> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(*effect);
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_full(&self) -> bool {
        self.effects.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
