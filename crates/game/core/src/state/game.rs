use std::collections::BTreeMap;

use super::error::SnapshotError;
use super::types::{BoardPosition, Player};

/// Top-level game mode.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    #[default]
    Exploration,
    Encounter,
    GameOver,
    Victory,
}

impl Phase {
    /// Terminal phases only leave through restart or new game.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Value of a persisted progress marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlagValue {
    Bool(bool),
    Number(i64),
}

impl FlagValue {
    /// Truthiness: `Bool(true)` or any non-zero number.
    pub const fn is_set(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Number(value) => value != 0,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// Quest and progress markers keyed by name, ordered for deterministic encoding.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ProgressFlags(BTreeMap<String, FlagValue>);

impl ProgressFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<FlagValue> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(FlagValue::is_set)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FlagValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Canonical persisted game state.
///
/// Owned by [`crate::machine::GameStateMachine`]; combat never mutates it
/// directly. A persisted value is always at a resting phase (never
/// [`Phase::Encounter`]).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub phase: Phase,
    pub player: Player,
    pub flags: ProgressFlags,
    /// Incremented at every phase transition; used as the snapshot key.
    pub sequence: u64,
}

impl GameState {
    pub fn new(player: Player) -> Self {
        Self {
            phase: Phase::Exploration,
            player,
            flags: ProgressFlags::new(),
            sequence: 0,
        }
    }

    /// Board position of the player.
    pub fn board_position(&self) -> BoardPosition {
        self.player.position
    }

    /// Checks the invariants every persisted snapshot must satisfy.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.phase == Phase::Encounter {
            return Err(SnapshotError::MidEncounter);
        }

        let player = &self.player;
        if player.level == 0 {
            return Err(SnapshotError::InvalidLevel);
        }
        if !player.health.is_within_bounds() {
            return Err(SnapshotError::HealthOutOfBounds {
                current: player.health.current,
                maximum: player.health.maximum,
            });
        }
        if !player.resource.is_within_bounds() {
            return Err(SnapshotError::ResourceOutOfBounds {
                current: player.resource.current,
                maximum: player.resource.maximum,
            });
        }
        if self.phase == Phase::Exploration && !player.is_alive() {
            return Err(SnapshotError::DefeatedInExploration);
        }

        let mut seen = Vec::with_capacity(player.inventory.len());
        for slot in player.inventory.iter() {
            if slot.count == 0 {
                return Err(SnapshotError::EmptySlot { item: slot.item });
            }
            if seen.contains(&slot.item) {
                return Err(SnapshotError::DuplicateSlot { item: slot.item });
            }
            seen.push(slot.item);
        }

        if let Some(effect) = player
            .status_effects
            .iter()
            .find(|e| e.remaining == 0 || e.stacks == 0)
        {
            return Err(SnapshotError::ExpiredStatus {
                status: effect.status,
            });
        }

        Ok(())
    }
}
