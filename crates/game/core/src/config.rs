//! Game configuration constants and tunable parameters.

use crate::state::{BoardPosition, ItemId, SkillId};

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Combat tunables consumed by the resolver and the combat engine.
    pub combat: CombatRules,

    /// Experience and level growth.
    pub progression: ProgressionRules,

    /// Player created on new game.
    pub starting_player: StartingPlayer,

    /// Progress flag whose `true` value ends the game in victory.
    pub victory_flag: String,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_INVENTORY_SLOTS: usize = 16;
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_OPPONENTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MIN_DAMAGE: u32 = 1;
    pub const DEFAULT_MAX_TURNS: u32 = 500;
    pub const DEFAULT_VICTORY_FLAG: &'static str = "final_boss_defeated";

    pub fn new() -> Self {
        Self {
            combat: CombatRules::default(),
            progression: ProgressionRules::default(),
            starting_player: StartingPlayer::default(),
            victory_flag: Self::DEFAULT_VICTORY_FLAG.to_string(),
        }
    }

    pub fn with_combat(mut self, combat: CombatRules) -> Self {
        self.combat = combat;
        self
    }

    pub fn with_starting_player(mut self, starting_player: StartingPlayer) -> Self {
        self.starting_player = starting_player;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance parameters for combat resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRules {
    /// Floor applied to damage after defense reduction.
    pub min_damage: u32,

    /// Hard cap on turns per encounter. Exceeding it is an invariant violation.
    pub max_turns: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            min_damage: GameConfig::DEFAULT_MIN_DAMAGE,
            max_turns: GameConfig::DEFAULT_MAX_TURNS,
        }
    }
}

/// Experience curve and per-level growth.
///
/// Reaching level `n + 1` from level `n` costs `n * experience_per_level`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionRules {
    pub experience_per_level: u32,
    pub health_per_level: u32,
    pub resource_per_level: u32,
    pub max_level: u32,
    /// Skills learned automatically on reaching a level.
    pub skill_unlocks: Vec<SkillUnlock>,
}

impl ProgressionRules {
    /// Experience needed to advance from `level` to `level + 1`.
    pub fn threshold(&self, level: u32) -> u32 {
        level.saturating_mul(self.experience_per_level)
    }

    /// Skills unlocked on reaching `level`.
    pub fn unlocks_at(&self, level: u32) -> impl Iterator<Item = SkillId> + '_ {
        self.skill_unlocks
            .iter()
            .filter(move |unlock| unlock.level == level)
            .flat_map(|unlock| unlock.skills.iter().copied())
    }
}

/// Skills granted when the player reaches `level`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillUnlock {
    pub level: u32,
    pub skills: Vec<SkillId>,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            experience_per_level: 100,
            health_per_level: 5,
            resource_per_level: 2,
            max_level: 50,
            skill_unlocks: Vec::new(),
        }
    }
}

/// Template for the player character created on a new game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StartingPlayer {
    pub name: String,
    pub max_health: u32,
    pub max_resource: u32,
    pub defense: u32,
    pub speed: u32,
    pub skills: Vec<SkillId>,
    pub items: Vec<(ItemId, u32)>,
    pub position: BoardPosition,
}

impl Default for StartingPlayer {
    fn default() -> Self {
        Self {
            name: "Hero".to_string(),
            max_health: 20,
            max_resource: 10,
            defense: 2,
            speed: 10,
            skills: Vec::new(),
            items: Vec::new(),
            position: BoardPosition::ORIGIN,
        }
    }
}
