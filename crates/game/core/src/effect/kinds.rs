//! Effect definitions: the closed set of changes a skill or item can produce.

use crate::env::TargetingMode;
use crate::state::{EffectId, StatusId};

/// Immutable effect template referenced by skills and items.
///
/// Components resolve in declaration order against every selected target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub id: EffectId,
    pub targeting: TargetingMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resolution: ResolutionMode,
    pub components: Vec<EffectKind>,
}

impl EffectDefinition {
    pub fn new(id: EffectId, targeting: TargetingMode, components: Vec<EffectKind>) -> Self {
        Self {
            id,
            targeting,
            resolution: ResolutionMode::default(),
            components,
        }
    }

    pub fn with_resolution(mut self, resolution: ResolutionMode) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sum of raw damage magnitudes, before defense. Used by AI heuristics.
    pub fn damage_estimate(&self) -> u32 {
        self.components
            .iter()
            .map(|kind| match kind {
                EffectKind::Damage { amount } => *amount,
                _ => 0,
            })
            .fold(0u32, u32::saturating_add)
    }

    /// True if any component restores health.
    pub fn heals_health(&self) -> bool {
        self.components.iter().any(|kind| {
            matches!(
                kind,
                EffectKind::Heal {
                    attribute: Attribute::Health,
                    ..
                }
            )
        })
    }
}

/// How targets defeated mid-batch are treated by later components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResolutionMode {
    /// Targets defeated by an earlier delta are excluded from later components.
    #[default]
    SkipDefeated,
    /// Every component resolves against the target set selected before the batch.
    Snapshot,
}

/// Meter addressed by heal components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
    Health,
    Resource,
}

/// A single component of an effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    // ========================================================================
    // Meters
    // ========================================================================
    /// Health loss reduced by the target's effective defense.
    Damage { amount: u32 },

    /// Restores health or resource, capped at the maximum.
    Heal { attribute: Attribute, amount: u32 },

    /// Moves resource from the target to the source.
    DrainResource { amount: u32 },

    // ========================================================================
    // Status Effects
    // ========================================================================
    ApplyStatus { status: StatusId },

    RemoveStatus { status: StatusId },
}
