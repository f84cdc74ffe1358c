//! Traits describing read-only game content.
//!
//! Oracles expose skill, effect, status, item, and opponent definitions. The
//! [`GameEnv`] aggregate bundles them so the resolver, the combat engine, and
//! the state machine can look content up without coupling to a concrete store.
mod catalog;
mod effects;
mod error;
mod items;
mod opponents;
mod rng;
mod skills;
mod statuses;

pub use catalog::ContentCatalog;
pub use effects::EffectOracle;
pub use error::OracleError;
pub use items::{EquipmentBonus, ItemDefinition, ItemKind, ItemOracle};
pub use opponents::{ItemDrop, OpponentOracle, OpponentTemplate};
pub use rng::{PcgRng, compute_seed};
pub use skills::{SkillDefinition, SkillOracle, TargetingMode};
pub use statuses::{PeriodicEffect, StackingPolicy, StatusFlags, StatusOracle, StatusTemplate};

use crate::effect::EffectDefinition;
use crate::state::{EffectId, ItemId, OpponentTemplateId, SkillId, StatusId};

/// Aggregates the read-only oracles consulted during play.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    skills: &'a dyn SkillOracle,
    effects: &'a dyn EffectOracle,
    statuses: &'a dyn StatusOracle,
    items: &'a dyn ItemOracle,
    opponents: &'a dyn OpponentOracle,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        skills: &'a dyn SkillOracle,
        effects: &'a dyn EffectOracle,
        statuses: &'a dyn StatusOracle,
        items: &'a dyn ItemOracle,
        opponents: &'a dyn OpponentOracle,
    ) -> Self {
        Self {
            skills,
            effects,
            statuses,
            items,
            opponents,
        }
    }

    /// Uses one catalog for every oracle.
    pub fn from_catalog(catalog: &'a ContentCatalog) -> Self {
        Self::new(catalog, catalog, catalog, catalog, catalog)
    }

    /// Status templates, used by the resolver.
    pub fn statuses(&self) -> &'a dyn StatusOracle {
        self.statuses
    }

    /// Returns the skill definition, or an error if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::UnknownSkill` if no definition exists.
    pub fn skill(&self, id: SkillId) -> Result<&'a SkillDefinition, OracleError> {
        self.skills.skill(id).ok_or(OracleError::UnknownSkill(id))
    }

    pub fn effect(&self, id: EffectId) -> Result<&'a EffectDefinition, OracleError> {
        self.effects.effect(id).ok_or(OracleError::UnknownEffect(id))
    }

    pub fn status(&self, id: StatusId) -> Result<&'a StatusTemplate, OracleError> {
        self.statuses
            .status(id)
            .ok_or(OracleError::UnknownStatus(id))
    }

    pub fn item(&self, id: ItemId) -> Result<&'a ItemDefinition, OracleError> {
        self.items.item(id).ok_or(OracleError::UnknownItem(id))
    }

    pub fn opponent(&self, id: OpponentTemplateId) -> Result<&'a OpponentTemplate, OracleError> {
        self.opponents
            .template(id)
            .ok_or(OracleError::UnknownOpponent(id))
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv").finish_non_exhaustive()
    }
}
