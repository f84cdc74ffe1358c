//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for the RON/TOML data files and the load-time
//! validation every catalog must pass before an encounter can start:
//! - Skill, effect and status catalogs (RON)
//! - Item catalogs (RON)
//! - Opponent templates (RON)
//! - Game configuration (TOML)
//!
//! Content is consumed through runtime oracles and never appears in game state.

pub mod validate;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use validate::{ValidationError, ValidationIssue, validate_catalog};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, EffectLoader, ItemLoader, LoadResult,
    OpponentLoader, SkillLoader, StatusLoader,
};
