//! Content loaders for reading game data from files.
//!
//! Each loader converts one RON/TOML file into game-core definitions.
//! [`ContentFactory`] loads a whole data directory and validates it.

pub mod catalogs;
pub mod config;
pub mod factory;

pub use catalogs::{EffectLoader, ItemLoader, OpponentLoader, SkillLoader, StatusLoader};
pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Parses a RON document holding a single list of definitions.
pub(crate) fn parse_ron<T: DeserializeOwned>(content: &str, what: &str) -> LoadResult<T> {
    ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))
}
