//! Runtime access to static game content.
//!
//! [`OracleManager`] owns the validated [`ContentCatalog`] behind an `Arc` so
//! sessions and tools can share it, and builds [`GameEnv`] views on demand.
//! The data is immutable at runtime; dynamic state lives in repositories or
//! [`game_core::GameState`].

use std::path::Path;
use std::sync::Arc;

use game_content::{ContentBundle, ContentFactory};
use game_core::{ContentCatalog, GameConfig, GameEnv};

use crate::api::{Result, RuntimeError};

/// Manages the content catalog and provides unified oracle access
#[derive(Clone, Debug)]
pub struct OracleManager {
    catalog: Arc<ContentCatalog>,
}

impl OracleManager {
    /// Wraps an already validated catalog.
    pub fn new(catalog: ContentCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Loads and validates content from a data directory.
    ///
    /// Returns the game configuration found alongside the catalogs.
    pub fn load(content_dir: &Path) -> Result<(Self, GameConfig)> {
        let ContentBundle { config, catalog } = ContentFactory::new(content_dir)
            .load()
            .map_err(|e| RuntimeError::Content(format!("{:#}", e)))?;
        Ok((Self::new(catalog), config))
    }

    /// Converts the catalog into a GameEnv for game-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        GameEnv::from_catalog(&self.catalog)
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }
}
