//! Content factory for building the catalog from data files.

use std::path::{Path, PathBuf};

use game_core::{ContentCatalog, GameConfig};

use crate::loaders::{
    ConfigLoader, EffectLoader, ItemLoader, LoadResult, OpponentLoader, SkillLoader, StatusLoader,
};
use crate::validate::validate_catalog;

/// Validated configuration and content loaded from one data directory.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub config: GameConfig,
    pub catalog: ContentCatalog,
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── skills.ron
/// ├── effects.ron
/// ├── statuses.ron
/// ├── items.ron
/// └── opponents.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<game_core::SkillDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load effect catalog from `effects.ron`.
    pub fn load_effects(&self) -> LoadResult<Vec<game_core::EffectDefinition>> {
        EffectLoader::load(&self.data_dir.join("effects.ron"))
    }

    /// Load status catalog from `statuses.ron`.
    pub fn load_statuses(&self) -> LoadResult<Vec<game_core::StatusTemplate>> {
        StatusLoader::load(&self.data_dir.join("statuses.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<game_core::ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load opponent templates from `opponents.ron`.
    pub fn load_opponents(&self) -> LoadResult<Vec<game_core::OpponentTemplate>> {
        OpponentLoader::load(&self.data_dir.join("opponents.ron"))
    }

    /// Load every catalog file into a [`ContentCatalog`].
    ///
    /// Duplicate ids within a file are rejected. Cross-references are not
    /// checked; use [`ContentFactory::load`] for a validated bundle.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let mut catalog = ContentCatalog::new();

        for skill in self.load_skills()? {
            let id = skill.id;
            if catalog.skills.insert(id, skill).is_some() {
                anyhow::bail!("Duplicate skill id {:?} in skills.ron", id);
            }
        }
        for effect in self.load_effects()? {
            let id = effect.id;
            if catalog.effects.insert(id, effect).is_some() {
                anyhow::bail!("Duplicate effect id {:?} in effects.ron", id);
            }
        }
        for status in self.load_statuses()? {
            let id = status.id;
            if catalog.statuses.insert(id, status).is_some() {
                anyhow::bail!("Duplicate status id {:?} in statuses.ron", id);
            }
        }
        for item in self.load_items()? {
            let id = item.id;
            if catalog.items.insert(id, item).is_some() {
                anyhow::bail!("Duplicate item id {:?} in items.ron", id);
            }
        }
        for opponent in self.load_opponents()? {
            let id = opponent.id;
            if catalog.opponents.insert(id, opponent).is_some() {
                anyhow::bail!("Duplicate opponent id {:?} in opponents.ron", id);
            }
        }

        Ok(catalog)
    }

    /// Load configuration and catalog, then validate every cross-reference.
    pub fn load(&self) -> LoadResult<ContentBundle> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        validate_catalog(&catalog, &config)?;

        tracing::info!(
            data_dir = %self.data_dir.display(),
            skills = catalog.skills.len(),
            items = catalog.items.len(),
            opponents = catalog.opponents.len(),
            "content loaded"
        );

        Ok(ContentBundle { config, catalog })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
