//! RON catalog loaders, one per data file.

use std::path::Path;

use game_core::{
    EffectDefinition, ItemDefinition, OpponentTemplate, SkillDefinition, StatusTemplate,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, parse_ron, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectCatalog {
    pub effects: Vec<EffectDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub statuses: Vec<StatusTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentCatalog {
    pub opponents: Vec<OpponentTemplate>,
}

/// Loader for `skills.ron`.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let catalog: SkillCatalog = parse_ron(&read_file(path)?, "skill catalog")?;
        Ok(catalog.skills)
    }
}

/// Loader for `effects.ron`.
pub struct EffectLoader;

impl EffectLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<EffectDefinition>> {
        let catalog: EffectCatalog = parse_ron(&read_file(path)?, "effect catalog")?;
        Ok(catalog.effects)
    }
}

/// Loader for `statuses.ron`.
pub struct StatusLoader;

impl StatusLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<StatusTemplate>> {
        let catalog: StatusCatalog = parse_ron(&read_file(path)?, "status catalog")?;
        Ok(catalog.statuses)
    }
}

/// Loader for `items.ron`.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = parse_ron(&read_file(path)?, "item catalog")?;
        Ok(catalog.items)
    }
}

/// Loader for `opponents.ron`.
pub struct OpponentLoader;

impl OpponentLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<OpponentTemplate>> {
        let catalog: OpponentCatalog = parse_ron(&read_file(path)?, "opponent catalog")?;
        Ok(catalog.opponents)
    }
}
