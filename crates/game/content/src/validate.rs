//! Load-time validation of content catalogs.
//!
//! Every cross-reference between catalogs is checked here, so the engine can
//! treat a missing definition during play as an internal error.

use game_core::{
    ContentCatalog, EffectId, EffectKind, GameConfig, ItemId, ItemKind, OpponentTemplateId,
    SkillId, StatusId, TargetingMode,
};

/// A single problem found in the content catalogs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("skill {skill:?} references unknown effect {effect:?}")]
    SkillMissingEffect { skill: SkillId, effect: EffectId },

    #[error("skill {skill:?} targets {skill_targeting} but effect {effect:?} targets {effect_targeting}")]
    TargetingMismatch {
        skill: SkillId,
        effect: EffectId,
        skill_targeting: TargetingMode,
        effect_targeting: TargetingMode,
    },

    #[error("effect {0:?} has no components")]
    EmptyEffect(EffectId),

    #[error("effect {effect:?} references unknown status {status:?}")]
    EffectMissingStatus { effect: EffectId, status: StatusId },

    #[error("status {0:?} has zero duration")]
    ZeroDuration(StatusId),

    #[error("status {0:?} has zero max stacks")]
    ZeroMaxStacks(StatusId),

    #[error("item {0:?} has zero max stack")]
    ZeroMaxStack(ItemId),

    #[error("item {item:?} references unknown effect {effect:?}")]
    ItemMissingEffect { item: ItemId, effect: EffectId },

    #[error("consumable item {0:?} has no effect")]
    ConsumableWithoutEffect(ItemId),

    #[error("opponent {0:?} has zero max health")]
    ZeroHealthOpponent(OpponentTemplateId),

    #[error("opponent {opponent:?} knows unknown skill {skill:?}")]
    OpponentMissingSkill {
        opponent: OpponentTemplateId,
        skill: SkillId,
    },

    #[error("opponent {opponent:?} drops unknown item {item:?}")]
    OpponentMissingDrop {
        opponent: OpponentTemplateId,
        item: ItemId,
    },

    #[error("opponent {opponent:?} drops zero of item {item:?}")]
    EmptyDrop {
        opponent: OpponentTemplateId,
        item: ItemId,
    },

    #[error("starting player knows unknown skill {0:?}")]
    StartingSkillMissing(SkillId),

    #[error("starting player holds unknown item {0:?}")]
    StartingItemMissing(ItemId),

    #[error("level {level} unlocks unknown skill {skill:?}")]
    UnlockSkillMissing { level: u32, skill: SkillId },
}

/// All issues found in one validation pass.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("content validation failed with {} issue(s): {}", .issues.len(), summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks every catalog entry and the configuration's content references.
///
/// Collects all issues instead of stopping at the first one.
pub fn validate_catalog(catalog: &ContentCatalog, config: &GameConfig) -> Result<(), ValidationError> {
    let mut issues = Vec::new();

    for skill in catalog.skills.values() {
        match catalog.effects.get(&skill.effect) {
            None => issues.push(ValidationIssue::SkillMissingEffect {
                skill: skill.id,
                effect: skill.effect,
            }),
            Some(effect) if effect.targeting != skill.targeting => {
                issues.push(ValidationIssue::TargetingMismatch {
                    skill: skill.id,
                    effect: effect.id,
                    skill_targeting: skill.targeting,
                    effect_targeting: effect.targeting,
                })
            }
            Some(_) => {}
        }
    }

    for effect in catalog.effects.values() {
        if effect.components.is_empty() {
            issues.push(ValidationIssue::EmptyEffect(effect.id));
        }
        for component in &effect.components {
            let (EffectKind::ApplyStatus { status } | EffectKind::RemoveStatus { status }) =
                component
            else {
                continue;
            };
            if !catalog.statuses.contains_key(status) {
                issues.push(ValidationIssue::EffectMissingStatus {
                    effect: effect.id,
                    status: *status,
                });
            }
        }
    }

    for status in catalog.statuses.values() {
        if status.duration == 0 {
            issues.push(ValidationIssue::ZeroDuration(status.id));
        }
        if status.max_stacks == 0 {
            issues.push(ValidationIssue::ZeroMaxStacks(status.id));
        }
    }

    for item in catalog.items.values() {
        if item.max_stack == 0 {
            issues.push(ValidationIssue::ZeroMaxStack(item.id));
        }
        match item.effect {
            Some(effect) if !catalog.effects.contains_key(&effect) => {
                issues.push(ValidationIssue::ItemMissingEffect {
                    item: item.id,
                    effect,
                })
            }
            None if matches!(item.kind, ItemKind::Consumable) => {
                issues.push(ValidationIssue::ConsumableWithoutEffect(item.id))
            }
            _ => {}
        }
    }

    for opponent in catalog.opponents.values() {
        if opponent.max_health == 0 {
            issues.push(ValidationIssue::ZeroHealthOpponent(opponent.id));
        }
        for skill in &opponent.skills {
            if !catalog.skills.contains_key(skill) {
                issues.push(ValidationIssue::OpponentMissingSkill {
                    opponent: opponent.id,
                    skill: *skill,
                });
            }
        }
        for drop in &opponent.drops {
            if !catalog.items.contains_key(&drop.item) {
                issues.push(ValidationIssue::OpponentMissingDrop {
                    opponent: opponent.id,
                    item: drop.item,
                });
            }
            if drop.count == 0 {
                issues.push(ValidationIssue::EmptyDrop {
                    opponent: opponent.id,
                    item: drop.item,
                });
            }
        }
    }

    let start = &config.starting_player;
    for skill in &start.skills {
        if !catalog.skills.contains_key(skill) {
            issues.push(ValidationIssue::StartingSkillMissing(*skill));
        }
    }
    for (item, _) in &start.items {
        if !catalog.items.contains_key(item) {
            issues.push(ValidationIssue::StartingItemMissing(*item));
        }
    }
    for unlock in &config.progression.skill_unlocks {
        for skill in &unlock.skills {
            if !catalog.skills.contains_key(skill) {
                issues.push(ValidationIssue::UnlockSkillMissing {
                    level: unlock.level,
                    skill: *skill,
                });
            }
        }
    }

    if issues.is_empty() {
        tracing::debug!(
            skills = catalog.skills.len(),
            effects = catalog.effects.len(),
            statuses = catalog.statuses.len(),
            items = catalog.items.len(),
            opponents = catalog.opponents.len(),
            "content catalog validated"
        );
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}
