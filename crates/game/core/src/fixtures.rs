//! Small content catalog shared by unit tests.

use crate::combat::AiPolicy;
use crate::config::{GameConfig, StartingPlayer};
use crate::effect::{Attribute, EffectDefinition, EffectKind};
use crate::env::{
    ContentCatalog, EquipmentBonus, ItemDefinition, ItemDrop, ItemKind, OpponentTemplate,
    PeriodicEffect, SkillDefinition, StackingPolicy, StatusFlags, StatusTemplate, TargetingMode,
};
use crate::state::{BoardPosition, EffectId, ItemId, OpponentTemplateId, SkillId, StatusId};

pub const STRIKE: SkillId = SkillId(1);
pub const FIREBALL: SkillId = SkillId(2);
pub const MEND: SkillId = SkillId(3);
pub const STUN_BLOW: SkillId = SkillId(4);
pub const VENOM: SkillId = SkillId(5);
pub const CLAW: SkillId = SkillId(10);

pub const STUN: StatusId = StatusId(1);
pub const POISON: StatusId = StatusId(2);

pub const POTION: ItemId = ItemId(1);
pub const SHIELD: ItemId = ItemId(2);
pub const KEY: ItemId = ItemId(3);

pub const GOBLIN: OpponentTemplateId = OpponentTemplateId(1);
pub const RAT: OpponentTemplateId = OpponentTemplateId(2);
pub const DRAGON: OpponentTemplateId = OpponentTemplateId(3);
pub const TROLL: OpponentTemplateId = OpponentTemplateId(4);

fn skill(id: SkillId, cost: u32, cooldown: u32, effect: u32, targeting: TargetingMode) -> SkillDefinition {
    SkillDefinition {
        id,
        name: format!("skill-{}", id.0),
        cost,
        cooldown,
        effect: EffectId(effect),
        targeting,
    }
}

fn opponent(id: OpponentTemplateId, name: &str, max_health: u32, speed: u32) -> OpponentTemplate {
    OpponentTemplate {
        id,
        name: name.to_string(),
        max_health,
        max_resource: 0,
        defense: 0,
        speed,
        skills: Vec::new(),
        policy: AiPolicy::Aggressive,
        boss: false,
        experience: 0,
        drops: Vec::new(),
        grants_flags: Vec::new(),
    }
}

pub fn catalog() -> ContentCatalog {
    use TargetingMode::*;

    ContentCatalog::new()
        .with_skill(skill(STRIKE, 0, 0, 1, SingleEnemy))
        .with_skill(skill(FIREBALL, 5, 2, 2, AllEnemies))
        .with_skill(skill(MEND, 3, 0, 3, SelfOnly))
        .with_skill(skill(STUN_BLOW, 2, 3, 4, SingleEnemy))
        .with_skill(skill(VENOM, 1, 0, 5, SingleEnemy))
        .with_skill(skill(CLAW, 0, 0, 10, SingleEnemy))
        .with_effect(EffectDefinition::new(EffectId(1), SingleEnemy, vec![
            EffectKind::Damage { amount: 6 },
        ]))
        .with_effect(EffectDefinition::new(EffectId(2), AllEnemies, vec![
            EffectKind::Damage { amount: 8 },
        ]))
        .with_effect(EffectDefinition::new(EffectId(3), SelfOnly, vec![EffectKind::Heal {
            attribute: Attribute::Health,
            amount: 6,
        }]))
        .with_effect(EffectDefinition::new(EffectId(4), SingleEnemy, vec![
            EffectKind::Damage { amount: 2 },
            EffectKind::ApplyStatus { status: STUN },
        ]))
        .with_effect(EffectDefinition::new(EffectId(5), SingleEnemy, vec![
            EffectKind::ApplyStatus { status: POISON },
        ]))
        .with_effect(EffectDefinition::new(EffectId(6), SelfOnly, vec![EffectKind::Heal {
            attribute: Attribute::Health,
            amount: 8,
        }]))
        .with_effect(EffectDefinition::new(EffectId(10), SingleEnemy, vec![
            EffectKind::Damage { amount: 10 },
        ]))
        .with_status(StatusTemplate {
            id: STUN,
            name: "Stun".into(),
            duration: 1,
            stacking: StackingPolicy::Refresh,
            max_stacks: 1,
            flags: StatusFlags::PREVENTS_ACTION | StatusFlags::DEBUFF,
            periodic: None,
            defense_modifier: 0,
        })
        .with_status(StatusTemplate {
            id: POISON,
            name: "Poison".into(),
            duration: 3,
            stacking: StackingPolicy::Refresh,
            max_stacks: 1,
            flags: StatusFlags::DEBUFF,
            periodic: Some(PeriodicEffect::Damage(2)),
            defense_modifier: 0,
        })
        .with_item(ItemDefinition {
            id: POTION,
            name: "Potion".into(),
            kind: ItemKind::Consumable,
            effect: Some(EffectId(6)),
            max_stack: 5,
        })
        .with_item(ItemDefinition {
            id: SHIELD,
            name: "Shield".into(),
            kind: ItemKind::Equipment(EquipmentBonus {
                defense: 2,
                speed: 0,
            }),
            effect: None,
            max_stack: 1,
        })
        .with_item(ItemDefinition {
            id: KEY,
            name: "Key".into(),
            kind: ItemKind::Key,
            effect: None,
            max_stack: 1,
        })
        .with_opponent(OpponentTemplate {
            skills: vec![CLAW],
            experience: 30,
            drops: vec![ItemDrop {
                item: POTION,
                count: 1,
            }],
            ..opponent(GOBLIN, "Goblin", 8, 5)
        })
        .with_opponent(OpponentTemplate {
            experience: 5,
            ..opponent(RAT, "Rat", 4, 1)
        })
        .with_opponent(OpponentTemplate {
            defense: 3,
            skills: vec![CLAW],
            boss: true,
            experience: 500,
            grants_flags: vec![GameConfig::DEFAULT_VICTORY_FLAG.to_string()],
            ..opponent(DRAGON, "Dragon", 40, 20)
        })
        .with_opponent(opponent(TROLL, "Troll", 50, 1))
}

pub fn config() -> GameConfig {
    GameConfig::new().with_starting_player(StartingPlayer {
        name: "Hero".into(),
        max_health: 20,
        max_resource: 10,
        defense: 2,
        speed: 10,
        skills: vec![STRIKE, FIREBALL, MEND, STUN_BLOW, VENOM],
        items: vec![(POTION, 2), (SHIELD, 1)],
        position: BoardPosition::new(3, 4),
    })
}
