//! Text rendering of game state and runtime events.
//!
//! Everything here is read-only: the presenter observes events and state but
//! never feeds anything back into the session.

use std::fmt::Write;

use game_core::{
    CombatAction, CombatEvent, Combatant, ContentCatalog, EncounterState, EntityId, GameState,
    ItemId, ProgressionEvent, SkillId, SkipReason, StatusId,
};
use runtime::{Event, PhaseEvent};

pub fn skill_name(catalog: &ContentCatalog, skill: SkillId) -> String {
    catalog
        .skills
        .get(&skill)
        .map_or_else(|| skill.to_string(), |s| s.name.clone())
}

pub fn item_name(catalog: &ContentCatalog, item: ItemId) -> String {
    catalog
        .items
        .get(&item)
        .map_or_else(|| item.to_string(), |i| i.name.clone())
}

fn status_name(catalog: &ContentCatalog, status: StatusId) -> String {
    catalog
        .statuses
        .get(&status)
        .map_or_else(|| status.to_string(), |s| s.name.clone())
}

fn actor_name(state: Option<&EncounterState>, id: EntityId) -> String {
    if id == EntityId::PLAYER {
        return "You".to_string();
    }
    state
        .and_then(|s| s.participant(id))
        .map_or_else(|| format!("Opponent {}", id), |c| format!("{} {}", c.name, id))
}

/// One line per event; `None` for events not worth printing.
pub fn describe_event(
    event: &Event,
    catalog: &ContentCatalog,
    encounter: Option<&EncounterState>,
) -> Option<String> {
    let name = |id| actor_name(encounter, id);
    let line = match event {
        Event::Combat(combat) => match combat {
            CombatEvent::TurnStarted { actor, round, .. } if actor.is_player() => {
                format!("-- round {} --", round)
            }
            CombatEvent::TurnStarted { .. } | CombatEvent::TurnEnded { .. } => return None,
            CombatEvent::TurnSkipped { actor, reason } => match reason {
                SkipReason::Stunned => format!("{} is stunned and loses the turn", name(*actor)),
                SkipReason::Defeated => return None,
            },
            CombatEvent::ActionPerformed { actor, action } => {
                let what = match action {
                    CombatAction::UseSkill { skill, .. } => skill_name(catalog, *skill),
                    CombatAction::UseItem { item, .. } => item_name(catalog, *item),
                    CombatAction::Flee | CombatAction::Wait => action.as_str().to_string(),
                };
                format!("{} used {}", name(*actor), what)
            }
            CombatEvent::Damaged { target, amount, .. } => {
                format!("{} took {} damage", name(*target), amount)
            }
            CombatEvent::Healed { target, amount, .. } => {
                format!("{} recovered {} health", name(*target), amount)
            }
            CombatEvent::ResourceChanged { target, amount, .. } => {
                format!("{} resource {:+}", name(*target), amount)
            }
            CombatEvent::StatusApplied {
                target,
                status,
                stacks,
                remaining,
                ..
            } => format!(
                "{} is affected by {} (x{}, {} turns)",
                name(*target),
                status_name(catalog, *status),
                stacks,
                remaining
            ),
            CombatEvent::StatusRemoved { target, status } => {
                format!("{} is no longer {}", name(*target), status_name(catalog, *status))
            }
            CombatEvent::StatusExpired { target, status } => {
                format!("{} wore off on {}", status_name(catalog, *status), name(*target))
            }
            CombatEvent::Defeated { entity } => format!("{} fell", name(*entity)),
            CombatEvent::EncounterConcluded { outcome, .. } => {
                format!("== encounter over: {} ==", outcome)
            }
        },
        Event::Progression(progression) => match progression {
            ProgressionEvent::ExperienceGained { amount } => format!("Gained {} experience", amount),
            ProgressionEvent::LevelUp { level } => format!("Reached level {}!", level),
            ProgressionEvent::SkillLearned { skill } => {
                format!("Learned {}", skill_name(catalog, *skill))
            }
            ProgressionEvent::ItemAcquired { item, count } => {
                format!("Obtained {} x{}", item_name(catalog, *item), count)
            }
            ProgressionEvent::ItemDiscarded { item, count } => {
                format!("No room for {} x{}", item_name(catalog, *item), count)
            }
            ProgressionEvent::FlagSet { name } => format!("Progress: {}", name),
        },
        Event::Phase(phase) => match phase {
            PhaseEvent::Changed { to, .. } => format!("[{}]", to),
            PhaseEvent::EncounterAborted { reason, .. } => {
                format!("The encounter collapsed ({}); back to exploration", reason)
            }
            PhaseEvent::SaveDiscarded { reason } => {
                format!("Save could not be loaded ({}); starting fresh", reason)
            }
            PhaseEvent::SnapshotSaved { .. } | PhaseEvent::EncounterFinished { .. } => return None,
        },
    };
    Some(line)
}

fn combatant_line(out: &mut String, combatant: &Combatant, catalog: &ContentCatalog) {
    let statuses: Vec<String> = combatant
        .statuses
        .iter()
        .map(|s| format!("{}({})", status_name(catalog, s.status), s.remaining))
        .collect();
    let _ = writeln!(
        out,
        "  [{}] {:<16} HP {:>3}/{:<3} RES {:>3}/{:<3} {}",
        combatant.id.0,
        combatant.name,
        combatant.health.current,
        combatant.health.maximum,
        combatant.resource.current,
        combatant.resource.maximum,
        statuses.join(" ")
    );
}

/// Participants plus the player's action menu.
pub fn render_encounter(state: &EncounterState, catalog: &ContentCatalog) -> String {
    let mut out = String::new();
    for combatant in state.participants.iter().filter(|c| c.is_alive()) {
        combatant_line(&mut out, combatant, catalog);
    }

    if let Some(player) = state.player() {
        let _ = writeln!(out, "Skills:");
        for &skill in &player.skills {
            let Some(definition) = catalog.skills.get(&skill) else {
                continue;
            };
            let cooldown = player.cooldown(skill);
            let _ = writeln!(
                out,
                "  {:>3} {:<14} cost {:<2} {}{}",
                skill.0,
                definition.name,
                definition.cost,
                definition.targeting,
                if cooldown > 0 {
                    format!(" (ready in {})", cooldown)
                } else {
                    String::new()
                }
            );
        }
    }
    let items: Vec<String> = state
        .inventory
        .iter()
        .filter(|slot| catalog.items.get(&slot.item).is_some_and(|i| i.is_usable()))
        .map(|slot| format!("{} {} x{}", slot.item.0, item_name(catalog, slot.item), slot.count))
        .collect();
    if !items.is_empty() {
        let _ = writeln!(out, "Items: {}", items.join(", "));
    }
    let _ = write!(out, "skill <id> [target] | item <id> [target] | flee | wait");
    out
}

/// Player sheet shown during exploration.
pub fn render_status(state: &GameState, catalog: &ContentCatalog) -> String {
    let player = &state.player;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (level {}, {} xp) at {} [{}]",
        player.name, player.level, player.experience, player.position, state.phase
    );
    let _ = writeln!(
        out,
        "  HP {}/{}  RES {}/{}  DEF {}  SPD {}",
        player.health.current,
        player.health.maximum,
        player.resource.current,
        player.resource.maximum,
        player.defense,
        player.speed
    );
    let skills: Vec<String> = player
        .known_skills
        .iter()
        .map(|&s| format!("{} {}", s.0, skill_name(catalog, s)))
        .collect();
    let _ = writeln!(out, "  Skills: {}", skills.join(", "));
    let items: Vec<String> = player
        .inventory
        .iter()
        .map(|slot| {
            format!(
                "{} {} x{}{}",
                slot.item.0,
                item_name(catalog, slot.item),
                slot.count,
                if slot.equipped { " (equipped)" } else { "" }
            )
        })
        .collect();
    let _ = write!(out, "  Items: {}", items.join(", "));
    out
}
