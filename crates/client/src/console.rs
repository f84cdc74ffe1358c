//! Terminal input: line reading, command parsing, and the player's combat
//! menu.

use async_trait::async_trait;
use game_core::{CombatAction, ContentCatalog, EncounterState, EntityId, ItemId, SkillId};
use runtime::{Event, EventBus, OracleManager, PlayerInput, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

use crate::presentation;

/// Shared stdin plus the event subscriptions the presenter drains.
pub struct Console {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    events: Mutex<Receiver<Event>>,
    oracles: OracleManager,
}

impl Console {
    pub fn new(bus: &EventBus, oracles: OracleManager) -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            events: Mutex::new(bus.subscribe_all()),
            oracles,
        }
    }

    /// Prints `prompt` and reads one trimmed line. `None` on end of input.
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        println!("{}", prompt);
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "Failed to read from stdin");
                None
            }
        }
    }

    /// Prints every event published since the last call.
    pub async fn flush_events(&self, encounter: Option<&EncounterState>) {
        let catalog = self.oracles.catalog();
        let mut rx = self.events.lock().await;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if let Some(line) = presentation::describe_event(&event, catalog, encounter) {
                        println!("{}", line);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Presenter fell behind the event bus");
                }
                Err(_) => break,
            }
        }
    }
}

#[async_trait]
impl PlayerInput for Console {
    async fn choose_action(&self, state: &EncounterState) -> runtime::Result<CombatAction> {
        let catalog = self.oracles.catalog();
        self.flush_events(Some(state)).await;
        println!("{}", presentation::render_encounter(state, catalog));

        loop {
            let line = self
                .read_line("action>")
                .await
                .ok_or(RuntimeError::InputClosed)?;
            match parse_action(&line, state, catalog) {
                Ok(action) => return Ok(action),
                Err(message) => println!("{}", message),
            }
        }
    }

    async fn action_rejected(&self, error: &RuntimeError) {
        println!("Can't do that: {}", error);
    }
}

/// Parses a combat menu line.
///
/// The target may be omitted when exactly one enemy is alive.
pub fn parse_action(
    line: &str,
    state: &EncounterState,
    catalog: &ContentCatalog,
) -> Result<CombatAction, String> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let id = words.next().map(str::parse::<u32>);
    let target = words
        .next()
        .map(|t| t.parse::<u32>().map(EntityId).map_err(|_| format!("bad target '{}'", t)))
        .transpose()?;

    match (command, id) {
        ("flee" | "f", None) => Ok(CombatAction::Flee),
        ("wait" | "w", None) => Ok(CombatAction::Wait),
        ("skill" | "s", Some(Ok(id))) => {
            let skill = SkillId(id);
            let needs_target = catalog
                .skills
                .get(&skill)
                .is_some_and(|s| s.targeting.needs_target());
            Ok(CombatAction::skill(skill, target.or_else(|| sole_enemy(state, needs_target))))
        }
        ("item" | "i", Some(Ok(id))) => {
            let item = ItemId(id);
            let needs_target = catalog
                .items
                .get(&item)
                .and_then(|i| i.effect)
                .and_then(|effect| catalog.effects.get(&effect))
                .is_some_and(|e| e.targeting.needs_target());
            Ok(CombatAction::item(item, target.or_else(|| sole_enemy(state, needs_target))))
        }
        (_, Some(Err(_))) => Err("ids are numbers, e.g. 'skill 1 2'".to_string()),
        _ => Err("skill <id> [target] | item <id> [target] | flee | wait".to_string()),
    }
}

fn sole_enemy(state: &EncounterState, needs_target: bool) -> Option<EntityId> {
    if !needs_target {
        return None;
    }
    match state.living_enemies_of(EntityId::PLAYER).as_slice() {
        [only] => Some(only.id),
        _ => None,
    }
}
