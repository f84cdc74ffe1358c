//! Exploration command loop wired to a [`GameSession`].

use std::sync::Arc;

use anyhow::{Context, Result};
use game_core::{BoardPosition, FlagValue, ItemId, OpponentTemplateId, Phase, SkillId};
use runtime::{
    EventBus, FileSnapshotRepository, GameSession, OracleManager, RuntimeConfig, RuntimeError,
    SnapshotRepository,
};

use crate::console::Console;
use crate::presentation;

const HELP: &str = "\
commands:
  status                 show the player
  move <x> <y>           walk to a board square
  fight <id> [<id>...]   start an encounter against opponent templates
  use <item>             use an item outside combat
  equip <item>           equip a piece of equipment
  unequip <item>         take it off again
  learn <skill>          learn a skill
  flag <name> [value]    set a progress flag: true, false, or a number
  save                   write the current state
  restart                reload the last checkpoint after a defeat
  reset                  abandon this run and start over
  inspect                dump the game state as JSON
  help                   this text
  quit                   leave the game";

/// A parsed exploration command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Status,
    Move(BoardPosition),
    Fight(Vec<OpponentTemplateId>),
    Use(ItemId),
    Equip(ItemId),
    Unequip(ItemId),
    Learn(SkillId),
    Flag(String, FlagValue),
    Save,
    Restart,
    Reset,
    Inspect,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("type 'help' for commands".to_string());
        };
        let args: Vec<&str> = words.collect();

        let command = match (head, args.as_slice()) {
            ("status" | "st", []) => Self::Status,
            ("move" | "m", [x, y]) => Self::Move(BoardPosition::new(number(x)?, number(y)?)),
            ("fight", ids) if !ids.is_empty() => Self::Fight(
                ids.iter()
                    .map(|id| number(id).map(OpponentTemplateId))
                    .collect::<Result<_, _>>()?,
            ),
            ("use", [id]) => Self::Use(ItemId(number(id)?)),
            ("equip", [id]) => Self::Equip(ItemId(number(id)?)),
            ("unequip", [id]) => Self::Unequip(ItemId(number(id)?)),
            ("learn", [id]) => Self::Learn(SkillId(number(id)?)),
            ("flag", [name]) => Self::Flag(name.to_string(), FlagValue::Bool(true)),
            ("flag", [name, value]) => Self::Flag(name.to_string(), flag_value(value)?),
            ("save", []) => Self::Save,
            ("restart", []) => Self::Restart,
            ("reset", []) => Self::Reset,
            ("inspect", []) => Self::Inspect,
            ("help" | "?", []) => Self::Help,
            ("quit" | "q" | "exit", []) => Self::Quit,
            _ => return Err(format!("unknown command '{}', type 'help'", line.trim())),
        };
        Ok(command)
    }
}

fn flag_value(word: &str) -> Result<FlagValue, String> {
    if let Ok(value) = word.parse::<bool>() {
        return Ok(FlagValue::Bool(value));
    }
    word.parse::<i64>()
        .map(FlagValue::Number)
        .map_err(|_| format!("flag value must be true, false, or a number, got '{}'", word))
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, String> {
    word.parse().map_err(|_| format!("'{}' is not a number", word))
}

pub struct App {
    session: GameSession,
    console: Console,
}

impl App {
    pub fn build(config: RuntimeConfig) -> Result<Self> {
        let (oracles, game_config) = OracleManager::load(&config.content_dir)
            .with_context(|| format!("loading content from {}", config.content_dir.display()))?;
        let bus = EventBus::with_capacity(config.event_bus_capacity);
        let console = Console::new(&bus, oracles.clone());

        let session = if config.enable_persistence {
            let repository: Arc<dyn SnapshotRepository> =
                Arc::new(FileSnapshotRepository::new(config.states_dir())?);
            GameSession::load_or_new(game_config, oracles, repository, bus)?
        } else {
            tracing::info!("Persistence disabled");
            GameSession::new_game(game_config, oracles, None, bus)?
        };

        tracing::info!(
            session = %config.session_id,
            sequence = session.state().sequence,
            phase = %session.phase(),
            "Client ready"
        );
        Ok(Self { session, console })
    }

    pub async fn run(mut self) -> Result<()> {
        println!("{}", HELP);

        loop {
            match self.resume_encounter().await {
                Ok(()) => {}
                Err(RuntimeError::InputClosed) => break,
                Err(error) => {
                    println!("Error: {}", error);
                    continue;
                }
            }
            self.console.flush_events(None).await;
            let prompt = format!("[{}]>", self.session.phase());
            let Some(line) = self.console.read_line(&prompt).await else {
                break;
            };
            if line.is_empty() {
                continue;
            }
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };
            if command == Command::Quit {
                break;
            }
            if let Err(error) = self.execute(command) {
                println!("Error: {}", error);
            }
        }

        if self.session.phase() != Phase::Encounter {
            self.session.save()?;
        }
        tracing::info!("Client stopped");
        Ok(())
    }

    fn execute(&mut self, command: Command) -> runtime::Result<()> {
        match command {
            Command::Status => {
                let catalog = self.session.oracles().catalog();
                println!("{}", presentation::render_status(self.session.state(), catalog));
            }
            Command::Move(position) => self.session.move_to(position)?,
            Command::Fight(opponents) => {
                self.session.enter_encounter(&opponents)?;
            }
            Command::Use(item) => {
                self.session.use_item(item)?;
            }
            Command::Equip(item) => self.session.equip(item)?,
            Command::Unequip(item) => self.session.unequip(item)?,
            Command::Learn(skill) => {
                self.session.learn_skill(skill)?;
            }
            Command::Flag(name, value) => {
                self.session.set_flag(&name, value)?;
            }
            Command::Save => self.session.save()?,
            Command::Restart => {
                self.session.restart()?;
            }
            Command::Reset => {
                self.session.reset()?;
            }
            Command::Inspect => match serde_json::to_string_pretty(self.session.state()) {
                Ok(json) => println!("{}", json),
                Err(error) => println!("Error: {}", error),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
        Ok(())
    }

    /// Plays out the active encounter, if any.
    async fn resume_encounter(&mut self) -> runtime::Result<()> {
        if self.session.machine().encounter().is_none() {
            return Ok(());
        }
        let outcome = self.session.drive_encounter(&self.console).await?;
        self.console.flush_events(None).await;
        tracing::debug!(%outcome, "Encounter returned to the command loop");
        if self.session.phase() == Phase::GameOver {
            println!("You have fallen. Type 'restart' to return to your last checkpoint.");
        }
        Ok(())
    }
}
