//! Runtime configuration sourced from the environment.
use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Settings shared by the session, its repository, and the event bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Root directory for persisted sessions.
    pub save_data_dir: PathBuf,
    /// Session name; snapshots live under `save_data_dir/<session_id>/states`.
    pub session_id: String,
    /// Directory holding `config.toml` and the RON catalogs.
    pub content_dir: PathBuf,
    /// When false, nothing is written to disk.
    pub enable_persistence: bool,
    /// Buffered events per topic before slow subscribers start lagging.
    pub event_bus_capacity: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_SESSION_ID: &'static str = "default";
    pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;

    /// Construct runtime configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SAVE_DATA_DIR` - Root directory for saves (default: platform data dir)
    /// - `GAME_SESSION_ID` - Session name (default: `default`)
    /// - `CONTENT_DIR` - Content data directory (default: bundled content)
    /// - `ENABLE_PERSISTENCE` - `true`/`false` (default: true)
    /// - `EVENT_BUS_CAPACITY` - Events buffered per topic (default: 256)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("SAVE_DATA_DIR") {
            config.save_data_dir = dir;
        }
        if let Some(session_id) = read_env::<String>("GAME_SESSION_ID")
            && !session_id.trim().is_empty()
        {
            config.session_id = session_id;
        }
        if let Some(dir) = read_env::<PathBuf>("CONTENT_DIR") {
            config.content_dir = dir;
        }
        if let Some(enabled) = read_env::<bool>("ENABLE_PERSISTENCE") {
            config.enable_persistence = enabled;
        }
        if let Some(capacity) = read_env::<usize>("EVENT_BUS_CAPACITY") {
            config.event_bus_capacity = capacity.max(1);
        }

        config
    }

    /// Directory holding this session's snapshot files.
    pub fn states_dir(&self) -> PathBuf {
        self.save_data_dir.join(&self.session_id).join("states")
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            save_data_dir: default_save_dir(),
            session_id: Self::DEFAULT_SESSION_ID.to_string(),
            content_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data")),
            enable_persistence: true,
            event_bus_capacity: Self::DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}

fn default_save_dir() -> PathBuf {
    ProjectDirs::from("", "", "tactics")
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| env::temp_dir().join("tactics").join("saves"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
