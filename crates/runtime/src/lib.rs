//! Runtime orchestration for the turn-based combat game.
//!
//! This crate wires the deterministic state machine from `game-core` to
//! content loading, snapshot persistence, and an observable event stream.
//! Consumers build a [`GameSession`] and drive it with a [`PlayerInput`].
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
pub mod api;
pub mod config;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod session;

pub use api::{BoardCollaborator, NullBoard, PlayerInput, Result, RuntimeError, ScriptedInput};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, PhaseEvent, Topic};
pub use oracle::OracleManager;
pub use repository::{
    FileSnapshotRepository, InMemorySnapshotRepo, RepositoryError, SNAPSHOT_FORMAT_VERSION,
    SnapshotRepository,
};
pub use session::GameSession;
