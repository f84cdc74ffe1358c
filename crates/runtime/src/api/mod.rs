//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration or infrastructure.

pub mod board;
pub mod errors;
pub mod input;

pub use board::{BoardCollaborator, NullBoard};
pub use errors::{Result, RuntimeError};
pub use input::{PlayerInput, ScriptedInput};
