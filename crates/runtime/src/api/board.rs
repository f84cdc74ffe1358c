//! Hooks toward the board/navigation layer, which lives outside the runtime.

use game_core::{BoardPosition, Player};

/// Receives control back when exploration resumes after an encounter.
///
/// Only called after a normal encounter end (victory or flight). Defeat moves
/// to game over, and aborted encounters are reported on the event bus instead.
pub trait BoardCollaborator: Send + Sync {
    fn on_exploration_resume(&self, player: &Player, position: BoardPosition);
}

/// Board that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBoard;

impl BoardCollaborator for NullBoard {
    fn on_exploration_resume(&self, _player: &Player, _position: BoardPosition) {}
}
