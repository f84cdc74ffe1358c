//! Asynchronous abstraction for sourcing the player's combat actions.
//!
//! Runtime users plug in [`PlayerInput`] implementations so encounters can be
//! driven by a terminal, a UI, or scripted fixtures. Opponent actions never
//! go through this trait; they come from each template's AI policy.
use std::collections::VecDeque;

use async_trait::async_trait;
use game_core::{CombatAction, EncounterState};
use tokio::sync::Mutex;

use super::errors::{Result, RuntimeError};

/// Trait for providing the player's action during action selection.
///
/// This is the only suspension point of an encounter; there is no timeout.
#[async_trait]
pub trait PlayerInput: Send + Sync {
    /// Provide an action for the player given the current encounter state.
    async fn choose_action(&self, state: &EncounterState) -> Result<CombatAction>;

    /// Called when the engine rejected the previous action. The menu is
    /// presented again right after.
    async fn action_rejected(&self, _error: &RuntimeError) {}
}

/// Replays a fixed list of actions, failing once the list runs out.
///
/// Useful for tests and scripted demos.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    actions: Mutex<VecDeque<CombatAction>>,
    rejections: Mutex<Vec<String>>,
}

impl ScriptedInput {
    pub fn new(actions: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            actions: Mutex::new(actions.into_iter().collect()),
            rejections: Mutex::new(Vec::new()),
        }
    }

    /// Messages of every rejected action, in order.
    pub async fn rejections(&self) -> Vec<String> {
        self.rejections.lock().await.clone()
    }

    /// Actions not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.actions.lock().await.len()
    }
}

#[async_trait]
impl PlayerInput for ScriptedInput {
    async fn choose_action(&self, _state: &EncounterState) -> Result<CombatAction> {
        self.actions
            .lock()
            .await
            .pop_front()
            .ok_or(RuntimeError::InputClosed)
    }

    async fn action_rejected(&self, error: &RuntimeError) {
        self.rejections.lock().await.push(error.to_string());
    }
}
