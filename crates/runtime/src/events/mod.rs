//! Topic-based event bus for runtime events.
//!
//! Events are published to specific topics, and consumers can subscribe only
//! to the topics they need. Observers never feed back into the game state.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::PhaseEvent;
