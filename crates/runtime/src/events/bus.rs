//! Topic-based event bus implementation.

use game_core::{CombatEvent, ProgressionEvent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::PhaseEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Turn-by-turn combat notifications
    Combat,
    /// Experience, level-ups, items and flags
    Progression,
    /// Phase transitions and persistence
    Phase,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Combat, Topic::Progression, Topic::Phase];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Progression(ProgressionEvent),
    Phase(PhaseEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Progression(_) => Topic::Progression,
            Event::Phase(_) => Topic::Phase,
        }
    }
}

struct Channels {
    combat: broadcast::Sender<Event>,
    progression: broadcast::Sender<Event>,
    phase: broadcast::Sender<Event>,
    /// Every topic, in publish order.
    all: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Progression => &self.progression,
            Topic::Phase => &self.phase,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers lag and
/// lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                combat: broadcast::channel(capacity).0,
                progression: broadcast::channel(capacity).0,
                phase: broadcast::channel(capacity).0,
                all: broadcast::channel(capacity.saturating_mul(Topic::ALL.len())).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels.all.receiver_count() > 0 {
            let _ = self.channels.all.send(event.clone());
        }
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }

    /// Subscribe to every topic through one receiver.
    ///
    /// Events arrive in the order they were published, across topics.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.channels.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
