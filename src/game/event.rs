use std::fmt;

use super::{GameState, PlayerId};

/// Notifications emitted by [`super::Game`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The game entered a new state.
    StateChanged(GameState),
    /// A new player's turn has started.
    TurnAdvanced { player: PlayerId },
}

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Subscribers, notified synchronously in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    handlers: Vec<Handler>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub(crate) fn notify(&mut self, event: &GameEvent) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
