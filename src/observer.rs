//! Change notifications.
//!
//! The board reports state changes to registered listeners as
//! [`BoardEvent`]s. Listeners run synchronously on the thread that mutated
//! the board and must not call back into it.

use serde::{Deserialize, Serialize};

use crate::board::RunMode;
use crate::state::LogicState;
use crate::types::{ComponentId, ConnectionId, ListenerId, PinId, SimTime};

/// Something observable happened on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A pin took a new state
    PinChanged { pin: PinId, state: LogicState },
    /// A bulb turned on or off
    BulbChanged { component: ComponentId, lit: bool },
    ComponentAdded { component: ComponentId },
    /// Width, field width, delay or switch value changed
    ComponentChanged { component: ComponentId },
    ComponentRemoved { component: ComponentId },
    Connected { connection: ConnectionId },
    Disconnected { connection: ConnectionId },
    /// Simulation time moved forward (or back to zero on stop)
    TimeAdvanced { time: SimTime },
    ModeChanged { mode: RunMode },
}

/// A registered callback.
pub type Listener = Box<dyn FnMut(&BoardEvent) + Send>;

/// Listener list owned by a board.
#[derive(Default)]
pub struct Observers {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl Observers {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its handle.
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns false if the handle was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every listener in subscription order.
    pub fn emit(&mut self, event: BoardEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
