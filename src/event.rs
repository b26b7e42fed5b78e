//! Scheduled pin updates.
//!
//! A [`ScheduledEvent`] is a future write of a [`LogicState`] onto a pin.
//! Components never mutate their outputs directly; they schedule events and
//! the board applies them when simulated time reaches the event's time.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::state::LogicState;
use crate::types::{PinId, SimTime};

/// A pending state change for one pin.
///
/// Events order by `(time, pin, seq)`. The pin id breaks ties between events
/// due at the same time, and `seq` (a board-wide scheduling counter) orders
/// repeated writes to the same pin at the same time, so the latest write is
/// applied last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// The simulation time at which the write happens
    pub time: SimTime,
    /// Target pin
    pub pin: PinId,
    /// State written to the pin
    pub state: LogicState,
    /// Scheduling sequence number
    pub seq: u64,
}

impl ScheduledEvent {
    /// Creates a new event.
    pub fn new(time: SimTime, pin: PinId, state: LogicState, seq: u64) -> Self {
        Self {
            time,
            pin,
            state,
            seq,
        }
    }

    /// The ordering key of this event.
    pub fn key(&self) -> (SimTime, PinId, u64) {
        (self.time, self.pin, self.seq)
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
