//! Pins and connections.
//!
//! A [`Pin`] is an input or output terminal owned by exactly one component.
//! A [`Connection`] joins one output pin (the source) to one input pin (the
//! sink) of equal width. An input listens to at most one source; an output
//! may fan out to any number of inputs.
//!
//! The one exception is a feedback connection whose source and sink are the
//! same output pin. Free-running sources such as the clock use it so that
//! every write of their output re-evaluates them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ConnectError;
use crate::state::{bit_mask, LogicState};
use crate::types::{ComponentId, ConnectionId, PinId};

/// Whether a pin receives or sends signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    /// Returns true if a connection between the two directions is allowed.
    pub fn complements(self, other: PinDirection) -> bool {
        self != other
    }
}

/// A terminal of a component.
#[derive(Clone, Debug)]
pub struct Pin {
    /// Unique identifier
    pub id: PinId,
    /// The component this pin belongs to
    pub parent: ComponentId,
    /// Input or output
    pub direction: PinDirection,
    /// Number of bits carried
    pub width: u32,
    /// Current state
    pub state: LogicState,
    /// Optional display label (e.g. "A", "Cin")
    pub label: Option<String>,
    /// Connections touching this pin
    pub(crate) connections: BTreeSet<ConnectionId>,
}

impl Pin {
    /// Creates a pin in the default (all driven-0) state with no connections.
    pub fn new(id: PinId, parent: ComponentId, direction: PinDirection, width: u32) -> Self {
        Self {
            id,
            parent,
            direction,
            width,
            state: LogicState::default(),
            label: None,
            connections: BTreeSet::new(),
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns true for input pins.
    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    /// Returns true for output pins.
    pub fn is_output(&self) -> bool {
        self.direction == PinDirection::Output
    }

    /// Mask covering this pin's width.
    pub fn bit_mask(&self) -> u64 {
        bit_mask(self.width)
    }

    /// Connections touching this pin, in id order.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.connections.iter().copied()
    }

    /// Returns true if at least one connection touches this pin.
    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Checks that this pin may be joined to `other`: one input, one output,
    /// equal widths.
    pub fn check_connect(&self, other: &Pin) -> Result<(), ConnectError> {
        if !self.direction.complements(other.direction) {
            return Err(ConnectError::DirectionMismatch);
        }
        let (output, input) = if self.is_output() {
            (self, other)
        } else {
            (other, self)
        };
        if output.width != input.width {
            return Err(ConnectError::WidthMismatch {
                output: output.width,
                input: input.width,
            });
        }
        Ok(())
    }
}

/// A wire from an output pin to an input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique identifier
    pub id: ConnectionId,
    /// The driving output pin
    pub source: PinId,
    /// The listening pin
    pub sink: PinId,
}

impl Connection {
    /// Creates a connection from `source` to `sink`.
    pub fn new(id: ConnectionId, source: PinId, sink: PinId) -> Self {
        Self { id, source, sink }
    }

    /// Creates a feedback connection from an output pin to itself.
    pub fn feedback(id: ConnectionId, pin: PinId) -> Self {
        Self::new(id, pin, pin)
    }

    /// Returns true if this connection feeds an output back to itself.
    pub fn is_feedback(&self) -> bool {
        self.source == self.sink
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(id: u64, direction: PinDirection, width: u32) -> Pin {
        Pin::new(PinId(id), ComponentId(0), direction, width)
    }

    #[test]
    fn test_check_connect() {
        let out = pin(1, PinDirection::Output, 4);
        let input = pin(2, PinDirection::Input, 4);
        let narrow = pin(3, PinDirection::Input, 1);
        let other_out = pin(4, PinDirection::Output, 4);

        assert_eq!(out.check_connect(&input), Ok(()));
        assert_eq!(input.check_connect(&out), Ok(()));
        assert_eq!(
            narrow.check_connect(&out),
            Err(ConnectError::WidthMismatch { output: 4, input: 1 })
        );
        assert_eq!(
            out.check_connect(&other_out),
            Err(ConnectError::DirectionMismatch)
        );
    }

    #[test]
    fn test_pin_mask_and_label() {
        let p = pin(1, PinDirection::Input, 3).with_label("A");
        assert_eq!(p.bit_mask(), 0b111);
        assert_eq!(p.label.as_deref(), Some("A"));
        assert!(p.is_input());
        assert!(!p.is_connected());
    }

    #[test]
    fn test_feedback_connection() {
        let c = Connection::feedback(ConnectionId(9), PinId(1));
        assert!(c.is_feedback());
        assert_eq!((c.source, c.sink), (PinId(1), PinId(1)));

        let w = Connection::new(ConnectionId(10), PinId(1), PinId(2));
        assert!(!w.is_feedback());
    }
}
