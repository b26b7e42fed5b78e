//! Core type definitions for the logic simulator.
//!
//! Identifiers are small copyable newtypes so that a pin id can never be
//! passed where a component id is expected. All ids on one board come from a
//! single counter, so ordering ids also orders them by creation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation time in abstract units.
///
/// Component delays, the board step and every scheduled event use the same
/// unit. Time only moves forward, except when a board is stopped.
pub type SimTime = u64;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw numeric value.
            pub fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a pin.
    ///
    /// Pin ids double as the tie-break key for events scheduled at the same
    /// simulated time.
    PinId,
    "p"
);

id_type!(
    /// Unique identifier for a component on a board.
    ComponentId,
    "c"
);

id_type!(
    /// Unique identifier for a connection between two pins.
    ConnectionId,
    "w"
);

id_type!(
    /// Handle returned when registering a board listener.
    ListenerId,
    "l"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(PinId(7).to_string(), "p7");
        assert_eq!(ComponentId(3).to_string(), "c3");
        assert_eq!(ConnectionId(12).to_string(), "w12");
        assert_eq!(ListenerId(1).to_string(), "l1");
    }

    #[test]
    fn test_id_ordering() {
        assert!(PinId(1) < PinId(2));
        assert_eq!(PinId(5).raw(), 5);
    }

    #[test]
    fn test_id_serialization() {
        let json = serde_json::to_string(&ComponentId(42)).unwrap();
        assert_eq!(json, "42");
        let back: ComponentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ComponentId(42));
    }
}
