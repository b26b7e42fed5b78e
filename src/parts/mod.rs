//! Transfer functions of the built-in parts.
//!
//! These are pure functions over [`LogicState`](crate::LogicState) values.
//! The board wires them to pins through [`Component`](crate::Component).

pub mod adder;
pub mod gate;
pub mod io;

pub use adder::{full_add, half_add, AdderKind, AdderOutput};
pub use gate::GateKind;
