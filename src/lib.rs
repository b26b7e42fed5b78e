//! # Logicboard
//!
//! An event-driven simulator for digital logic circuits.
//!
//! ## Design Principles
//!
//! - **Four-valued signals**: every wire carries a bit-vector whose bits are
//!   driven-0, driven-1, unknown (`x`) or floating (`z`).
//! - **Scheduled outputs**: components never write their outputs directly.
//!   They schedule new states after their propagation delay, and the board
//!   applies them in time order.
//! - **Single writer**: the whole circuit lives in one [`Board`] and is only
//!   mutated through `&mut Board`. Share it across threads behind a lock
//!   (see [`driver`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use logicboard::{Board, ComponentSpec, GateKind};
//!
//! let mut board = Board::new(1);
//! let a = board.add_component(ComponentSpec::switch(1)).unwrap();
//! let b = board.add_component(ComponentSpec::switch(1)).unwrap();
//! let and = board.add_component(ComponentSpec::gate(GateKind::And)).unwrap();
//! let lamp = board.add_component(ComponentSpec::bulb()).unwrap();
//!
//! board.connect(board.output(a, 0).unwrap(), board.input(and, 0).unwrap()).unwrap();
//! board.connect(board.output(b, 0).unwrap(), board.input(and, 1).unwrap()).unwrap();
//! board.connect(board.output(and, 0).unwrap(), board.input(lamp, 0).unwrap()).unwrap();
//!
//! board.advance_one_step().unwrap();
//! assert_eq!(board.bulb_lit(lamp), Some(true));
//! ```
//!
//! ## Configuration-Driven Setup
//!
//! ```rust,ignore
//! use logicboard::config::CircuitConfig;
//! use logicboard::registry::create_default_registry;
//!
//! let config = CircuitConfig::from_file("adder.yaml")?;
//! let circuit = config.build(&create_default_registry())?;
//! ```

pub mod types;
pub mod state;
pub mod queue;
pub mod event;
pub mod pin;
pub mod parts;
pub mod component;
pub mod board;
pub mod observer;
pub mod registry;
pub mod config;
pub mod driver;
pub mod stats;
pub mod error;

// Re-export commonly used types
pub use types::{ComponentId, ConnectionId, ListenerId, PinId, SimTime};
pub use state::{bit_mask, LogicState, MAX_WIDTH};
pub use queue::EventQueue;
pub use event::ScheduledEvent;
pub use pin::{Connection, Pin, PinDirection};
pub use parts::{AdderKind, GateKind};
pub use component::{Component, ComponentKind, ComponentSpec, PartInfo};
pub use board::{Board, RunMode};
pub use observer::BoardEvent;
pub use registry::{create_default_registry, PartParams, PartRegistry};
pub use config::{Circuit, CircuitConfig, CircuitConfigBuilder, ConfigError};
pub use driver::{SharedBoard, TickDriver};
pub use stats::BoardStats;
pub use error::{ConnectError, SimError, SimResult};

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG`, when set, overrides `level`.
///
/// # Example
///
/// ```rust,ignore
/// logicboard::init_logging("debug");
/// ```
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
