//! Error types for the simulator.

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::{ComponentId, PinId, SimTime};

/// Hard failures reported by the board, queue and factory.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("event queue is empty")]
    EmptyQueue,

    #[error("unsupported part: {0}")]
    UnsupportedPart(String),

    #[error("width {width} outside {min}..={max}")]
    InvalidWidth { width: u32, min: u32, max: u32 },

    #[error("field width {field_width} outside {min}..={max}")]
    InvalidFieldWidth { field_width: u32, min: u32, max: u32 },

    #[error("unknown component: {0}")]
    UnknownComponent(ComponentId),

    #[error("unknown pin: {0}")]
    UnknownPin(PinId),

    #[error("component {component} has no pin {index}")]
    PinIndex { component: ComponentId, index: usize },

    #[error("component {0} is not a switch")]
    NotASwitch(ComponentId),

    #[error("component {0} has no adjustable delay")]
    FixedDelay(ComponentId),

    #[error("delay {delay} below minimum {min}")]
    InvalidDelay { delay: SimTime, min: SimTime },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for board operations.
pub type SimResult<T> = Result<T, SimError>;

/// Reasons a connection attempt was refused.
///
/// A refused connection leaves the board untouched and schedules nothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    #[error("pins must be one input and one output")]
    DirectionMismatch,

    #[error("width mismatch: output is {output} bits, input is {input} bits")]
    WidthMismatch { output: u32, input: u32 },

    #[error("unknown pin: {0}")]
    UnknownPin(PinId),
}
