//! Primitive logic gates.
//!
//! Every gate combines its inputs bitwise across the configured width.
//! Floating inputs are read as unknown. An input bit that settles the
//! result on its own (a clean 0 for AND, a clean 1 for OR) clears the
//! unknown flag on that output bit; XOR needs every input bit and never does.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::{bit_mask, LogicState};

/// The gate family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
    Buf,
    Not,
}

impl GateKind {
    /// Every gate kind.
    pub const ALL: [GateKind; 8] = [
        GateKind::And,
        GateKind::Nand,
        GateKind::Or,
        GateKind::Nor,
        GateKind::Xor,
        GateKind::Xnor,
        GateKind::Buf,
        GateKind::Not,
    ];

    /// Returns true if the output is the complement of the base gate.
    pub fn is_negated(self) -> bool {
        matches!(
            self,
            GateKind::Nand | GateKind::Nor | GateKind::Xnor | GateKind::Not
        )
    }

    /// Returns true for single-input gates.
    pub fn is_unary(self) -> bool {
        matches!(self, GateKind::Buf | GateKind::Not)
    }

    /// Fewest input pins allowed.
    pub fn min_inputs(self) -> u32 {
        if self.is_unary() {
            1
        } else {
            2
        }
    }

    /// Most input pins allowed.
    pub fn max_inputs(self) -> u32 {
        if self.is_unary() {
            1
        } else {
            4
        }
    }

    /// Input count of a freshly placed gate.
    pub fn default_inputs(self) -> u32 {
        self.max_inputs().min(2)
    }

    /// Computes the gate output over `width` bits.
    pub fn evaluate(self, inputs: &[LogicState], width: u32) -> LogicState {
        match self {
            GateKind::And => and(inputs, width),
            GateKind::Nand => and(inputs, width).negate(width),
            GateKind::Or => or(inputs, width),
            GateKind::Nor => or(inputs, width).negate(width),
            GateKind::Xor => xor(inputs, width),
            GateKind::Xnor => xor(inputs, width).negate(width),
            GateKind::Buf => buf(first(inputs, width), width),
            GateKind::Not => not(first(inputs, width), width),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateKind::And => "AND",
            GateKind::Nand => "NAND",
            GateKind::Or => "OR",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
            GateKind::Xnor => "XNOR",
            GateKind::Buf => "BUF",
            GateKind::Not => "NOT",
        };
        f.write_str(name)
    }
}

/// A missing input reads as floating.
fn first(inputs: &[LogicState], width: u32) -> LogicState {
    inputs
        .first()
        .copied()
        .unwrap_or_else(|| LogicState::high_z(width))
}

/// Bitwise AND of all inputs.
pub fn and(inputs: &[LogicState], width: u32) -> LogicState {
    let mask = bit_mask(width);
    let mut value = mask;
    let mut unknown = 0;
    // bits where some input is a clean 0
    let mut zeroes = 0;

    for s in inputs {
        zeroes |= !(s.driven | s.unknown | s.high_z);
        value &= s.driven;
        unknown |= s.errors();
    }
    unknown &= !zeroes;

    LogicState::new(value & mask, unknown & mask, 0)
}

/// Bitwise OR of all inputs.
pub fn or(inputs: &[LogicState], width: u32) -> LogicState {
    let mask = bit_mask(width);
    let mut value = 0;
    let mut unknown = 0;

    for s in inputs {
        value |= s.driven;
        unknown |= s.errors();
    }
    unknown &= !value;

    LogicState::new(value & mask, unknown & mask, 0)
}

/// Bitwise XOR of all inputs.
pub fn xor(inputs: &[LogicState], width: u32) -> LogicState {
    let mask = bit_mask(width);
    let mut value = 0;
    let mut unknown = 0;

    for s in inputs {
        value ^= s.driven;
        unknown |= s.errors();
    }

    LogicState::new(value & !unknown & mask, unknown & mask, 0)
}

/// Passes the input through, reading floating bits as unknown.
pub fn buf(input: LogicState, width: u32) -> LogicState {
    input.z_as_unknown().masked(width)
}

/// Complements the input, reading floating bits as unknown.
pub fn not(input: LogicState, width: u32) -> LogicState {
    let unknown = input.errors() & bit_mask(width);
    LogicState::new(!input.driven & !unknown & bit_mask(width), unknown, 0)
}
