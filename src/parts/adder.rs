//! Binary adders.
//!
//! The half adder works bit by bit. The full adder treats its operands as
//! unsigned integers of the adder's width; its sum is only trustworthy below
//! the first unknown or floating operand bit, since carries ripple upward.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state::{bit_mask, LogicState};

/// Adder variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdderKind {
    /// Two operands, no carry in
    Half,
    /// Two operands plus a 1-bit carry in
    Full,
}

impl fmt::Display for AdderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdderKind::Half => f.write_str("half adder"),
            AdderKind::Full => f.write_str("full adder"),
        }
    }
}

/// Result of one addition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdderOutput {
    /// `width`-bit sum
    pub sum: LogicState,
    /// 1-bit carry out
    pub carry: LogicState,
}

/// Half-adds `a` and `b` bitwise: the sum is `a ^ b` at full width and the
/// carry is `a & b` on bit 0.
///
/// Any error bit in either operand makes the whole sum and the carry unknown.
pub fn half_add(a: LogicState, b: LogicState, width: u32) -> AdderOutput {
    let mask = bit_mask(width);
    if (a.errors() | b.errors()) & mask != 0 {
        return AdderOutput {
            sum: LogicState::unknown(width),
            carry: LogicState::unknown(1),
        };
    }

    AdderOutput {
        sum: LogicState::driven((a.driven ^ b.driven) & mask),
        carry: LogicState::driven(a.driven & b.driven & 1),
    }
}

/// Adds `a`, `b` and the low bit of `carry_in`.
///
/// Sum bits below the lowest error bit of the operands are exact. That bit
/// and every bit above it are unknown, as is the carry.
pub fn full_add(a: LogicState, b: LogicState, carry_in: LogicState, width: u32) -> AdderOutput {
    let mask = bit_mask(width);
    let total = u128::from(a.driven & mask)
        + u128::from(b.driven & mask)
        + u128::from(carry_in.driven & 1);

    let errors = ((a.errors() | b.errors()) & mask) | (carry_in.errors() & 1);
    if errors == 0 {
        return AdderOutput {
            sum: LogicState::driven(total as u64 & mask),
            carry: LogicState::driven(carry_bit(total, width)),
        };
    }

    let poisoned = !bit_mask(errors.trailing_zeros()) & mask;
    AdderOutput {
        sum: LogicState::new(total as u64 & mask & !poisoned, poisoned, 0),
        carry: LogicState::unknown(1),
    }
}

fn carry_bit(total: u128, width: u32) -> u64 {
    ((total >> width) & 1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(bits: &str) -> LogicState {
        LogicState::parse_bits(bits).unwrap()
    }

    #[test]
    fn test_half_adder_single_bit() {
        let table = [
            (0, 0, 0, 0),
            (0, 1, 1, 0),
            (1, 0, 1, 0),
            (1, 1, 0, 1),
        ];
        for (a, b, sum, carry) in table {
            let out = half_add(LogicState::driven(a), LogicState::driven(b), 1);
            assert_eq!(out.sum, LogicState::driven(sum), "{a}+{b}");
            assert_eq!(out.carry, LogicState::driven(carry), "{a}+{b}");
        }
    }

    #[test]
    fn test_half_adder_multi_bit_is_bitwise() {
        // 0101 ^ 0110 = 0011, no ripple between bits
        let out = half_add(LogicState::driven(5), LogicState::driven(6), 4);
        assert_eq!(out.sum, LogicState::driven(3));
        assert_eq!(out.carry, LogicState::driven(0));

        let out = half_add(LogicState::driven(0b1111), LogicState::driven(0b0001), 4);
        assert_eq!(out.sum, LogicState::driven(0b1110));
        assert_eq!(out.carry, LogicState::driven(1));
    }

    #[test]
    fn test_half_adder_error_poisons_everything() {
        let out = half_add(s("0z"), s("00"), 2);
        assert_eq!(out.sum.to_bit_string(2), "xx");
        assert_eq!(out.carry.to_bit_string(1), "x");
    }

    #[test]
    fn test_full_adder_single_bit() {
        for a in 0..2u64 {
            for b in 0..2u64 {
                for c in 0..2u64 {
                    let out = full_add(
                        LogicState::driven(a),
                        LogicState::driven(b),
                        LogicState::driven(c),
                        1,
                    );
                    let total = a + b + c;
                    assert_eq!(out.sum, LogicState::driven(total & 1));
                    assert_eq!(out.carry, LogicState::driven(total >> 1));
                }
            }
        }
    }

    #[test]
    fn test_full_adder_keeps_low_bits_below_error() {
        // 0b0011 + 0bx000 + 1: bits 0..=2 are exact, bit 3 is unknown
        let out = full_add(s("0011"), s("x000"), LogicState::driven(1), 4);
        assert_eq!(out.sum.to_bit_string(4), "x100");
        assert_eq!(out.carry, LogicState::unknown(1));
    }

    #[test]
    fn test_full_adder_error_in_carry_in() {
        let out = full_add(s("0001"), s("0001"), LogicState::unknown(1), 4);
        assert_eq!(out.sum.to_bit_string(4), "xxxx");
        assert_eq!(out.carry, LogicState::unknown(1));
    }

    #[test]
    fn test_full_width_overflow() {
        let out = full_add(
            LogicState::driven(u64::MAX),
            LogicState::driven(1),
            LogicState::driven(1),
            64,
        );
        assert_eq!(out.sum, LogicState::driven(1));
        assert_eq!(out.carry, LogicState::driven(1));
    }
}
