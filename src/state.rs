//! Four-valued logic state.
//!
//! A [`LogicState`] is a bit-vector where every bit is one of driven-0,
//! driven-1, unknown (`x`) or high-impedance (`z`). It is stored as three
//! parallel bit-fields; for any bit position at most one field is set, and a
//! bit with no field set is a driven 0.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum supported bit-width of a pin.
pub const MAX_WIDTH: u32 = 64;

/// Returns a mask with the lowest `width` bits set.
///
/// Widths of [`MAX_WIDTH`] or more yield a full mask.
pub fn bit_mask(width: u32) -> u64 {
    if width >= MAX_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// An immutable multi-bit logic value.
///
/// # Example
///
/// ```
/// use logicboard::LogicState;
///
/// // 5-bit value `01xz1`
/// let s = LogicState::new(0b01001, 0b00100, 0b00010);
/// assert_eq!(s.to_bit_string(5), "01xz1");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicState {
    /// Bits actively driven to 1
    pub driven: u64,
    /// Bits whose value cannot be determined
    pub unknown: u64,
    /// Bits with no driver
    pub high_z: u64,
}

impl LogicState {
    /// Creates a state from raw bit-fields.
    pub const fn new(driven: u64, unknown: u64, high_z: u64) -> Self {
        Self {
            driven,
            unknown,
            high_z,
        }
    }

    /// A cleanly driven value with no error bits.
    pub const fn driven(value: u64) -> Self {
        Self::new(value, 0, 0)
    }

    /// All `width` bits unknown.
    pub fn unknown(width: u32) -> Self {
        Self::new(0, bit_mask(width), 0)
    }

    /// All `width` bits floating.
    pub fn high_z(width: u32) -> Self {
        Self::new(0, 0, bit_mask(width))
    }

    /// Bits that are either unknown or floating.
    pub fn errors(&self) -> u64 {
        self.unknown | self.high_z
    }

    /// Returns true if no bit is unknown or floating.
    pub fn is_determinate(&self) -> bool {
        self.errors() == 0
    }

    /// Returns true if the state equals `other` field by field.
    pub fn equals(&self, other: &LogicState) -> bool {
        self == other
    }

    /// Returns the bitwise complement over `width` bits.
    ///
    /// Bits carrying an error stay 0 in `driven`; `unknown` and `high_z` are
    /// passed through as they are.
    pub fn negate(&self, width: u32) -> LogicState {
        LogicState {
            driven: !self.driven & !self.unknown & !self.high_z & bit_mask(width),
            unknown: self.unknown,
            high_z: self.high_z,
        }
    }

    /// Returns a copy with every field limited to the low `width` bits.
    pub fn masked(&self, width: u32) -> LogicState {
        let mask = bit_mask(width);
        LogicState::new(self.driven & mask, self.unknown & mask, self.high_z & mask)
    }

    /// Folds floating bits into unknown, as a gate input sees them.
    pub fn z_as_unknown(&self) -> LogicState {
        LogicState::new(self.driven, self.errors(), 0)
    }

    /// Returns the character for bit `i`: `0`, `1`, `x` or `z`.
    pub fn bit_char(&self, i: u32) -> char {
        let bit = 1u64 << i;
        if self.unknown & bit != 0 {
            'x'
        } else if self.high_z & bit != 0 {
            'z'
        } else if self.driven & bit != 0 {
            '1'
        } else {
            '0'
        }
    }

    /// Renders the low `width` bits, most significant first.
    pub fn to_bit_string(&self, width: u32) -> String {
        (0..width.min(MAX_WIDTH)).rev().map(|i| self.bit_char(i)).collect()
    }

    /// Parses a string of `0`, `1`, `x`/`X` and `z`/`Z`, most significant first.
    ///
    /// Returns `None` for any other character or more than [`MAX_WIDTH`] bits.
    pub fn parse_bits(s: &str) -> Option<LogicState> {
        if s.len() > MAX_WIDTH as usize {
            return None;
        }
        let mut state = LogicState::default();
        for c in s.chars() {
            state.driven <<= 1;
            state.unknown <<= 1;
            state.high_z <<= 1;
            match c {
                '0' => {}
                '1' => state.driven |= 1,
                'x' | 'X' => state.unknown |= 1,
                'z' | 'Z' => state.high_z |= 1,
                _ => return None,
            }
        }
        Some(state)
    }
}

impl fmt::Display for LogicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.driven | self.unknown | self.high_z;
        let width = (MAX_WIDTH - used.leading_zeros()).max(1);
        f.write_str(&self.to_bit_string(width))
    }
}
