//! Sources and sinks: clock, switch, ground and bulb.

use crate::state::{bit_mask, LogicState};

/// Next clock level: the complement of the current one.
///
/// An undetermined clock stays undetermined; the board drives a clean 0
/// on reset so this never happens in a running circuit.
pub fn clock_next(current: LogicState) -> LogicState {
    current.masked(1).negate(1)
}

/// Output of a switch holding `value`.
pub fn switch_output(value: u64, width: u32) -> LogicState {
    LogicState::driven(value & bit_mask(width))
}

/// Flips bit `bit` of a switch value. Bits outside `width` are ignored.
pub fn toggle_bit(value: u64, bit: u32, width: u32) -> u64 {
    if bit >= width {
        return value;
    }
    (value ^ (1u64 << bit)) & bit_mask(width)
}

/// Output of a ground symbol.
pub fn ground_output() -> LogicState {
    LogicState::driven(0)
}

/// A bulb is lit only by a clean driven 1.
pub fn bulb_lit(input: LogicState) -> bool {
    input.driven & 1 == 1 && input.errors() & 1 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_alternates() {
        let low = LogicState::driven(0);
        let high = clock_next(low);
        assert_eq!(high, LogicState::driven(1));
        assert_eq!(clock_next(high), low);
        assert_eq!(clock_next(LogicState::unknown(1)), LogicState::unknown(1));
    }

    #[test]
    fn test_switch_toggle() {
        assert_eq!(toggle_bit(0b000, 1, 3), 0b010);
        assert_eq!(toggle_bit(0b010, 1, 3), 0b000);
        assert_eq!(toggle_bit(0b010, 5, 3), 0b010);
        assert_eq!(switch_output(0b1111, 2), LogicState::driven(0b11));
    }

    #[test]
    fn test_bulb() {
        assert!(bulb_lit(LogicState::driven(1)));
        assert!(!bulb_lit(LogicState::driven(0)));
        assert!(!bulb_lit(LogicState::unknown(1)));
        assert!(!bulb_lit(LogicState::high_z(1)));
        assert_eq!(ground_output(), LogicState::driven(0));
    }
}
