//! Status-register update behaviors for the different instruction classes.

use crate::state::{
    StatusFlags, FLAG_CARRY, FLAG_NEGATIVE, FLAG_OVERFLOW, FLAG_ZERO,
};

/// Describes how the status register changes once an instruction commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagsUpdate {
    /// No change.
    #[default]
    None,
    /// Z and N from a result byte (loads, transfers, logic, inc/dec).
    ZeroNegative(u8),
    /// Z and N from a result byte plus an explicit carry (compares, shifts).
    ZeroNegativeCarry {
        /// Result byte.
        value: u8,
        /// New carry.
        carry: bool,
    },
    /// All four arithmetic flags set independently (ADC/SBC, binary or BCD).
    Arithmetic {
        /// Zero flag.
        zero: bool,
        /// Negative flag.
        negative: bool,
        /// Carry flag.
        carry: bool,
        /// Overflow flag.
        overflow: bool,
    },
    /// BIT: Z from the AND, N and V copied from operand bits 7 and 6.
    Bit {
        /// Zero flag.
        zero: bool,
        /// Operand bit 7.
        negative: bool,
        /// Operand bit 6.
        overflow: bool,
    },
    /// Set or clear one flag (CLC/SEC/CLI/SEI/CLD/SED/CLV).
    Single {
        /// Flag bit mask.
        flag: u8,
        /// New value.
        enabled: bool,
    },
    /// Replace the whole register (PLP/RTI, interrupt entry).
    Replace(StatusFlags),
}

impl FlagsUpdate {
    /// Applies the update to `status`.
    pub const fn apply(self, status: &mut StatusFlags) {
        match self {
            Self::None => {}
            Self::ZeroNegative(value) => status.set_zero_and_negative(value),
            Self::ZeroNegativeCarry { value, carry } => {
                status.set_zero_and_negative(value);
                status.set(FLAG_CARRY, carry);
            }
            Self::Arithmetic {
                zero,
                negative,
                carry,
                overflow,
            } => {
                status.set(FLAG_ZERO, zero);
                status.set(FLAG_NEGATIVE, negative);
                status.set(FLAG_CARRY, carry);
                status.set(FLAG_OVERFLOW, overflow);
            }
            Self::Bit {
                zero,
                negative,
                overflow,
            } => {
                status.set(FLAG_ZERO, zero);
                status.set(FLAG_NEGATIVE, negative);
                status.set(FLAG_OVERFLOW, overflow);
            }
            Self::Single { flag, enabled } => status.set(flag, enabled),
            Self::Replace(flags) => *status = flags,
        }
    }
}
