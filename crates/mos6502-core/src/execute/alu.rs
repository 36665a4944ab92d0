//! Pure arithmetic, logic and shift bodies.
//!
//! Every function maps inputs to a result byte and a [`FlagsUpdate`]; nothing
//! here touches registers or memory.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]

use super::flags::FlagsUpdate;

/// Result byte plus the flag changes it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    /// Result byte.
    pub value: u8,
    /// Flag changes to commit with the result.
    pub flags: FlagsUpdate,
}

const fn overflowed(a: u8, operand: u8, result: u8) -> bool {
    (a ^ result) & (operand ^ result) & 0x80 != 0
}

/// Binary add with carry.
#[must_use]
pub const fn adc_binary(a: u8, operand: u8, carry: bool) -> AluOutput {
    let sum = a as u16 + operand as u16 + carry as u16;
    let value = sum as u8;

    AluOutput {
        value,
        flags: FlagsUpdate::Arithmetic {
            zero: value == 0,
            negative: value & 0x80 != 0,
            carry: sum > 0xFF,
            overflow: overflowed(a, operand, value),
        },
    }
}

/// Binary subtract with borrow (carry clear means borrow).
#[must_use]
pub const fn sbc_binary(a: u8, operand: u8, carry: bool) -> AluOutput {
    adc_binary(a, !operand, carry)
}

/// NMOS decimal add.
///
/// Z comes from the binary sum; N and V are taken after the low-nibble
/// adjustment but before the high-nibble one.
#[must_use]
pub const fn adc_decimal(a: u8, operand: u8, carry: bool) -> AluOutput {
    let carry_in = carry as u16;

    let mut lo = (a & 0x0F) as u16 + (operand & 0x0F) as u16 + carry_in;
    if lo > 9 {
        lo += 6;
    }
    let mut hi = (a >> 4) as u16 + (operand >> 4) as u16 + (lo > 0x0F) as u16;

    let binary = (a as u16 + operand as u16 + carry_in) as u8;
    let intermediate = ((hi << 4) | (lo & 0x0F)) as u8;
    let zero = binary == 0;
    let negative = hi & 0x08 != 0;
    let overflow = overflowed(a, operand, intermediate);

    if hi > 9 {
        hi += 6;
    }

    AluOutput {
        value: ((hi << 4) | (lo & 0x0F)) as u8,
        flags: FlagsUpdate::Arithmetic {
            zero,
            negative,
            carry: hi > 0x0F,
            overflow,
        },
    }
}

/// NMOS decimal subtract. All flags match the binary subtraction.
#[must_use]
pub const fn sbc_decimal(a: u8, operand: u8, carry: bool) -> AluOutput {
    let borrow = (!carry) as i16;
    let binary = sbc_binary(a, operand, carry);

    let mut lo = (a & 0x0F) as i16 - (operand & 0x0F) as i16 - borrow;
    let mut hi = (a >> 4) as i16 - (operand >> 4) as i16;
    if lo < 0 {
        lo -= 6;
        hi -= 1;
    }
    if hi < 0 {
        hi -= 6;
    }

    AluOutput {
        value: ((hi << 4) as u8) | ((lo & 0x0F) as u8),
        flags: binary.flags,
    }
}

/// CMP/CPX/CPY: carry set when `register >= operand`.
#[must_use]
pub const fn compare(register: u8, operand: u8) -> FlagsUpdate {
    FlagsUpdate::ZeroNegativeCarry {
        value: register.wrapping_sub(operand),
        carry: register >= operand,
    }
}

/// BIT test.
#[must_use]
pub const fn bit(a: u8, operand: u8) -> FlagsUpdate {
    FlagsUpdate::Bit {
        zero: a & operand == 0,
        negative: operand & 0x80 != 0,
        overflow: operand & 0x40 != 0,
    }
}

/// Shift and rotate direction/kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// Arithmetic shift left.
    Asl,
    /// Logical shift right.
    Lsr,
    /// Rotate left through carry.
    Rol,
    /// Rotate right through carry.
    Ror,
}

/// Applies a shift or rotate; carry receives the bit shifted out.
#[must_use]
pub const fn shift(kind: Shift, value: u8, carry: bool) -> AluOutput {
    let (result, carry_out) = match kind {
        Shift::Asl => (value << 1, value & 0x80 != 0),
        Shift::Lsr => (value >> 1, value & 0x01 != 0),
        Shift::Rol => ((value << 1) | carry as u8, value & 0x80 != 0),
        Shift::Ror => ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0),
    };

    AluOutput {
        value: result,
        flags: FlagsUpdate::ZeroNegativeCarry {
            value: result,
            carry: carry_out,
        },
    }
}
