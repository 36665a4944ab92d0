/// Stack-pointer value after reset (top of page `0x01`).
pub const RESET_STACK_POINTER: u8 = 0xFF;

/// `P` bit for carry.
pub const FLAG_CARRY: u8 = 1 << 0;
/// `P` bit for zero result.
pub const FLAG_ZERO: u8 = 1 << 1;
/// `P` bit for interrupt disable.
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
/// `P` bit for decimal mode.
pub const FLAG_DECIMAL: u8 = 1 << 3;
/// `P` bit for break.
pub const FLAG_BREAK: u8 = 1 << 4;
/// Unused `P` bit; only ever set in the stacked copy of the register.
pub const FLAG_UNUSED: u8 = 1 << 5;
/// `P` bit for signed overflow.
pub const FLAG_OVERFLOW: u8 = 1 << 6;
/// `P` bit for negative result.
pub const FLAG_NEGATIVE: u8 = 1 << 7;
/// Mask of the seven architectural flags held by the live register.
pub const FLAGS_ACTIVE_MASK: u8 = FLAG_CARRY
    | FLAG_ZERO
    | FLAG_INTERRUPT_DISABLE
    | FLAG_DECIMAL
    | FLAG_BREAK
    | FLAG_OVERFLOW
    | FLAG_NEGATIVE;

/// Processor status register (`P`), stored as one byte with fixed bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StatusFlags {
    bits: u8,
}

impl StatusFlags {
    /// Builds a status value, discarding the unused bit.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            bits: bits & FLAGS_ACTIVE_MASK,
        }
    }

    /// Raw status byte (bit 5 always clear).
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns `true` when every bit of `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: u8) -> bool {
        (self.bits & flag) == flag && flag != 0
    }

    /// Sets or clears the given flag bits.
    pub const fn set(&mut self, flag: u8, enabled: bool) {
        if enabled {
            self.bits |= flag & FLAGS_ACTIVE_MASK;
        } else {
            self.bits &= !flag;
        }
    }

    /// Carry flag.
    #[must_use]
    pub const fn carry(self) -> bool {
        self.contains(FLAG_CARRY)
    }

    /// Zero flag.
    #[must_use]
    pub const fn zero(self) -> bool {
        self.contains(FLAG_ZERO)
    }

    /// Interrupt-disable flag.
    #[must_use]
    pub const fn interrupt_disable(self) -> bool {
        self.contains(FLAG_INTERRUPT_DISABLE)
    }

    /// Decimal-mode flag.
    #[must_use]
    pub const fn decimal(self) -> bool {
        self.contains(FLAG_DECIMAL)
    }

    /// Break flag.
    #[must_use]
    pub const fn break_flag(self) -> bool {
        self.contains(FLAG_BREAK)
    }

    /// Overflow flag.
    #[must_use]
    pub const fn overflow(self) -> bool {
        self.contains(FLAG_OVERFLOW)
    }

    /// Negative flag.
    #[must_use]
    pub const fn negative(self) -> bool {
        self.contains(FLAG_NEGATIVE)
    }

    /// Sets Zero iff `value == 0` and Negative iff bit 7 of `value` is set.
    /// All other flags are untouched.
    pub const fn set_zero_and_negative(&mut self, value: u8) {
        self.set(FLAG_ZERO, value == 0);
        self.set(FLAG_NEGATIVE, value & 0x80 != 0);
    }

    /// Byte pushed by PHP/BRK (`brk == true`) or by hardware interrupts.
    ///
    /// Bit 5 is always set on the stack; B is set only for software pushes.
    #[must_use]
    pub const fn to_pushed_byte(self, brk: bool) -> u8 {
        let base = (self.bits & !FLAG_BREAK) | FLAG_UNUSED;
        if brk {
            base | FLAG_BREAK
        } else {
            base
        }
    }

    /// Status restored by PLP/RTI: B and bit 5 of the stacked byte are
    /// ignored and the live Break flag keeps its current value.
    #[must_use]
    pub const fn merge_pulled_byte(self, pulled: u8) -> Self {
        let kept = self.bits & FLAG_BREAK;
        Self::from_bits((pulled & !(FLAG_BREAK | FLAG_UNUSED)) | kept)
    }
}

/// Architectural register file of the 6502.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    /// Accumulator.
    pub a: u8,
    /// Index register X.
    pub x: u8,
    /// Index register Y.
    pub y: u8,
    /// Stack pointer, an offset into page `0x01`.
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Status register.
    pub status: StatusFlags,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: RESET_STACK_POINTER,
            pc: 0,
            status: StatusFlags::default(),
        }
    }
}

impl RegisterFile {
    /// Restores reset defaults with the program counter at `pc`.
    pub fn reset(&mut self, pc: u16) {
        *self = Self {
            pc,
            ..Self::default()
        };
    }

    /// Updates Z and N from `value`; see [`StatusFlags::set_zero_and_negative`].
    pub const fn set_zero_and_negative(&mut self, value: u8) {
        self.status.set_zero_and_negative(value);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        RegisterFile, StatusFlags, FLAGS_ACTIVE_MASK, FLAG_BREAK, FLAG_CARRY, FLAG_DECIMAL,
        FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE, FLAG_OVERFLOW, FLAG_UNUSED, FLAG_ZERO,
        RESET_STACK_POINTER,
    };

    const ALL_FLAGS: [u8; 7] = [
        FLAG_CARRY,
        FLAG_ZERO,
        FLAG_INTERRUPT_DISABLE,
        FLAG_DECIMAL,
        FLAG_BREAK,
        FLAG_OVERFLOW,
        FLAG_NEGATIVE,
    ];

    #[test]
    fn flag_bits_match_the_documented_layout() {
        assert_eq!(FLAG_CARRY, 0x01);
        assert_eq!(FLAG_ZERO, 0x02);
        assert_eq!(FLAG_INTERRUPT_DISABLE, 0x04);
        assert_eq!(FLAG_DECIMAL, 0x08);
        assert_eq!(FLAG_BREAK, 0x10);
        assert_eq!(FLAG_OVERFLOW, 0x40);
        assert_eq!(FLAG_NEGATIVE, 0x80);
        assert_eq!(FLAGS_ACTIVE_MASK, 0xDF);
    }

    #[test]
    fn flags_individual_bits_can_be_set_and_cleared() {
        let mut status = StatusFlags::default();

        for flag in ALL_FLAGS {
            status.set(flag, true);
            assert!(status.contains(flag));
        }
        assert_eq!(status.bits(), FLAGS_ACTIVE_MASK);

        for flag in ALL_FLAGS {
            status.set(flag, false);
            assert!(!status.contains(flag));
        }
        assert_eq!(status.bits(), 0);
    }

    #[test]
    fn unused_bit_never_reaches_the_live_register() {
        assert_eq!(StatusFlags::from_bits(0xFF).bits(), FLAGS_ACTIVE_MASK);

        let mut status = StatusFlags::default();
        status.set(FLAG_UNUSED, true);
        assert_eq!(status.bits(), 0);
    }

    #[test]
    fn zero_and_negative_leave_other_flags_alone() {
        let mut status = StatusFlags::from_bits(FLAG_CARRY | FLAG_OVERFLOW | FLAG_DECIMAL);

        status.set_zero_and_negative(0x00);
        assert!(status.zero());
        assert!(!status.negative());

        status.set_zero_and_negative(0x80);
        assert!(!status.zero());
        assert!(status.negative());

        assert!(status.carry());
        assert!(status.overflow());
        assert!(status.decimal());
    }

    #[test]
    fn pushed_byte_sets_bit_five_and_break_only_for_software_pushes() {
        let status = StatusFlags::from_bits(FLAG_CARRY | FLAG_BREAK);

        assert_eq!(status.to_pushed_byte(true), 0x31);
        assert_eq!(status.to_pushed_byte(false), 0x21);
    }

    #[test]
    fn pulled_byte_ignores_break_and_unused_bits() {
        let live = StatusFlags::default();
        assert_eq!(live.merge_pulled_byte(0xFF).bits(), FLAGS_ACTIVE_MASK & !FLAG_BREAK);

        let live = StatusFlags::from_bits(FLAG_BREAK);
        assert!(live.merge_pulled_byte(0x00).break_flag());
    }

    #[test]
    fn register_reset_restores_defaults() {
        let mut regs = RegisterFile {
            a: 1,
            x: 2,
            y: 3,
            sp: 4,
            pc: 5,
            status: StatusFlags::from_bits(0xFF),
        };

        regs.reset(0xFFFC);

        assert_eq!(regs.a, 0);
        assert_eq!(regs.x, 0);
        assert_eq!(regs.y, 0);
        assert_eq!(regs.sp, RESET_STACK_POINTER);
        assert_eq!(regs.pc, 0xFFFC);
        assert_eq!(regs.status.bits(), 0);
    }
}
