//! Operation tags and the 256-entry instruction table.

use crate::decoder::AddressingMode;

/// Closed set of operations the engine can apply.
///
/// `Unimplemented` is the sentinel for opcode bytes with no defined behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    Unimplemented,
}

impl Operation {
    /// Assembler mnemonic, or `"???"` for the unimplemented sentinel.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
            Self::Unimplemented => "???",
        }
    }

    /// Operations that only read their memory operand. These pay the indexed
    /// page-cross penalty; stores and read-modify-write forms do not.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(
            self,
            Self::Lda
                | Self::Ldx
                | Self::Ldy
                | Self::Adc
                | Self::Sbc
                | Self::And
                | Self::Ora
                | Self::Eor
                | Self::Cmp
                | Self::Cpx
                | Self::Cpy
                | Self::Bit
        )
    }
}

/// Immutable description of one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionDescriptor {
    /// Opcode byte; equal to this descriptor's index in the table.
    pub opcode: u8,
    /// Assembler mnemonic.
    pub mnemonic: &'static str,
    /// Addressing mode used to resolve the operand.
    pub mode: AddressingMode,
    /// Documented cycle cost before page-cross/branch penalties.
    pub base_cycles: u8,
    /// Operation tag dispatched by the engine.
    pub operation: Operation,
}

impl InstructionDescriptor {
    /// Sentinel for opcode bytes outside the official set.
    #[must_use]
    pub const fn unimplemented(opcode: u8) -> Self {
        Self {
            opcode,
            mnemonic: Operation::Unimplemented.mnemonic(),
            mode: AddressingMode::Implied,
            base_cycles: UNIMPLEMENTED_CYCLES,
            operation: Operation::Unimplemented,
        }
    }

    /// Returns `true` for every descriptor except the unimplemented sentinel.
    #[must_use]
    pub const fn is_implemented(&self) -> bool {
        !matches!(self.operation, Operation::Unimplemented)
    }

    /// Total encoded length including the opcode byte.
    #[must_use]
    pub const fn length(&self) -> u8 {
        1 + self.mode.operand_bytes()
    }
}

/// Cycles charged when the lenient policy steps over an unimplemented opcode.
pub const UNIMPLEMENTED_CYCLES: u8 = 1;

/// Single source-of-truth list of the 151 official NMOS opcodes with their
/// documented base cycle counts.
///
/// Any opcode byte not present here maps to [`Operation::Unimplemented`].
pub const OFFICIAL_OPCODES: &[(u8, Operation, AddressingMode, u8)] = &[
    // load/store
    (0xA9, Operation::Lda, AddressingMode::Immediate, 2),
    (0xA5, Operation::Lda, AddressingMode::ZeroPage, 3),
    (0xB5, Operation::Lda, AddressingMode::ZeroPageX, 4),
    (0xAD, Operation::Lda, AddressingMode::Absolute, 4),
    (0xBD, Operation::Lda, AddressingMode::AbsoluteX, 4),
    (0xB9, Operation::Lda, AddressingMode::AbsoluteY, 4),
    (0xA1, Operation::Lda, AddressingMode::IndexedIndirectX, 6),
    (0xB1, Operation::Lda, AddressingMode::IndirectIndexedY, 5),
    (0xA2, Operation::Ldx, AddressingMode::Immediate, 2),
    (0xA6, Operation::Ldx, AddressingMode::ZeroPage, 3),
    (0xB6, Operation::Ldx, AddressingMode::ZeroPageY, 4),
    (0xAE, Operation::Ldx, AddressingMode::Absolute, 4),
    (0xBE, Operation::Ldx, AddressingMode::AbsoluteY, 4),
    (0xA0, Operation::Ldy, AddressingMode::Immediate, 2),
    (0xA4, Operation::Ldy, AddressingMode::ZeroPage, 3),
    (0xB4, Operation::Ldy, AddressingMode::ZeroPageX, 4),
    (0xAC, Operation::Ldy, AddressingMode::Absolute, 4),
    (0xBC, Operation::Ldy, AddressingMode::AbsoluteX, 4),
    (0x85, Operation::Sta, AddressingMode::ZeroPage, 3),
    (0x95, Operation::Sta, AddressingMode::ZeroPageX, 4),
    (0x8D, Operation::Sta, AddressingMode::Absolute, 4),
    (0x9D, Operation::Sta, AddressingMode::AbsoluteX, 5),
    (0x99, Operation::Sta, AddressingMode::AbsoluteY, 5),
    (0x81, Operation::Sta, AddressingMode::IndexedIndirectX, 6),
    (0x91, Operation::Sta, AddressingMode::IndirectIndexedY, 6),
    (0x86, Operation::Stx, AddressingMode::ZeroPage, 3),
    (0x96, Operation::Stx, AddressingMode::ZeroPageY, 4),
    (0x8E, Operation::Stx, AddressingMode::Absolute, 4),
    (0x84, Operation::Sty, AddressingMode::ZeroPage, 3),
    (0x94, Operation::Sty, AddressingMode::ZeroPageX, 4),
    (0x8C, Operation::Sty, AddressingMode::Absolute, 4),
    // register transfers
    (0xAA, Operation::Tax, AddressingMode::Implied, 2),
    (0xA8, Operation::Tay, AddressingMode::Implied, 2),
    (0xBA, Operation::Tsx, AddressingMode::Implied, 2),
    (0x8A, Operation::Txa, AddressingMode::Implied, 2),
    (0x9A, Operation::Txs, AddressingMode::Implied, 2),
    (0x98, Operation::Tya, AddressingMode::Implied, 2),
    // stack
    (0x48, Operation::Pha, AddressingMode::Implied, 3),
    (0x08, Operation::Php, AddressingMode::Implied, 3),
    (0x68, Operation::Pla, AddressingMode::Implied, 4),
    (0x28, Operation::Plp, AddressingMode::Implied, 4),
    // logical
    (0x29, Operation::And, AddressingMode::Immediate, 2),
    (0x25, Operation::And, AddressingMode::ZeroPage, 3),
    (0x35, Operation::And, AddressingMode::ZeroPageX, 4),
    (0x2D, Operation::And, AddressingMode::Absolute, 4),
    (0x3D, Operation::And, AddressingMode::AbsoluteX, 4),
    (0x39, Operation::And, AddressingMode::AbsoluteY, 4),
    (0x21, Operation::And, AddressingMode::IndexedIndirectX, 6),
    (0x31, Operation::And, AddressingMode::IndirectIndexedY, 5),
    (0x49, Operation::Eor, AddressingMode::Immediate, 2),
    (0x45, Operation::Eor, AddressingMode::ZeroPage, 3),
    (0x55, Operation::Eor, AddressingMode::ZeroPageX, 4),
    (0x4D, Operation::Eor, AddressingMode::Absolute, 4),
    (0x5D, Operation::Eor, AddressingMode::AbsoluteX, 4),
    (0x59, Operation::Eor, AddressingMode::AbsoluteY, 4),
    (0x41, Operation::Eor, AddressingMode::IndexedIndirectX, 6),
    (0x51, Operation::Eor, AddressingMode::IndirectIndexedY, 5),
    (0x09, Operation::Ora, AddressingMode::Immediate, 2),
    (0x05, Operation::Ora, AddressingMode::ZeroPage, 3),
    (0x15, Operation::Ora, AddressingMode::ZeroPageX, 4),
    (0x0D, Operation::Ora, AddressingMode::Absolute, 4),
    (0x1D, Operation::Ora, AddressingMode::AbsoluteX, 4),
    (0x19, Operation::Ora, AddressingMode::AbsoluteY, 4),
    (0x01, Operation::Ora, AddressingMode::IndexedIndirectX, 6),
    (0x11, Operation::Ora, AddressingMode::IndirectIndexedY, 5),
    (0x24, Operation::Bit, AddressingMode::ZeroPage, 3),
    (0x2C, Operation::Bit, AddressingMode::Absolute, 4),
    // arithmetic
    (0x69, Operation::Adc, AddressingMode::Immediate, 2),
    (0x65, Operation::Adc, AddressingMode::ZeroPage, 3),
    (0x75, Operation::Adc, AddressingMode::ZeroPageX, 4),
    (0x6D, Operation::Adc, AddressingMode::Absolute, 4),
    (0x7D, Operation::Adc, AddressingMode::AbsoluteX, 4),
    (0x79, Operation::Adc, AddressingMode::AbsoluteY, 4),
    (0x61, Operation::Adc, AddressingMode::IndexedIndirectX, 6),
    (0x71, Operation::Adc, AddressingMode::IndirectIndexedY, 5),
    (0xE9, Operation::Sbc, AddressingMode::Immediate, 2),
    (0xE5, Operation::Sbc, AddressingMode::ZeroPage, 3),
    (0xF5, Operation::Sbc, AddressingMode::ZeroPageX, 4),
    (0xED, Operation::Sbc, AddressingMode::Absolute, 4),
    (0xFD, Operation::Sbc, AddressingMode::AbsoluteX, 4),
    (0xF9, Operation::Sbc, AddressingMode::AbsoluteY, 4),
    (0xE1, Operation::Sbc, AddressingMode::IndexedIndirectX, 6),
    (0xF1, Operation::Sbc, AddressingMode::IndirectIndexedY, 5),
    // compare
    (0xC9, Operation::Cmp, AddressingMode::Immediate, 2),
    (0xC5, Operation::Cmp, AddressingMode::ZeroPage, 3),
    (0xD5, Operation::Cmp, AddressingMode::ZeroPageX, 4),
    (0xCD, Operation::Cmp, AddressingMode::Absolute, 4),
    (0xDD, Operation::Cmp, AddressingMode::AbsoluteX, 4),
    (0xD9, Operation::Cmp, AddressingMode::AbsoluteY, 4),
    (0xC1, Operation::Cmp, AddressingMode::IndexedIndirectX, 6),
    (0xD1, Operation::Cmp, AddressingMode::IndirectIndexedY, 5),
    (0xE0, Operation::Cpx, AddressingMode::Immediate, 2),
    (0xE4, Operation::Cpx, AddressingMode::ZeroPage, 3),
    (0xEC, Operation::Cpx, AddressingMode::Absolute, 4),
    (0xC0, Operation::Cpy, AddressingMode::Immediate, 2),
    (0xC4, Operation::Cpy, AddressingMode::ZeroPage, 3),
    (0xCC, Operation::Cpy, AddressingMode::Absolute, 4),
    // increments/decrements
    (0xE6, Operation::Inc, AddressingMode::ZeroPage, 5),
    (0xF6, Operation::Inc, AddressingMode::ZeroPageX, 6),
    (0xEE, Operation::Inc, AddressingMode::Absolute, 6),
    (0xFE, Operation::Inc, AddressingMode::AbsoluteX, 7),
    (0xE8, Operation::Inx, AddressingMode::Implied, 2),
    (0xC8, Operation::Iny, AddressingMode::Implied, 2),
    (0xC6, Operation::Dec, AddressingMode::ZeroPage, 5),
    (0xD6, Operation::Dec, AddressingMode::ZeroPageX, 6),
    (0xCE, Operation::Dec, AddressingMode::Absolute, 6),
    (0xDE, Operation::Dec, AddressingMode::AbsoluteX, 7),
    (0xCA, Operation::Dex, AddressingMode::Implied, 2),
    (0x88, Operation::Dey, AddressingMode::Implied, 2),
    // shifts/rotates
    (0x0A, Operation::Asl, AddressingMode::Accumulator, 2),
    (0x06, Operation::Asl, AddressingMode::ZeroPage, 5),
    (0x16, Operation::Asl, AddressingMode::ZeroPageX, 6),
    (0x0E, Operation::Asl, AddressingMode::Absolute, 6),
    (0x1E, Operation::Asl, AddressingMode::AbsoluteX, 7),
    (0x4A, Operation::Lsr, AddressingMode::Accumulator, 2),
    (0x46, Operation::Lsr, AddressingMode::ZeroPage, 5),
    (0x56, Operation::Lsr, AddressingMode::ZeroPageX, 6),
    (0x4E, Operation::Lsr, AddressingMode::Absolute, 6),
    (0x5E, Operation::Lsr, AddressingMode::AbsoluteX, 7),
    (0x2A, Operation::Rol, AddressingMode::Accumulator, 2),
    (0x26, Operation::Rol, AddressingMode::ZeroPage, 5),
    (0x36, Operation::Rol, AddressingMode::ZeroPageX, 6),
    (0x2E, Operation::Rol, AddressingMode::Absolute, 6),
    (0x3E, Operation::Rol, AddressingMode::AbsoluteX, 7),
    (0x6A, Operation::Ror, AddressingMode::Accumulator, 2),
    (0x66, Operation::Ror, AddressingMode::ZeroPage, 5),
    (0x76, Operation::Ror, AddressingMode::ZeroPageX, 6),
    (0x6E, Operation::Ror, AddressingMode::Absolute, 6),
    (0x7E, Operation::Ror, AddressingMode::AbsoluteX, 7),
    // jumps/calls
    (0x4C, Operation::Jmp, AddressingMode::Absolute, 3),
    (0x6C, Operation::Jmp, AddressingMode::Indirect, 5),
    (0x20, Operation::Jsr, AddressingMode::Absolute, 6),
    (0x60, Operation::Rts, AddressingMode::Implied, 6),
    (0x40, Operation::Rti, AddressingMode::Implied, 6),
    // branches
    (0x90, Operation::Bcc, AddressingMode::Relative, 2),
    (0xB0, Operation::Bcs, AddressingMode::Relative, 2),
    (0xF0, Operation::Beq, AddressingMode::Relative, 2),
    (0x30, Operation::Bmi, AddressingMode::Relative, 2),
    (0xD0, Operation::Bne, AddressingMode::Relative, 2),
    (0x10, Operation::Bpl, AddressingMode::Relative, 2),
    (0x50, Operation::Bvc, AddressingMode::Relative, 2),
    (0x70, Operation::Bvs, AddressingMode::Relative, 2),
    // status flags
    (0x18, Operation::Clc, AddressingMode::Implied, 2),
    (0xD8, Operation::Cld, AddressingMode::Implied, 2),
    (0x58, Operation::Cli, AddressingMode::Implied, 2),
    (0xB8, Operation::Clv, AddressingMode::Implied, 2),
    (0x38, Operation::Sec, AddressingMode::Implied, 2),
    (0xF8, Operation::Sed, AddressingMode::Implied, 2),
    (0x78, Operation::Sei, AddressingMode::Implied, 2),
    // system
    (0x00, Operation::Brk, AddressingMode::Implied, 7),
    (0xEA, Operation::Nop, AddressingMode::Implied, 2),
];

#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
const fn build_instruction_table() -> [InstructionDescriptor; 256] {
    let mut table = [InstructionDescriptor::unimplemented(0); 256];

    let mut index = 0;
    while index < table.len() {
        table[index] = InstructionDescriptor::unimplemented(index as u8);
        index += 1;
    }

    let mut entry = 0;
    while entry < OFFICIAL_OPCODES.len() {
        let (opcode, operation, mode, base_cycles) = OFFICIAL_OPCODES[entry];
        table[opcode as usize] = InstructionDescriptor {
            opcode,
            mnemonic: operation.mnemonic(),
            mode,
            base_cycles,
            operation,
        };
        entry += 1;
    }

    table
}

/// Total opcode table, indexed directly by opcode byte. Built at compile time
/// and shared read-only by every core instance.
pub static INSTRUCTION_TABLE: [InstructionDescriptor; 256] = build_instruction_table();

/// Looks up the descriptor for an opcode byte. Never fails.
#[must_use]
pub fn instruction(opcode: u8) -> &'static InstructionDescriptor {
    &INSTRUCTION_TABLE[usize::from(opcode)]
}
