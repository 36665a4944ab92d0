//! Effective-address resolution for every addressing mode.

use crate::decoder::{AddressingMode, DecodedInstruction};
use crate::memory::{crosses_page, zero_page_address, MemoryImage};
use crate::state::RegisterFile;

/// Where an instruction's operand lives once its addressing mode is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// No operand.
    None,
    /// The accumulator register.
    Accumulator,
    /// Literal byte taken from the instruction stream.
    Immediate(u8),
    /// Effective memory address.
    Address(u16),
    /// Signed branch displacement relative to the next instruction.
    Relative(i8),
}

/// Outcome of operand resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedOperand {
    /// Resolved operand location.
    pub operand: Operand,
    /// Indexing moved the effective address onto a different page than the base.
    pub page_crossed: bool,
}

impl ResolvedOperand {
    const fn plain(operand: Operand) -> Self {
        Self {
            operand,
            page_crossed: false,
        }
    }

    const fn indexed(base: u16, effective: u16) -> Self {
        Self {
            operand: Operand::Address(effective),
            page_crossed: crosses_page(base, effective),
        }
    }
}

/// Reads a little-endian pointer stored in page zero. The high byte is fetched
/// from `(pointer + 1) & 0xFF`, never from page one.
fn read_zero_page_pointer(memory: &MemoryImage, pointer: u8) -> u16 {
    let lo = memory.read(zero_page_address(pointer));
    let hi = memory.read(zero_page_address(pointer.wrapping_add(1)));
    u16::from_le_bytes([lo, hi])
}

/// Reads the target of an indirect JMP.
///
/// With `page_wrap` set, a pointer at `$xxFF` takes its high byte from `$xx00`
/// as NMOS silicon does.
fn read_indirect_target(memory: &MemoryImage, pointer: u16, page_wrap: bool) -> u16 {
    let lo = memory.read(pointer);
    let hi_address = if page_wrap {
        (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF)
    } else {
        pointer.wrapping_add(1)
    };
    u16::from_le_bytes([lo, memory.read(hi_address)])
}

/// Computes the operand for `instr` against the current registers and memory.
///
/// Resolution only reads memory; it never writes.
#[must_use]
pub fn resolve_operand(
    instr: &DecodedInstruction,
    regs: &RegisterFile,
    memory: &MemoryImage,
    indirect_page_wrap: bool,
) -> ResolvedOperand {
    let byte = instr.operand[0];
    let word = instr.operand_word();

    match instr.mode() {
        AddressingMode::Implied => ResolvedOperand::plain(Operand::None),
        AddressingMode::Accumulator => ResolvedOperand::plain(Operand::Accumulator),
        AddressingMode::Immediate => ResolvedOperand::plain(Operand::Immediate(byte)),
        AddressingMode::ZeroPage => {
            ResolvedOperand::plain(Operand::Address(zero_page_address(byte)))
        }
        AddressingMode::ZeroPageX => ResolvedOperand::plain(Operand::Address(zero_page_address(
            byte.wrapping_add(regs.x),
        ))),
        AddressingMode::ZeroPageY => ResolvedOperand::plain(Operand::Address(zero_page_address(
            byte.wrapping_add(regs.y),
        ))),
        AddressingMode::Relative => {
            ResolvedOperand::plain(Operand::Relative(i8::from_le_bytes([byte])))
        }
        AddressingMode::Absolute => ResolvedOperand::plain(Operand::Address(word)),
        AddressingMode::AbsoluteX => {
            ResolvedOperand::indexed(word, word.wrapping_add(u16::from(regs.x)))
        }
        AddressingMode::AbsoluteY => {
            ResolvedOperand::indexed(word, word.wrapping_add(u16::from(regs.y)))
        }
        AddressingMode::Indirect => ResolvedOperand::plain(Operand::Address(
            read_indirect_target(memory, word, indirect_page_wrap),
        )),
        AddressingMode::IndexedIndirectX => ResolvedOperand::plain(Operand::Address(
            read_zero_page_pointer(memory, byte.wrapping_add(regs.x)),
        )),
        AddressingMode::IndirectIndexedY => {
            let base = read_zero_page_pointer(memory, byte);
            ResolvedOperand::indexed(base, base.wrapping_add(u16::from(regs.y)))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{resolve_operand, Operand, ResolvedOperand};
    use crate::decoder::Decoder;
    use crate::memory::MemoryImage;
    use crate::state::RegisterFile;

    fn resolve_at(memory: &MemoryImage, regs: &RegisterFile, page_wrap: bool) -> ResolvedOperand {
        let decoded = Decoder::decode(memory, 0x0600)
            .instruction()
            .expect("test programs use official opcodes");
        resolve_operand(&decoded, regs, memory, page_wrap)
    }

    fn program(bytes: &[u8]) -> MemoryImage {
        let mut memory = MemoryImage::default();
        memory.load(0x0600, bytes);
        memory
    }

    #[test]
    fn zero_page_x_wraps_within_page_zero() {
        let memory = program(&[0xB5, 0xF0]);
        let regs = RegisterFile {
            x: 0x20,
            ..RegisterFile::default()
        };

        let resolved = resolve_at(&memory, &regs, true);

        assert_eq!(resolved.operand, Operand::Address(0x0010));
        assert!(!resolved.page_crossed);
    }

    #[test]
    fn zero_page_y_wraps_within_page_zero() {
        let memory = program(&[0xB6, 0xFF]);
        let regs = RegisterFile {
            y: 0x01,
            ..RegisterFile::default()
        };

        assert_eq!(
            resolve_at(&memory, &regs, true).operand,
            Operand::Address(0x0000)
        );
    }

    #[rstest]
    #[case(0x00, 0x12EF, false)]
    #[case(0x10, 0x12FF, false)]
    #[case(0x11, 0x1300, true)]
    fn absolute_x_reports_page_crossing(
        #[case] x: u8,
        #[case] expected: u16,
        #[case] crossed: bool,
    ) {
        let memory = program(&[0xBD, 0xEF, 0x12]);
        let regs = RegisterFile {
            x,
            ..RegisterFile::default()
        };

        let resolved = resolve_at(&memory, &regs, true);

        assert_eq!(resolved.operand, Operand::Address(expected));
        assert_eq!(resolved.page_crossed, crossed);
    }

    #[test]
    fn absolute_y_wraps_at_top_of_address_space() {
        let memory = program(&[0xB9, 0xFF, 0xFF]);
        let regs = RegisterFile {
            y: 0x02,
            ..RegisterFile::default()
        };

        let resolved = resolve_at(&memory, &regs, true);

        assert_eq!(resolved.operand, Operand::Address(0x0001));
        assert!(resolved.page_crossed);
    }

    #[test]
    fn indexed_indirect_reads_pointer_with_zero_page_wrap() {
        let mut memory = program(&[0xA1, 0xFE]);
        memory.write(0x00FF, 0x34);
        memory.write(0x0000, 0x12);
        memory.write(0x0100, 0x99);
        let regs = RegisterFile {
            x: 0x01,
            ..RegisterFile::default()
        };

        assert_eq!(
            resolve_at(&memory, &regs, true).operand,
            Operand::Address(0x1234)
        );
    }

    #[test]
    fn indirect_indexed_adds_y_after_pointer_read() {
        let mut memory = program(&[0xB1, 0x40]);
        memory.write(0x0040, 0xF0);
        memory.write(0x0041, 0x20);
        let regs = RegisterFile {
            y: 0x20,
            ..RegisterFile::default()
        };

        let resolved = resolve_at(&memory, &regs, true);

        assert_eq!(resolved.operand, Operand::Address(0x2110));
        assert!(resolved.page_crossed);
    }

    #[rstest]
    #[case(true, 0x1234)]
    #[case(false, 0x5634)]
    fn indirect_jump_pointer_on_page_boundary(#[case] page_wrap: bool, #[case] target: u16) {
        let mut memory = program(&[0x6C, 0xFF, 0x02]);
        memory.write(0x02FF, 0x34);
        memory.write(0x0200, 0x12);
        memory.write(0x0300, 0x56);

        let resolved = resolve_at(&memory, &RegisterFile::default(), page_wrap);

        assert_eq!(resolved.operand, Operand::Address(target));
    }

    #[test]
    fn relative_operand_is_signed() {
        let memory = program(&[0xD0, 0xFE]);

        assert_eq!(
            resolve_at(&memory, &RegisterFile::default(), true).operand,
            Operand::Relative(-2)
        );
    }

    #[test]
    fn immediate_and_accumulator_carry_no_address() {
        let memory = program(&[0xA9, 0x7F]);
        assert_eq!(
            resolve_at(&memory, &RegisterFile::default(), true).operand,
            Operand::Immediate(0x7F)
        );

        let memory = program(&[0x0A]);
        let resolved = resolve_at(&memory, &RegisterFile::default(), true);
        assert_eq!(resolved.operand, Operand::Accumulator);
    }
}
