//! Instruction fetch and decode.
//!
//! Decoding looks the opcode byte up in the instruction table and collects the
//! raw operand bytes that follow it. Operand interpretation (effective address
//! computation) is left to [`crate::addressing`].

use crate::encoding::{instruction, InstructionDescriptor, Operation};
use crate::fault::{FaultCode, FaultRecord};
use crate::memory::MemoryImage;

/// Rule by which an instruction's operand is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddressingMode {
    /// No operand.
    Implied,
    /// Operates on the accumulator.
    Accumulator,
    /// Operand is the byte following the opcode.
    Immediate,
    /// 8-bit address into page zero.
    ZeroPage,
    /// Zero-page address plus X, wrapping within page zero.
    ZeroPageX,
    /// Zero-page address plus Y, wrapping within page zero.
    ZeroPageY,
    /// Signed 8-bit branch displacement.
    Relative,
    /// Full 16-bit address.
    Absolute,
    /// 16-bit address plus X.
    AbsoluteX,
    /// 16-bit address plus Y.
    AbsoluteY,
    /// 16-bit pointer to the target address (JMP only).
    Indirect,
    /// `(zp,X)`: pointer read from page zero at `zp + X`.
    IndexedIndirectX,
    /// `(zp),Y`: pointer read from page zero at `zp`, then plus Y.
    IndirectIndexedY,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    #[must_use]
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::Relative
            | Self::IndexedIndirectX
            | Self::IndirectIndexedY => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }

    /// Modes that add an index register to a base address and can cross a page.
    #[must_use]
    pub const fn is_indexed_absolute(self) -> bool {
        matches!(
            self,
            Self::AbsoluteX | Self::AbsoluteY | Self::IndirectIndexedY
        )
    }
}

/// Fetched instruction: the descriptor for the opcode plus its raw operand bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Address the opcode byte was fetched from.
    pub pc: u16,
    /// Table entry for the opcode.
    pub descriptor: &'static InstructionDescriptor,
    /// Operand bytes in fetch order; unused slots are zero.
    pub operand: [u8; 2],
}

impl DecodedInstruction {
    /// Opcode byte.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        self.descriptor.opcode
    }

    /// Operation tag.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.descriptor.operation
    }

    /// Addressing mode.
    #[must_use]
    pub const fn mode(&self) -> AddressingMode {
        self.descriptor.mode
    }

    /// Little-endian 16-bit operand value.
    #[must_use]
    pub const fn operand_word(&self) -> u16 {
        u16::from_le_bytes(self.operand)
    }

    /// Address of the instruction following this one.
    #[must_use]
    pub fn next_pc(&self) -> u16 {
        self.pc.wrapping_add(u16::from(self.descriptor.length()))
    }
}

/// Result of decoding the byte at the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedOrFault {
    /// Opcode has a defined operation.
    Instruction(DecodedInstruction),
    /// Opcode is outside the official set.
    Fault(FaultRecord),
}

impl DecodedOrFault {
    /// Returns the decoded instruction if present.
    #[must_use]
    pub const fn instruction(self) -> Option<DecodedInstruction> {
        match self {
            Self::Instruction(i) => Some(i),
            Self::Fault(_) => None,
        }
    }

    /// Returns the fault record if decoding failed.
    #[must_use]
    pub const fn fault(self) -> Option<FaultRecord> {
        match self {
            Self::Instruction(_) => None,
            Self::Fault(f) => Some(f),
        }
    }
}

impl From<DecodedOrFault> for Result<DecodedInstruction, FaultRecord> {
    fn from(value: DecodedOrFault) -> Self {
        match value {
            DecodedOrFault::Instruction(i) => Ok(i),
            DecodedOrFault::Fault(r) => Err(r),
        }
    }
}

/// Stateless instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Fetches and decodes the instruction at `pc`.
    ///
    /// Operand bytes are only read for implemented opcodes, and reads wrap at
    /// the end of the address space.
    #[must_use]
    pub fn decode(memory: &MemoryImage, pc: u16) -> DecodedOrFault {
        let opcode = memory.read(pc);
        let descriptor = instruction(opcode);

        if !descriptor.is_implemented() {
            return DecodedOrFault::Fault(FaultRecord {
                code: FaultCode::UnimplementedOpcode,
                opcode,
                pc,
            });
        }

        let mut operand = [0u8; 2];
        let mut address = pc;
        for byte in operand
            .iter_mut()
            .take(usize::from(descriptor.mode.operand_bytes()))
        {
            address = address.wrapping_add(1);
            *byte = memory.read(address);
        }

        DecodedOrFault::Instruction(DecodedInstruction {
            pc,
            descriptor,
            operand,
        })
    }
}
