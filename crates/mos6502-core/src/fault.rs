use thiserror::Error;

/// Runtime fault taxonomy raised by the execution engine.
///
/// Arithmetic carry/overflow/decimal corner cases are defined outputs, not
/// faults, and never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// The fetched opcode byte has no defined operation.
    #[error("unimplemented opcode")]
    UnimplementedOpcode = 0x01,
    /// ADC/SBC ran with the Decimal flag set while decimal mode is rejected.
    #[error("decimal-mode arithmetic is not supported by this core configuration")]
    DecimalModeUnsupported = 0x02,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::UnimplementedOpcode),
            0x02 => Some(Self::DecimalModeUnsupported),
            _ => None,
        }
    }

    /// Faults that halt the run loop regardless of [`crate::FaultPolicy`].
    #[must_use]
    pub const fn always_halts(self) -> bool {
        matches!(self, Self::DecimalModeUnsupported)
    }
}

/// Structured record of one fault: what happened, on which opcode, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[error("{code} ${opcode:02X} at ${pc:04X}")]
pub struct FaultRecord {
    /// Fault classification.
    pub code: FaultCode,
    /// Opcode byte that raised the fault.
    pub opcode: u8,
    /// Address the opcode was fetched from.
    pub pc: u16,
}

/// Configuration rejected at construction time, before any state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// Memory image length of zero.
    #[error("memory image must contain at least one byte")]
    EmptyMemory,
    /// Memory image larger than the 16-bit address space can reach.
    #[error("memory image of {len} bytes exceeds the 64 KiB address space")]
    MemoryTooLarge {
        /// Requested length in bytes.
        len: usize,
    },
}
