//! Saturating run counters and last-fault record.

use crate::{FaultCode, FaultRecord};

/// Host-readable diagnostic counters for a core instance.
///
/// Every counter saturates instead of wrapping. Cleared by reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Diagnostics {
    /// Instructions retired, lenient-policy skips included.
    pub instructions_retired: u64,
    /// Cycles consumed by instructions and interrupt entries.
    pub cycles_consumed: u64,
    /// Unimplemented-opcode faults raised.
    pub unimplemented_opcode_faults: u32,
    /// Decimal-mode faults raised.
    pub decimal_mode_faults: u32,
    /// IRQ/NMI entries serviced.
    pub interrupts_serviced: u32,
    /// Most recent fault, if any.
    pub last_fault: Option<FaultRecord>,
}

impl Diagnostics {
    /// Creates a zeroed counter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one retired instruction.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_retired(&mut self, cycles: u8) {
        self.instructions_retired = self.instructions_retired.saturating_add(1);
        self.cycles_consumed = self.cycles_consumed.saturating_add(u64::from(cycles));
    }

    /// Records one interrupt entry.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_interrupt(&mut self, cycles: u8) {
        self.interrupts_serviced = self.interrupts_serviced.saturating_add(1);
        self.cycles_consumed = self.cycles_consumed.saturating_add(u64::from(cycles));
    }

    /// Records a fault occurrence and bumps the counter for its code.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_fault(&mut self, record: FaultRecord) {
        self.last_fault = Some(record);
        match record.code {
            FaultCode::UnimplementedOpcode => {
                self.unimplemented_opcode_faults =
                    self.unimplemented_opcode_faults.saturating_add(1);
            }
            FaultCode::DecimalModeUnsupported => {
                self.decimal_mode_faults = self.decimal_mode_faults.saturating_add(1);
            }
        }
    }

    /// Resets all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
