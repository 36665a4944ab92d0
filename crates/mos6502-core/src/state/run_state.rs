use crate::FaultRecord;

/// Deterministic execution-state machine for host-observable core control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Fault is latched; no further progress until reset or `clear_fault`.
    FaultLatched(FaultRecord),
}

impl RunState {
    /// Returns the currently latched fault, if this state is fault-latched.
    #[must_use]
    pub const fn latched_fault(self) -> Option<FaultRecord> {
        match self {
            Self::FaultLatched(record) => Some(record),
            Self::Running => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;
    use crate::{FaultCode, FaultRecord};

    #[test]
    fn run_state_default_is_running() {
        assert_eq!(RunState::default(), RunState::Running);
    }

    #[test]
    fn latched_fault_accessor_reports_only_fault_latched_variant() {
        let record = FaultRecord {
            code: FaultCode::UnimplementedOpcode,
            opcode: 0x02,
            pc: 0x0400,
        };

        assert_eq!(RunState::Running.latched_fault(), None);
        assert_eq!(RunState::FaultLatched(record).latched_fault(), Some(record));
    }
}
