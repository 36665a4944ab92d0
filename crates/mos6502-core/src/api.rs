//! Public host-facing API contracts for embedding the emulator core.

use log::debug;

use crate::memory::{MemoryImage, ADDRESS_SPACE_BYTES, RESET_VECTOR};
use crate::{ConfigError, Diagnostics, FaultRecord, RegisterFile, RunState};

/// What the engine does when it meets an unimplemented opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultPolicy {
    /// Commit nothing, leave PC on the opcode and latch the fault.
    #[default]
    Strict,
    /// Retire the opcode as a one-cycle no-op and report the fault.
    Lenient,
}

/// Behavior of ADC/SBC while the Decimal flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecimalMode {
    /// NMOS binary-coded-decimal arithmetic.
    #[default]
    Bcd,
    /// Raise [`crate::FaultCode::DecimalModeUnsupported`] instead.
    Reject,
}

/// Source of the program counter after reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ResetVector {
    /// PC is set to this constant.
    Fixed(u16),
    /// PC is loaded from the little-endian word at `0xFFFC`.
    FromMemory,
}

impl Default for ResetVector {
    fn default() -> Self {
        Self::Fixed(RESET_VECTOR)
    }
}

/// Top-level immutable configuration for a core instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct CoreConfig {
    /// Memory image length in bytes, `1..=65536`.
    pub memory_size: usize,
    /// Unimplemented-opcode handling.
    pub fault_policy: FaultPolicy,
    /// Decimal-mode arithmetic handling.
    pub decimal_mode: DecimalMode,
    /// Program counter source on reset.
    pub reset_vector: ResetVector,
    /// Reproduce the NMOS `JMP ($xxFF)` high-byte fetch from `$xx00`.
    pub indirect_jump_page_wrap: bool,
    /// Stop the run loop after BRK has executed.
    pub halt_on_break: bool,
    /// Enables deterministic trace callback dispatch.
    pub tracing_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            memory_size: ADDRESS_SPACE_BYTES,
            fault_policy: FaultPolicy::Strict,
            decimal_mode: DecimalMode::Bcd,
            reset_vector: ResetVector::default(),
            indirect_jump_page_wrap: true,
            halt_on_break: true,
            tracing_enabled: false,
        }
    }
}

impl CoreConfig {
    /// Checks the configuration without allocating anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `memory_size` is zero or larger than the
    /// 16-bit address space.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        crate::memory::validate_len(self.memory_size)
    }
}

/// Hardware interrupt lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Interrupt {
    /// Maskable interrupt request, vector `0xFFFE`.
    Irq,
    /// Non-maskable interrupt, vector `0xFFFA`.
    Nmi,
}

/// Latched interrupt request lines awaiting acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PendingInterrupts {
    /// IRQ line asserted.
    pub irq: bool,
    /// NMI edge latched.
    pub nmi: bool,
}

impl PendingInterrupts {
    /// Latches a request.
    pub const fn request(&mut self, interrupt: Interrupt) {
        match interrupt {
            Interrupt::Irq => self.irq = true,
            Interrupt::Nmi => self.nmi = true,
        }
    }

    /// Clears a request once it has been serviced.
    pub const fn acknowledge(&mut self, interrupt: Interrupt) {
        match interrupt {
            Interrupt::Irq => self.irq = false,
            Interrupt::Nmi => self.nmi = false,
        }
    }

    /// Highest-priority request that may be serviced now. NMI always wins;
    /// IRQ is masked while `interrupt_disable` is set.
    #[must_use]
    pub const fn next(self, interrupt_disable: bool) -> Option<Interrupt> {
        if self.nmi {
            Some(Interrupt::Nmi)
        } else if self.irq && !interrupt_disable {
            Some(Interrupt::Irq)
        } else {
            None
        }
    }
}

/// Complete host-visible core state used by stepping APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreState {
    /// Architectural register file.
    pub regs: RegisterFile,
    /// Owned memory image.
    pub memory: MemoryImage,
    /// Current execution state.
    pub run_state: RunState,
    /// Interrupt lines awaiting service.
    pub interrupts: PendingInterrupts,
    /// Run counters.
    pub diagnostics: Diagnostics,
}

impl CoreState {
    /// Allocates state for `config` and applies reset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is rejected; nothing is
    /// allocated in that case.
    pub fn with_config(config: &CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            regs: RegisterFile::default(),
            memory: MemoryImage::with_len(config.memory_size)?,
            run_state: RunState::Running,
            interrupts: PendingInterrupts::default(),
            diagnostics: Diagnostics::default(),
        };
        state.reset(config);
        debug!(
            "core configured: {} bytes, {:?} faults, {:?} decimal",
            config.memory_size, config.fault_policy, config.decimal_mode
        );
        Ok(state)
    }

    /// Full power-on reset: zero-fills memory, then restores registers.
    pub fn reset(&mut self, config: &CoreConfig) {
        self.memory.reset();
        self.reset_registers(config);
    }

    /// Restores registers, run state, interrupt lines and diagnostics while
    /// preserving memory, so a preloaded image can boot through its own
    /// reset vector.
    pub fn reset_registers(&mut self, config: &CoreConfig) {
        let pc = match config.reset_vector {
            ResetVector::Fixed(pc) => pc,
            ResetVector::FromMemory => self.memory.read_word(RESET_VECTOR),
        };
        self.regs.reset(pc);
        self.run_state = RunState::Running;
        self.interrupts = PendingInterrupts::default();
        self.diagnostics.reset();
        debug!("reset: pc=${pc:04X}");
    }

    /// Drops a latched fault so execution can resume.
    ///
    /// PC is left on the faulting opcode; the host decides whether to skip it.
    pub const fn clear_fault(&mut self) -> Option<FaultRecord> {
        let latched = self.run_state.latched_fault();
        self.run_state = RunState::Running;
        latched
    }
}

/// Output status from one instruction-boundary attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction retired.
    Retired {
        /// Opcode byte.
        opcode: u8,
        /// Cycles charged.
        cycles: u8,
    },
    /// BRK retired.
    Break {
        /// Cycles charged.
        cycles: u8,
    },
    /// An interrupt entry sequence ran instead of an instruction.
    InterruptServiced {
        /// Line that was serviced.
        interrupt: Interrupt,
        /// Cycles charged.
        cycles: u8,
    },
    /// The next instruction or interrupt entry does not fit the remaining
    /// budget; nothing was committed.
    BudgetExhausted {
        /// Cycles the pending work would cost.
        required: u8,
    },
    /// A fault was raised.
    Fault {
        /// Fault details.
        record: FaultRecord,
        /// Cycles charged: one for a lenient skip, zero otherwise.
        cycles: u8,
    },
}

impl StepOutcome {
    /// Cycles consumed by this step.
    #[must_use]
    pub const fn cycles(self) -> u8 {
        match self {
            Self::Retired { cycles, .. }
            | Self::Break { cycles }
            | Self::InterruptServiced { cycles, .. }
            | Self::Fault { cycles, .. } => cycles,
            Self::BudgetExhausted { .. } => 0,
        }
    }
}

/// Why a run loop call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The remaining budget cannot cover the next instruction.
    BudgetExhausted,
    /// BRK executed with `halt_on_break` set.
    Break,
    /// A fault was raised, or one was already latched.
    Fault,
}

/// Aggregated outcome from one `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecuteReport {
    /// Cycles consumed; never more than the budget.
    pub cycles_consumed: u64,
    /// Instructions retired (interrupt entries excluded).
    pub instructions: u64,
    /// Fault that stopped the run, if any.
    pub fault: Option<FaultRecord>,
    /// Why the run stopped.
    pub stop: StopReason,
}

/// Deterministic trace events emitted at step boundaries when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Instruction fetched and about to execute.
    InstructionStart {
        /// Program counter used for this fetch.
        pc: u16,
        /// Opcode byte.
        opcode: u8,
    },
    /// Instruction committed.
    InstructionRetired {
        /// Program counter of the retired instruction.
        pc: u16,
        /// Opcode byte.
        opcode: u8,
        /// Cycles consumed.
        cycles: u8,
    },
    /// Memory write in commit order.
    MemoryWrite {
        /// Target address.
        addr: u16,
        /// Byte written.
        value: u8,
    },
    /// Interrupt entry committed.
    InterruptServiced {
        /// Serviced line.
        interrupt: Interrupt,
        /// Handler address loaded into PC.
        handler: u16,
    },
    /// Fault raised.
    FaultRaised {
        /// Fault details.
        record: FaultRecord,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
