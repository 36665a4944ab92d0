//! Owning facade over [`CoreState`] and [`CoreConfig`].

use crate::execute::{execute, step_one};
use crate::{
    ConfigError, CoreConfig, CoreState, Diagnostics, ExecuteReport, FaultRecord, Interrupt,
    MemoryImage, RegisterFile, RunState, StepOutcome, TraceSink,
};

/// A single 6502 core: configuration, registers, memory and counters.
///
/// Each instance owns its state exclusively; separate instances share only the
/// read-only instruction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    config: CoreConfig,
    state: CoreState,
}

impl Cpu {
    /// Validates `config`, allocates memory and applies reset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is rejected.
    pub fn new(config: CoreConfig) -> Result<Self, ConfigError> {
        let state = CoreState::with_config(&config)?;
        Ok(Self { config, state })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Full reset: zero-fills memory and restores register defaults.
    pub fn reset(&mut self) {
        self.state.reset(&self.config);
    }

    /// Register-only reset that keeps memory, for booting a loaded image.
    pub fn reset_registers(&mut self) {
        self.state.reset_registers(&self.config);
    }

    /// Runs until `budget` cycles cannot cover the next instruction, a
    /// halting BRK retires, or a fault is raised.
    pub fn execute(&mut self, budget: u64) -> ExecuteReport {
        execute(&mut self.state, &self.config, budget, None)
    }

    /// As [`Self::execute`], dispatching trace events to `sink` when
    /// `tracing_enabled` is set in the configuration.
    pub fn execute_traced(&mut self, budget: u64, sink: &mut dyn TraceSink) -> ExecuteReport {
        let trace = self.config.tracing_enabled.then_some(sink);
        execute(&mut self.state, &self.config, budget, trace)
    }

    /// Runs one instruction boundary with an unlimited budget.
    pub fn step(&mut self) -> StepOutcome {
        step_one(&mut self.state, &self.config, u64::MAX, None)
    }

    /// Drops a latched fault; PC stays on the faulting opcode.
    pub const fn clear_fault(&mut self) -> Option<FaultRecord> {
        self.state.clear_fault()
    }

    /// Latches an interrupt request, serviced at the next instruction
    /// boundary.
    pub const fn request_interrupt(&mut self, interrupt: Interrupt) {
        self.state.interrupts.request(interrupt);
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.state.regs
    }

    /// Mutable register file.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.state.regs
    }

    /// Memory image.
    #[must_use]
    pub const fn memory(&self) -> &MemoryImage {
        &self.state.memory
    }

    /// Mutable memory image.
    pub const fn memory_mut(&mut self) -> &mut MemoryImage {
        &mut self.state.memory
    }

    /// Run counters.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.state.diagnostics
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.state.run_state
    }

    /// Complete core state.
    #[must_use]
    pub const fn state(&self) -> &CoreState {
        &self.state
    }
}
