//! Cycle-budgeted MOS 6502 instruction-set emulator core.

/// Flat memory image and fixed architectural addresses.
pub mod memory;
pub use memory::{
    crosses_page, stack_address, zero_page_address, MemoryImage, ADDRESS_SPACE_BYTES,
    IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR, STACK_PAGE, ZERO_PAGE_END, ZERO_PAGE_START,
};

/// Run counters and last-fault record.
pub mod diag;
pub use diag::Diagnostics;

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    CoreConfig, CoreState, DecimalMode, ExecuteReport, FaultPolicy, Interrupt,
    PendingInterrupts, ResetVector, StepOutcome, StopReason, TraceEvent, TraceSink,
};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    RegisterFile, RunState, StatusFlags, FLAGS_ACTIVE_MASK, FLAG_BREAK, FLAG_CARRY,
    FLAG_DECIMAL, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE, FLAG_OVERFLOW, FLAG_UNUSED, FLAG_ZERO,
    RESET_STACK_POINTER,
};

/// Operation tags and the opcode-indexed instruction table.
pub mod encoding;
pub use encoding::{
    instruction, InstructionDescriptor, Operation, INSTRUCTION_TABLE, OFFICIAL_OPCODES,
};

/// Instruction fetch and decode.
pub mod decoder;
pub use decoder::{AddressingMode, DecodedInstruction, DecodedOrFault, Decoder};

/// Effective-address resolution.
pub mod addressing;
pub use addressing::{resolve_operand, Operand, ResolvedOperand};

/// Fault taxonomy and configuration errors.
pub mod fault;
pub use fault::{ConfigError, FaultCode, FaultRecord};

/// Extra-cycle rules and fixed costs.
pub mod timing;
pub use timing::{
    branch_penalty, page_cross_penalty, INTERRUPT_SERVICE_CYCLES, UNIMPLEMENTED_CYCLES,
};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, execute, execute_instruction, stage_interrupt, step_one, ExecuteOutcome,
    ExecuteState, FlagsUpdate,
};

/// Owning core facade.
pub mod cpu;
pub use cpu::Cpu;

#[cfg(test)]
use proptest as _;
