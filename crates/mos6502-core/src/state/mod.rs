//! Architectural CPU state model primitives.

/// Register file and status-flag storage model.
pub mod registers;
/// Run-loop state machine.
pub mod run_state;

pub use registers::{
    RegisterFile, StatusFlags, FLAGS_ACTIVE_MASK, FLAG_BREAK, FLAG_CARRY, FLAG_DECIMAL,
    FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE, FLAG_OVERFLOW, FLAG_UNUSED, FLAG_ZERO,
    RESET_STACK_POINTER,
};
pub use run_state::RunState;
