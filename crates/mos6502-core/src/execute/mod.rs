//! Instruction execution pipeline.
//!
//! Each instruction runs as a staged sequence:
//! 1. Fetch and decode the opcode
//! 2. Resolve the operand
//! 3. Apply the operation into a pending [`ExecuteState`]
//! 4. Check the cycle cost against the remaining budget
//! 5. Commit memory writes, registers, flags and PC
//!
//! Nothing reaches the core state before step 5, so a fault or a budget
//! shortfall leaves registers and memory exactly as they were.

mod alu;
mod flags;

pub use alu::{
    adc_binary, adc_decimal, bit, compare, sbc_binary, sbc_decimal, shift, AluOutput, Shift,
};
pub use flags::FlagsUpdate;

use log::{debug, trace, warn};

use crate::addressing::{resolve_operand, Operand};
use crate::decoder::{DecodedInstruction, DecodedOrFault, Decoder};
use crate::encoding::Operation;
use crate::memory::{stack_address, IRQ_VECTOR, NMI_VECTOR};
use crate::state::{
    RegisterFile, FLAG_BREAK, FLAG_CARRY, FLAG_DECIMAL, FLAG_INTERRUPT_DISABLE, FLAG_OVERFLOW,
};
use crate::timing::{
    branch_penalty, instruction_cycles, page_cross_penalty, INTERRUPT_SERVICE_CYCLES,
    UNIMPLEMENTED_CYCLES,
};
use crate::{
    CoreConfig, CoreState, DecimalMode, ExecuteReport, FaultCode, FaultPolicy, FaultRecord,
    Interrupt, RunState, StepOutcome, StopReason, TraceEvent, TraceSink,
};

/// Most memory writes a single instruction or interrupt entry can stage.
pub const MAX_PENDING_WRITES: usize = 3;

/// Outcome of staging a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Instruction staged successfully.
    Retired {
        /// Total cycle cost including penalties.
        cycles: u8,
    },
    /// BRK staged; the run loop may stop after committing it.
    Break {
        /// Total cycle cost.
        cycles: u8,
    },
    /// The instruction cannot run; nothing may be committed.
    Fault(FaultRecord),
}

/// Side effects accumulated while an instruction is staged.
///
/// `regs` starts as a copy of the live registers. Its status field is never
/// modified during staging; status changes travel in `flags_update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteState {
    /// Pending register values, including the next PC.
    pub regs: RegisterFile,
    /// Memory writes in program order.
    pub writes: [(u16, u8); MAX_PENDING_WRITES],
    /// Number of valid entries in `writes`.
    pub write_count: usize,
    /// Status update applied at commit.
    pub flags_update: FlagsUpdate,
    /// Cycle cost of the staged work.
    pub cycles: u8,
}

impl ExecuteState {
    /// Starts staging from the current registers with PC at `next_pc`.
    #[must_use]
    pub const fn new(regs: &RegisterFile, next_pc: u16) -> Self {
        let mut pending = *regs;
        pending.pc = next_pc;
        Self {
            regs: pending,
            writes: [(0, 0); MAX_PENDING_WRITES],
            write_count: 0,
            flags_update: FlagsUpdate::None,
            cycles: 0,
        }
    }

    /// Staged memory writes.
    #[must_use]
    pub fn pending_writes(&self) -> &[(u16, u8)] {
        &self.writes[..self.write_count]
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Some(slot) = self.writes.get_mut(self.write_count) {
            *slot = (addr, value);
            self.write_count += 1;
        }
    }

    fn push(&mut self, value: u8) {
        self.write(stack_address(self.regs.sp), value);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(hi);
        self.push(lo);
    }

    /// Pops from the committed stack. Pulls never follow a staged push within
    /// one instruction, so committed memory is current.
    fn pull(&mut self, state: &CoreState) -> u8 {
        self.regs.sp = self.regs.sp.wrapping_add(1);
        state.memory.read(stack_address(self.regs.sp))
    }

    fn pull_word(&mut self, state: &CoreState) -> u16 {
        let lo = self.pull(state);
        let hi = self.pull(state);
        u16::from_le_bytes([lo, hi])
    }

    /// Writes a result back to wherever the operand came from.
    fn store(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Address(addr) => self.write(addr, value),
            Operand::Accumulator => self.regs.a = value,
            Operand::None | Operand::Immediate(_) | Operand::Relative(_) => {}
        }
    }
}

fn operand_value(operand: Operand, state: &CoreState) -> u8 {
    match operand {
        Operand::Immediate(value) => value,
        Operand::Address(addr) => state.memory.read(addr),
        Operand::Accumulator => state.regs.a,
        Operand::None | Operand::Relative(_) => 0,
    }
}

const fn branch_taken(operation: Operation, regs: &RegisterFile) -> bool {
    let status = regs.status;
    match operation {
        Operation::Bcc => !status.carry(),
        Operation::Bcs => status.carry(),
        Operation::Bne => !status.zero(),
        Operation::Beq => status.zero(),
        Operation::Bpl => !status.negative(),
        Operation::Bmi => status.negative(),
        Operation::Bvc => !status.overflow(),
        Operation::Bvs => status.overflow(),
        _ => false,
    }
}

/// Stages a single decoded instruction against the current state.
///
/// Returns the outcome and the pending side effects. The state is only read;
/// the caller commits with [`commit_execution`] once the budget allows it.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn execute_instruction(
    instr: &DecodedInstruction,
    state: &CoreState,
    config: &CoreConfig,
) -> (ExecuteOutcome, ExecuteState) {
    let regs = &state.regs;
    let status = regs.status;
    let resolved = resolve_operand(instr, regs, &state.memory, config.indirect_jump_page_wrap);
    let operand = resolved.operand;
    let next_pc = instr.next_pc();

    let mut exec = ExecuteState::new(regs, next_pc);
    let mut branch_cycles = 0;
    let mut is_break = false;

    match instr.operation() {
        Operation::Lda => {
            let value = operand_value(operand, state);
            exec.regs.a = value;
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Ldx => {
            let value = operand_value(operand, state);
            exec.regs.x = value;
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Ldy => {
            let value = operand_value(operand, state);
            exec.regs.y = value;
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Sta => exec.store(operand, regs.a),
        Operation::Stx => exec.store(operand, regs.x),
        Operation::Sty => exec.store(operand, regs.y),

        Operation::Tax => {
            exec.regs.x = regs.a;
            exec.flags_update = FlagsUpdate::ZeroNegative(regs.a);
        }
        Operation::Tay => {
            exec.regs.y = regs.a;
            exec.flags_update = FlagsUpdate::ZeroNegative(regs.a);
        }
        Operation::Txa => {
            exec.regs.a = regs.x;
            exec.flags_update = FlagsUpdate::ZeroNegative(regs.x);
        }
        Operation::Tya => {
            exec.regs.a = regs.y;
            exec.flags_update = FlagsUpdate::ZeroNegative(regs.y);
        }
        Operation::Tsx => {
            exec.regs.x = regs.sp;
            exec.flags_update = FlagsUpdate::ZeroNegative(regs.sp);
        }
        Operation::Txs => exec.regs.sp = regs.x,

        Operation::Pha => exec.push(regs.a),
        Operation::Php => exec.push(status.to_pushed_byte(true)),
        Operation::Pla => {
            let value = exec.pull(state);
            exec.regs.a = value;
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Plp => {
            let pulled = exec.pull(state);
            exec.flags_update = FlagsUpdate::Replace(status.merge_pulled_byte(pulled));
        }

        Operation::And => {
            let value = regs.a & operand_value(operand, state);
            exec.regs.a = value;
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Ora => {
            let value = regs.a | operand_value(operand, state);
            exec.regs.a = value;
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Eor => {
            let value = regs.a ^ operand_value(operand, state);
            exec.regs.a = value;
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Bit => exec.flags_update = bit(regs.a, operand_value(operand, state)),

        Operation::Adc | Operation::Sbc => {
            let value = operand_value(operand, state);
            let subtract = instr.operation() == Operation::Sbc;
            let output = match (status.decimal(), config.decimal_mode, subtract) {
                (true, DecimalMode::Reject, _) => {
                    let record = FaultRecord {
                        code: FaultCode::DecimalModeUnsupported,
                        opcode: instr.opcode(),
                        pc: instr.pc,
                    };
                    return (ExecuteOutcome::Fault(record), exec);
                }
                (true, DecimalMode::Bcd, false) => adc_decimal(regs.a, value, status.carry()),
                (true, DecimalMode::Bcd, true) => sbc_decimal(regs.a, value, status.carry()),
                (false, _, false) => adc_binary(regs.a, value, status.carry()),
                (false, _, true) => sbc_binary(regs.a, value, status.carry()),
            };
            exec.regs.a = output.value;
            exec.flags_update = output.flags;
        }

        Operation::Cmp => exec.flags_update = compare(regs.a, operand_value(operand, state)),
        Operation::Cpx => exec.flags_update = compare(regs.x, operand_value(operand, state)),
        Operation::Cpy => exec.flags_update = compare(regs.y, operand_value(operand, state)),

        Operation::Inc => {
            let value = operand_value(operand, state).wrapping_add(1);
            exec.store(operand, value);
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Dec => {
            let value = operand_value(operand, state).wrapping_sub(1);
            exec.store(operand, value);
            exec.flags_update = FlagsUpdate::ZeroNegative(value);
        }
        Operation::Inx => {
            exec.regs.x = regs.x.wrapping_add(1);
            exec.flags_update = FlagsUpdate::ZeroNegative(exec.regs.x);
        }
        Operation::Iny => {
            exec.regs.y = regs.y.wrapping_add(1);
            exec.flags_update = FlagsUpdate::ZeroNegative(exec.regs.y);
        }
        Operation::Dex => {
            exec.regs.x = regs.x.wrapping_sub(1);
            exec.flags_update = FlagsUpdate::ZeroNegative(exec.regs.x);
        }
        Operation::Dey => {
            exec.regs.y = regs.y.wrapping_sub(1);
            exec.flags_update = FlagsUpdate::ZeroNegative(exec.regs.y);
        }

        Operation::Asl | Operation::Lsr | Operation::Rol | Operation::Ror => {
            let kind = match instr.operation() {
                Operation::Asl => Shift::Asl,
                Operation::Lsr => Shift::Lsr,
                Operation::Rol => Shift::Rol,
                _ => Shift::Ror,
            };
            let output = shift(kind, operand_value(operand, state), status.carry());
            exec.store(operand, output.value);
            exec.flags_update = output.flags;
        }

        Operation::Jmp => {
            if let Operand::Address(target) = operand {
                exec.regs.pc = target;
            }
        }
        Operation::Jsr => {
            exec.push_word(next_pc.wrapping_sub(1));
            if let Operand::Address(target) = operand {
                exec.regs.pc = target;
            }
        }
        Operation::Rts => exec.regs.pc = exec.pull_word(state).wrapping_add(1),
        Operation::Rti => {
            let pulled = exec.pull(state);
            exec.flags_update = FlagsUpdate::Replace(status.merge_pulled_byte(pulled));
            exec.regs.pc = exec.pull_word(state);
        }

        Operation::Bcc
        | Operation::Bcs
        | Operation::Beq
        | Operation::Bmi
        | Operation::Bne
        | Operation::Bpl
        | Operation::Bvc
        | Operation::Bvs => {
            if let Operand::Relative(offset) = operand {
                let taken = branch_taken(instr.operation(), regs);
                let target = next_pc.wrapping_add_signed(i16::from(offset));
                if taken {
                    exec.regs.pc = target;
                }
                branch_cycles = branch_penalty(taken, next_pc, target);
            }
        }

        Operation::Clc => exec.flags_update = single(FLAG_CARRY, false),
        Operation::Sec => exec.flags_update = single(FLAG_CARRY, true),
        Operation::Cli => exec.flags_update = single(FLAG_INTERRUPT_DISABLE, false),
        Operation::Sei => exec.flags_update = single(FLAG_INTERRUPT_DISABLE, true),
        Operation::Cld => exec.flags_update = single(FLAG_DECIMAL, false),
        Operation::Sed => exec.flags_update = single(FLAG_DECIMAL, true),
        Operation::Clv => exec.flags_update = single(FLAG_OVERFLOW, false),

        Operation::Brk => {
            exec.push_word(instr.pc.wrapping_add(2));
            exec.push(status.to_pushed_byte(true));
            let mut entered = status;
            entered.set(FLAG_INTERRUPT_DISABLE, true);
            entered.set(FLAG_BREAK, true);
            exec.flags_update = FlagsUpdate::Replace(entered);
            exec.regs.pc = state.memory.read_word(IRQ_VECTOR);
            is_break = true;
        }
        Operation::Nop => {}
        Operation::Unimplemented => {
            let record = FaultRecord {
                code: FaultCode::UnimplementedOpcode,
                opcode: instr.opcode(),
                pc: instr.pc,
            };
            return (ExecuteOutcome::Fault(record), exec);
        }
    }

    let penalty = page_cross_penalty(instr.descriptor, resolved.page_crossed);
    exec.cycles = instruction_cycles(instr.descriptor, penalty, branch_cycles);

    let outcome = if is_break {
        ExecuteOutcome::Break {
            cycles: exec.cycles,
        }
    } else {
        ExecuteOutcome::Retired {
            cycles: exec.cycles,
        }
    };
    (outcome, exec)
}

const fn single(flag: u8, enabled: bool) -> FlagsUpdate {
    FlagsUpdate::Single { flag, enabled }
}

/// Stages an interrupt entry: push PC and status (B clear), set I, clear the
/// live Break flag and load the handler vector.
#[must_use]
pub fn stage_interrupt(state: &CoreState, interrupt: Interrupt) -> ExecuteState {
    let regs = &state.regs;
    let vector = match interrupt {
        Interrupt::Irq => IRQ_VECTOR,
        Interrupt::Nmi => NMI_VECTOR,
    };

    let mut exec = ExecuteState::new(regs, state.memory.read_word(vector));
    exec.push_word(regs.pc);
    exec.push(regs.status.to_pushed_byte(false));

    let mut entered = regs.status;
    entered.set(FLAG_INTERRUPT_DISABLE, true);
    entered.set(FLAG_BREAK, false);
    exec.flags_update = FlagsUpdate::Replace(entered);
    exec.cycles = INTERRUPT_SERVICE_CYCLES;
    exec
}

/// Commits staged side effects: memory writes first, then registers, flags
/// and PC.
pub fn commit_execution(
    state: &mut CoreState,
    exec: &ExecuteState,
    trace: &mut Option<&mut (dyn TraceSink + '_)>,
) {
    for &(addr, value) in exec.pending_writes() {
        state.memory.write(addr, value);
        emit(trace, TraceEvent::MemoryWrite { addr, value });
    }

    let mut regs = exec.regs;
    regs.status = state.regs.status;
    exec.flags_update.apply(&mut regs.status);
    state.regs = regs;
}

fn emit(trace: &mut Option<&mut (dyn TraceSink + '_)>, event: TraceEvent) {
    if let Some(sink) = trace.as_deref_mut() {
        sink.on_event(event);
    }
}

fn raise_fault(
    state: &mut CoreState,
    record: FaultRecord,
    trace: &mut Option<&mut (dyn TraceSink + '_)>,
) {
    warn!("{record}");
    state.diagnostics.record_fault(record);
    emit(trace, TraceEvent::FaultRaised { record });
}

/// Runs one instruction boundary: a pending interrupt entry, or the
/// instruction at PC, provided its full cost fits in `remaining` cycles.
pub fn step_one(
    state: &mut CoreState,
    config: &CoreConfig,
    remaining: u64,
    mut trace: Option<&mut (dyn TraceSink + '_)>,
) -> StepOutcome {
    if let RunState::FaultLatched(record) = state.run_state {
        return StepOutcome::Fault { record, cycles: 0 };
    }

    if let Some(interrupt) = state
        .interrupts
        .next(state.regs.status.interrupt_disable())
    {
        if u64::from(INTERRUPT_SERVICE_CYCLES) > remaining {
            return StepOutcome::BudgetExhausted {
                required: INTERRUPT_SERVICE_CYCLES,
            };
        }
        let exec = stage_interrupt(state, interrupt);
        commit_execution(state, &exec, &mut trace);
        state.interrupts.acknowledge(interrupt);
        state.diagnostics.record_interrupt(exec.cycles);
        debug!("{interrupt:?} serviced, handler ${:04X}", state.regs.pc);
        emit(
            &mut trace,
            TraceEvent::InterruptServiced {
                interrupt,
                handler: state.regs.pc,
            },
        );
        return StepOutcome::InterruptServiced {
            interrupt,
            cycles: exec.cycles,
        };
    }

    let pc = state.regs.pc;
    let instr = match Decoder::decode(&state.memory, pc) {
        DecodedOrFault::Instruction(instr) => instr,
        DecodedOrFault::Fault(record) => {
            return dispatch_fault(state, config, remaining, record, &mut trace);
        }
    };

    let (outcome, exec) = execute_instruction(&instr, state, config);
    let cycles = match outcome {
        ExecuteOutcome::Retired { cycles } | ExecuteOutcome::Break { cycles } => cycles,
        ExecuteOutcome::Fault(record) => {
            return dispatch_fault(state, config, remaining, record, &mut trace);
        }
    };

    if u64::from(cycles) > remaining {
        return StepOutcome::BudgetExhausted { required: cycles };
    }

    let opcode = instr.opcode();
    emit(&mut trace, TraceEvent::InstructionStart { pc, opcode });
    commit_execution(state, &exec, &mut trace);
    state.diagnostics.record_retired(cycles);
    trace!(
        "${pc:04X} {} ${opcode:02X} cycles={cycles}",
        instr.descriptor.mnemonic
    );
    emit(
        &mut trace,
        TraceEvent::InstructionRetired { pc, opcode, cycles },
    );

    match outcome {
        ExecuteOutcome::Break { .. } => StepOutcome::Break { cycles },
        _ => StepOutcome::Retired { opcode, cycles },
    }
}

/// Applies the fault policy. Strict mode, and any code that always halts,
/// latches the fault without committing anything. Lenient mode steps over the
/// opcode byte as a 1-cycle no-op, which still needs budget to run.
fn dispatch_fault(
    state: &mut CoreState,
    config: &CoreConfig,
    remaining: u64,
    record: FaultRecord,
    trace: &mut Option<&mut (dyn TraceSink + '_)>,
) -> StepOutcome {
    if record.code.always_halts() || matches!(config.fault_policy, FaultPolicy::Strict) {
        state.run_state = RunState::FaultLatched(record);
        raise_fault(state, record, trace);
        return StepOutcome::Fault { record, cycles: 0 };
    }

    if u64::from(UNIMPLEMENTED_CYCLES) > remaining {
        return StepOutcome::BudgetExhausted {
            required: UNIMPLEMENTED_CYCLES,
        };
    }
    state.regs.pc = record.pc.wrapping_add(1);
    state.diagnostics.record_retired(UNIMPLEMENTED_CYCLES);
    raise_fault(state, record, trace);
    StepOutcome::Fault {
        record,
        cycles: UNIMPLEMENTED_CYCLES,
    }
}

/// Runs instructions until the budget cannot cover the next one, a halting
/// BRK retires, or a fault is raised.
///
/// Total consumed cycles never exceed `budget`.
pub fn execute(
    state: &mut CoreState,
    config: &CoreConfig,
    budget: u64,
    mut trace: Option<&mut (dyn TraceSink + '_)>,
) -> ExecuteReport {
    let mut report = ExecuteReport {
        cycles_consumed: 0,
        instructions: 0,
        fault: None,
        stop: StopReason::BudgetExhausted,
    };

    loop {
        let remaining = budget - report.cycles_consumed;
        let outcome = step_one(state, config, remaining, trace.as_deref_mut());
        report.cycles_consumed += u64::from(outcome.cycles());

        match outcome {
            StepOutcome::Retired { .. } => report.instructions += 1,
            StepOutcome::InterruptServiced { .. } => {}
            StepOutcome::Break { .. } => {
                report.instructions += 1;
                if config.halt_on_break {
                    report.stop = StopReason::Break;
                    break;
                }
            }
            StepOutcome::BudgetExhausted { .. } => {
                report.stop = StopReason::BudgetExhausted;
                break;
            }
            StepOutcome::Fault { record, cycles } => {
                if cycles > 0 {
                    report.instructions += 1;
                }
                report.fault = Some(record);
                report.stop = StopReason::Fault;
                break;
            }
        }
    }

    debug!(
        "run stopped ({:?}): {} cycles, {} instructions, pc=${:04X}",
        report.stop, report.cycles_consumed, report.instructions, state.regs.pc
    );
    report
}

#[cfg(test)]
mod tests {
    use super::{execute, execute_instruction, stage_interrupt, step_one, ExecuteOutcome};
    use crate::decoder::Decoder;
    use crate::{
        CoreConfig, CoreState, DecimalMode, FaultCode, FaultPolicy, Interrupt, RunState,
        StatusFlags, StepOutcome, StopReason, TraceEvent, TraceSink, FLAG_BREAK, FLAG_DECIMAL,
        FLAG_INTERRUPT_DISABLE,
    };

    const ORIGIN: u16 = 0x0600;

    fn core_with(config: &CoreConfig, program: &[u8]) -> CoreState {
        let mut state = CoreState::with_config(config).expect("valid config");
        state.memory.load(ORIGIN, program);
        state.regs.pc = ORIGIN;
        state
    }

    fn core(program: &[u8]) -> CoreState {
        core_with(&CoreConfig::default(), program)
    }

    #[test]
    fn staging_does_not_touch_state() {
        let state = core(&[0x8D, 0x00, 0x02]); // STA $0200
        let before = state.clone();
        let instr = Decoder::decode(&state.memory, ORIGIN)
            .instruction()
            .expect("official opcode");

        let (outcome, exec) = execute_instruction(&instr, &state, &CoreConfig::default());

        assert_eq!(outcome, ExecuteOutcome::Retired { cycles: 4 });
        assert_eq!(exec.pending_writes(), &[(0x0200, 0x00)]);
        assert_eq!(state, before);
    }

    #[test]
    fn step_retires_and_commits() {
        let mut state = core(&[0xA9, 0x42]);
        let outcome = step_one(&mut state, &CoreConfig::default(), 10, None);

        assert_eq!(
            outcome,
            StepOutcome::Retired {
                opcode: 0xA9,
                cycles: 2
            }
        );
        assert_eq!(state.regs.a, 0x42);
        assert_eq!(state.regs.pc, ORIGIN + 2);
        assert_eq!(state.diagnostics.instructions_retired, 1);
    }

    #[test]
    fn step_refuses_instruction_that_does_not_fit() {
        let mut state = core(&[0xAD, 0x00, 0x02]); // LDA abs, 4 cycles
        let before = state.clone();

        let outcome = step_one(&mut state, &CoreConfig::default(), 3, None);

        assert_eq!(outcome, StepOutcome::BudgetExhausted { required: 4 });
        assert_eq!(state, before);
    }

    #[test]
    fn strict_fault_latches_without_side_effects() {
        let mut state = core(&[0x02]);
        let report = execute(&mut state, &CoreConfig::default(), 100, None);

        assert_eq!(report.cycles_consumed, 0);
        assert_eq!(report.stop, StopReason::Fault);
        assert_eq!(state.regs.pc, ORIGIN);
        assert!(matches!(state.run_state, RunState::FaultLatched(_)));

        let again = execute(&mut state, &CoreConfig::default(), 100, None);
        assert_eq!(again.fault, report.fault);
        assert_eq!(state.diagnostics.unimplemented_opcode_faults, 1);
    }

    #[test]
    fn lenient_fault_skips_one_byte() {
        let config = CoreConfig {
            fault_policy: FaultPolicy::Lenient,
            ..CoreConfig::default()
        };
        let mut state = core_with(&config, &[0x02, 0xA9, 0x01]);

        let report = execute(&mut state, &config, 100, None);
        assert_eq!(report.cycles_consumed, 1);
        assert_eq!(state.regs.pc, ORIGIN + 1);
        assert_eq!(state.run_state, RunState::Running);

        let resumed = execute(&mut state, &config, 2, None);
        assert_eq!(resumed.fault, None);
        assert_eq!(state.regs.a, 0x01);
    }

    #[test]
    fn rejected_decimal_mode_always_latches() {
        let config = CoreConfig {
            fault_policy: FaultPolicy::Lenient,
            decimal_mode: DecimalMode::Reject,
            ..CoreConfig::default()
        };
        let mut state = core_with(&config, &[0x69, 0x01]);
        state.regs.status = StatusFlags::from_bits(FLAG_DECIMAL);

        let report = execute(&mut state, &config, 100, None);

        let fault = report.fault.expect("decimal ADC rejected");
        assert_eq!(fault.code, FaultCode::DecimalModeUnsupported);
        assert_eq!(report.cycles_consumed, 0);
        assert_eq!(state.regs.a, 0);
        assert_eq!(state.regs.pc, ORIGIN);
        assert_eq!(state.diagnostics.instructions_retired, 0);
        assert!(matches!(state.run_state, RunState::FaultLatched(_)));
    }

    #[test]
    fn brk_pushes_return_state_and_halts() {
        let mut state = core(&[0x00]);
        state.memory.load(0xFFFE, &[0x00, 0x90]);
        state.regs.status = StatusFlags::from_bits(0x01);

        let report = execute(&mut state, &CoreConfig::default(), 100, None);

        assert_eq!(report.stop, StopReason::Break);
        assert_eq!(report.cycles_consumed, 7);
        assert_eq!(state.regs.pc, 0x9000);
        assert_eq!(state.regs.sp, 0xFC);
        assert_eq!(state.memory.read(0x01FF), 0x06);
        assert_eq!(state.memory.read(0x01FE), 0x02);
        assert_eq!(state.memory.read(0x01FD), 0x31);
        assert!(state.regs.status.contains(FLAG_INTERRUPT_DISABLE | FLAG_BREAK));
    }

    #[test]
    fn irq_entry_clears_break_and_respects_mask() {
        let mut state = core(&[0xEA]);
        state.memory.load(0xFFFE, &[0x00, 0x80]);
        state.regs.status = StatusFlags::from_bits(FLAG_BREAK);
        state.interrupts.request(Interrupt::Irq);

        let exec = stage_interrupt(&state, Interrupt::Irq);
        assert_eq!(exec.pending_writes()[2], (0x01FD, 0x20));

        let outcome = step_one(&mut state, &CoreConfig::default(), 7, None);
        assert_eq!(
            outcome,
            StepOutcome::InterruptServiced {
                interrupt: Interrupt::Irq,
                cycles: 7
            }
        );
        assert_eq!(state.regs.pc, 0x8000);
        assert!(state.regs.status.interrupt_disable());
        assert!(!state.regs.status.break_flag());

        state.interrupts.request(Interrupt::Irq);
        state.memory.write(0x8000, 0xEA);
        let masked = step_one(&mut state, &CoreConfig::default(), 7, None);
        assert_eq!(
            masked,
            StepOutcome::Retired {
                opcode: 0xEA,
                cycles: 2
            }
        );
    }

    #[test]
    fn trace_sink_sees_events_in_commit_order() {
        let mut state = core(&[0x85, 0x10]); // STA $10
        state.regs.a = 0x77;
        let mut events: Vec<TraceEvent> = Vec::new();
        let sink: &mut dyn TraceSink = &mut events;

        let _ = step_one(&mut state, &CoreConfig::default(), 3, Some(sink));

        assert_eq!(
            events,
            vec![
                TraceEvent::InstructionStart {
                    pc: ORIGIN,
                    opcode: 0x85
                },
                TraceEvent::MemoryWrite {
                    addr: 0x0010,
                    value: 0x77
                },
                TraceEvent::InstructionRetired {
                    pc: ORIGIN,
                    opcode: 0x85,
                    cycles: 3
                },
            ]
        );
    }
}
