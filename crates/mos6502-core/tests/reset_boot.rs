//! Reset and boot semantics integration coverage.

use log as _;
use mos6502_core::{
    ConfigError, CoreConfig, CoreState, Cpu, FaultCode, FaultRecord, Interrupt, ResetVector,
    RunState, StatusFlags, ADDRESS_SPACE_BYTES, RESET_STACK_POINTER,
};
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[test]
fn reset_loads_fixed_vector_and_clears_registers() {
    let mut cpu = Cpu::new(CoreConfig::default()).expect("default config is valid");
    {
        let regs = cpu.registers_mut();
        regs.a = 0x12;
        regs.x = 0x34;
        regs.y = 0x56;
        regs.sp = 0x10;
        regs.pc = 0xBEEF;
        regs.status = StatusFlags::from_bits(0xFF);
    }

    cpu.reset();

    let regs = cpu.registers();
    assert_eq!(regs.pc, 0xFFFC);
    assert_eq!((regs.a, regs.x, regs.y), (0, 0, 0));
    assert_eq!(regs.sp, RESET_STACK_POINTER);
    assert_eq!(regs.status.bits(), 0);
    assert_eq!(cpu.run_state(), RunState::Running);
}

#[test]
fn reset_clears_latched_fault_and_pending_interrupts() {
    let mut state = CoreState::with_config(&CoreConfig::default()).expect("valid");
    state.run_state = RunState::FaultLatched(FaultRecord {
        code: FaultCode::UnimplementedOpcode,
        opcode: 0xFF,
        pc: 0xFFFC,
    });
    state.interrupts.request(Interrupt::Nmi);
    state.diagnostics.record_retired(4);

    state.reset(&CoreConfig::default());

    assert_eq!(state.run_state, RunState::Running);
    assert_eq!(state.interrupts.next(false), None);
    assert_eq!(state.diagnostics.instructions_retired, 0);
}

#[test]
fn full_reset_zero_fills_memory() {
    let mut cpu = Cpu::new(CoreConfig::default()).expect("valid");
    cpu.memory_mut().load(0x0200, &[0xAA, 0xBB]);

    cpu.reset();

    assert!(cpu.memory().as_slice().iter().all(|&byte| byte == 0));
    assert_eq!(cpu.memory().len(), ADDRESS_SPACE_BYTES);
}

#[test]
fn register_reset_boots_through_vector_in_memory() {
    let config = CoreConfig {
        reset_vector: ResetVector::FromMemory,
        ..CoreConfig::default()
    };
    let mut cpu = Cpu::new(config).expect("valid");
    cpu.memory_mut().load(0xFFFC, &[0x00, 0x80]);
    cpu.memory_mut().load(0x8000, &[0xA9, 0x5A]);

    cpu.reset_registers();
    let report = cpu.execute(2);

    assert_eq!(report.cycles_consumed, 2);
    assert_eq!(cpu.registers().a, 0x5A);
    assert_eq!(cpu.registers().pc, 0x8002);
    assert_eq!(cpu.memory().read(0x8000), 0xA9);
}

#[rstest]
#[case(ResetVector::Fixed(0x0400), 0x0400)]
#[case(ResetVector::Fixed(0xFFFC), 0xFFFC)]
#[case(ResetVector::FromMemory, 0x0000)]
fn reset_vector_choice_sets_entry_pc(#[case] vector: ResetVector, #[case] expected: u16) {
    let config = CoreConfig {
        reset_vector: vector,
        ..CoreConfig::default()
    };
    let cpu = Cpu::new(config).expect("valid");
    assert_eq!(cpu.registers().pc, expected);
}

#[rstest]
#[case(0, Err(ConfigError::EmptyMemory))]
#[case(ADDRESS_SPACE_BYTES + 1, Err(ConfigError::MemoryTooLarge { len: ADDRESS_SPACE_BYTES + 1 }))]
#[case(1, Ok(()))]
#[case(0x1000, Ok(()))]
fn memory_size_is_validated(#[case] memory_size: usize, #[case] expected: Result<(), ConfigError>) {
    let config = CoreConfig {
        memory_size,
        ..CoreConfig::default()
    };
    assert_eq!(config.validate(), expected);
    assert_eq!(Cpu::new(config).map(|_| ()), expected);
}

#[test]
fn small_memory_image_wraps_every_address() {
    let config = CoreConfig {
        memory_size: 0x1000,
        reset_vector: ResetVector::Fixed(0x0000),
        ..CoreConfig::default()
    };
    let mut cpu = Cpu::new(config).expect("valid");
    // STA $1234 lands on $0234 in a 4 KiB image.
    cpu.memory_mut().load(0x0000, &[0xA9, 0x99, 0x8D, 0x34, 0x12]);

    let report = cpu.execute(6);

    assert_eq!(report.cycles_consumed, 6);
    assert_eq!(cpu.memory().read(0x0234), 0x99);
    assert_eq!(cpu.memory().read(0x1234), 0x99);
}
