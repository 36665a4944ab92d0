//! Property coverage for flag derivation, address wrapping, budget bounds,
//! fault isolation and determinism.

use log as _;
use mos6502_core::{
    instruction, CoreConfig, Cpu, FaultCode, FaultPolicy, ResetVector, RunState, StatusFlags,
    FLAG_NEGATIVE, FLAG_UNUSED, FLAG_ZERO,
};
use proptest::prelude::*;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const ORIGIN: u16 = 0x0600;

fn boot(config: CoreConfig, program: &[u8]) -> Cpu {
    let mut cpu = Cpu::new(CoreConfig {
        reset_vector: ResetVector::Fixed(ORIGIN),
        ..config
    })
    .expect("valid config");
    cpu.memory_mut().load(ORIGIN, program);
    cpu
}

fn unimplemented_opcode() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("unimplemented opcode", |opcode| {
        !instruction(*opcode).is_implemented()
    })
}

proptest! {
    #[test]
    fn property_load_derives_zero_and_negative(
        value in any::<u8>(),
        initial in any::<u8>(),
        opcode in prop::sample::select(vec![0xA9u8, 0xA2, 0xA0]),
    ) {
        let mut cpu = boot(CoreConfig::default(), &[opcode, value]);
        cpu.registers_mut().status = StatusFlags::from_bits(initial);
        let before = cpu.registers().status.bits();

        let report = cpu.execute(2);

        prop_assert_eq!(report.cycles_consumed, 2);
        let status = cpu.registers().status;
        prop_assert_eq!(status.zero(), value == 0);
        prop_assert_eq!(status.negative(), value & 0x80 != 0);
        let untouched = !(FLAG_ZERO | FLAG_NEGATIVE);
        prop_assert_eq!(status.bits() & untouched, before & untouched);
    }

    #[test]
    fn property_zero_page_indexing_wraps(base in any::<u8>(), x in any::<u8>()) {
        let mut cpu = boot(CoreConfig::default(), &[0xB5, base]); // LDA zp,X
        let wrapped = u16::from(base.wrapping_add(x));
        let linear = u16::from(base) + u16::from(x);
        cpu.memory_mut().write(linear, 0xC3);
        cpu.memory_mut().write(wrapped, 0x5A);
        cpu.registers_mut().x = x;

        let _ = cpu.step();

        prop_assert_eq!(cpu.registers().a, 0x5A);
    }

    #[test]
    fn property_budget_is_never_exceeded(
        program in prop::collection::vec(any::<u8>(), 0..64),
        budget in 0u64..500,
        lenient in any::<bool>(),
    ) {
        let config = CoreConfig {
            fault_policy: if lenient { FaultPolicy::Lenient } else { FaultPolicy::Strict },
            ..CoreConfig::default()
        };
        let mut cpu = boot(config, &program);

        let report = cpu.execute(budget);

        prop_assert!(report.cycles_consumed <= budget);
        prop_assert_eq!(cpu.diagnostics().cycles_consumed, report.cycles_consumed);
        prop_assert_eq!(cpu.registers().status.bits() & FLAG_UNUSED, 0);
    }

    #[test]
    fn property_strict_fault_leaves_state_untouched(
        opcode in unimplemented_opcode(),
        a in any::<u8>(),
        x in any::<u8>(),
        y in any::<u8>(),
        sp in any::<u8>(),
        budget in 1u64..1_000,
    ) {
        let mut cpu = boot(CoreConfig::default(), &[opcode, 0x11, 0x22]);
        {
            let regs = cpu.registers_mut();
            regs.a = a;
            regs.x = x;
            regs.y = y;
            regs.sp = sp;
        }
        let before = cpu.state().clone();

        let report = cpu.execute(budget);

        prop_assert_eq!(report.cycles_consumed, 0);
        let fault = report.fault.expect("unimplemented opcode faults");
        prop_assert_eq!(fault.code, FaultCode::UnimplementedOpcode);
        prop_assert_eq!(fault.opcode, opcode);
        prop_assert_eq!(cpu.registers(), &before.regs);
        prop_assert_eq!(cpu.memory(), &before.memory);
        prop_assert_eq!(cpu.run_state(), RunState::FaultLatched(fault));
    }

    #[test]
    fn property_execution_is_deterministic(
        program in prop::collection::vec(any::<u8>(), 1..64),
        budget in 0u64..300,
    ) {
        let config = CoreConfig {
            fault_policy: FaultPolicy::Lenient,
            halt_on_break: false,
            ..CoreConfig::default()
        };
        let mut first = boot(config.clone(), &program);
        let mut second = boot(config, &program);

        let first_report = first.execute(budget);
        let second_report = second.execute(budget);

        prop_assert_eq!(first_report, second_report);
        prop_assert_eq!(first.state(), second.state());
    }
}
