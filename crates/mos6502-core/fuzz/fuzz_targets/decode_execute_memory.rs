#![no_main]

use libfuzzer_sys::fuzz_target;
use mos6502_core::{
    resolve_operand, CoreConfig, CoreState, DecimalMode, DecodedOrFault, Decoder, FaultPolicy,
    Interrupt, ResetVector,
};

const ORIGIN: u16 = 0x0200;

fuzz_target!(|data: &[u8]| {
    let Some((&control, program)) = data.split_first() else {
        return;
    };

    let config = CoreConfig {
        fault_policy: if control & 0x01 == 0 {
            FaultPolicy::Strict
        } else {
            FaultPolicy::Lenient
        },
        decimal_mode: if control & 0x02 == 0 {
            DecimalMode::Bcd
        } else {
            DecimalMode::Reject
        },
        reset_vector: ResetVector::Fixed(ORIGIN),
        indirect_jump_page_wrap: control & 0x04 == 0,
        halt_on_break: control & 0x08 == 0,
        ..CoreConfig::default()
    };
    let Ok(mut state) = CoreState::with_config(&config) else {
        return;
    };
    state.memory.load(ORIGIN, program);

    if let DecodedOrFault::Instruction(instr) = Decoder::decode(&state.memory, ORIGIN) {
        let _ = resolve_operand(&instr, &state.regs, &state.memory, true);
    }

    if control & 0x10 != 0 {
        state.interrupts.request(Interrupt::Irq);
    }
    if control & 0x20 != 0 {
        state.interrupts.request(Interrupt::Nmi);
    }

    let budget = u64::from(control) * 16;
    let report = mos6502_core::execute(&mut state, &config, budget, None);
    assert!(report.cycles_consumed <= budget);
});
