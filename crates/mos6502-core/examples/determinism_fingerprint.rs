//! Deterministic execution fingerprint used for cross-host comparison.
//!
//! Runs a fixed program with an interrupt injected mid-run and prints an
//! FNV-1a hash of the final registers, counters and memory.

use log as _;
use mos6502_core::{CoreConfig, Cpu, Interrupt, ResetVector, StopReason};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const ORIGIN: u16 = 0x0600;
const HANDLER: u16 = 0x0700;

const PROGRAM: &[u8] = &[
    0xA2, 0x20, // LDX #$20
    0x8A, // loop: TXA
    0x65, 0x10, // ADC $10
    0x85, 0x10, // STA $10
    0x9D, 0x00, 0x02, // STA $0200,X
    0xCA, // DEX
    0xD0, 0xF5, // BNE loop
    0xF8, // SED
    0x69, 0x45, // ADC #$45
    0xD8, // CLD
    0x00, // BRK
];

const IRQ_HANDLER: &[u8] = &[
    0xE6, 0x11, // INC $11
    0x40, // RTI
];

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint() -> String {
    let config = CoreConfig {
        reset_vector: ResetVector::Fixed(ORIGIN),
        ..CoreConfig::default()
    };
    let Ok(mut cpu) = Cpu::new(config) else {
        return String::from("invalid configuration");
    };
    cpu.memory_mut().load(ORIGIN, PROGRAM);
    cpu.memory_mut().load(HANDLER, IRQ_HANDLER);
    cpu.memory_mut().load(0xFFFE, &HANDLER.to_le_bytes());

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;

    let first = cpu.execute(100);
    hash_bytes(&mut hash, &first.cycles_consumed.to_le_bytes());

    cpu.request_interrupt(Interrupt::Irq);
    let second = cpu.execute(10_000);
    hash_bytes(&mut hash, &second.cycles_consumed.to_le_bytes());
    hash_bytes(&mut hash, &second.instructions.to_le_bytes());
    hash_bytes(
        &mut hash,
        &[match second.stop {
            StopReason::BudgetExhausted => 0x10,
            StopReason::Break => 0x11,
            StopReason::Fault => 0x12,
        }],
    );

    let regs = cpu.registers();
    hash_bytes(&mut hash, &[regs.a, regs.x, regs.y, regs.sp, regs.status.bits()]);
    hash_bytes(&mut hash, &regs.pc.to_le_bytes());

    let diagnostics = cpu.diagnostics();
    hash_bytes(&mut hash, &diagnostics.instructions_retired.to_le_bytes());
    hash_bytes(&mut hash, &diagnostics.cycles_consumed.to_le_bytes());
    hash_bytes(&mut hash, &diagnostics.interrupts_serviced.to_le_bytes());

    hash_bytes(&mut hash, cpu.memory().as_slice());

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
