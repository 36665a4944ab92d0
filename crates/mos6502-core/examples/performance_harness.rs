//! Throughput harness for mos6502-core.
//!
//! Runs one independent core per thread over small loop programs, slicing
//! execution into fixed cycle budgets the way a host frame loop would.
//!
//! ## Usage
//!
//! ```sh
//! cargo run -p mos6502-core --release --example performance_harness
//! ```

#![allow(clippy::pedantic)]

use log as _;
use mos6502_core::{CoreConfig, Cpu, ResetVector};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Cycles granted per `execute` call (one NTSC frame at 1.79 MHz).
const FRAME_BUDGET_CYCLES: u64 = 29_780;
const NUM_THREADS: usize = 4;
const ORIGIN: u16 = 0x0600;

#[derive(Debug, Clone, Copy)]
struct BenchmarkResult {
    name: &'static str,
    instructions_per_second: f64,
    cycles_per_second: f64,
    realtime_cores: f64,
}

// Each program loops back to ORIGIN forever.
const NOP_LOOP: &[u8] = &[0xEA, 0xEA, 0xEA, 0x4C, 0x00, 0x06];
const ALU_LOOP: &[u8] = &[
    0x18, // CLC
    0x69, 0x03, // ADC #$03
    0x49, 0x5A, // EOR #$5A
    0x2A, // ROL A
    0xC9, 0x10, // CMP #$10
    0x4C, 0x00, 0x06, // JMP $0600
];
const MEMORY_LOOP: &[u8] = &[
    0xE8, // INX
    0x9D, 0x00, 0x20, // STA $2000,X
    0xBD, 0xF0, 0x20, // LDA $20F0,X
    0x48, // PHA
    0x68, // PLA
    0x20, 0x10, 0x06, // JSR $0610
    0x4C, 0x00, 0x06, // JMP $0600
    0xEA, //
    0x60, // $0610: RTS
];
const DECIMAL_LOOP: &[u8] = &[
    0xF8, // SED
    0x69, 0x19, // ADC #$19
    0xE9, 0x07, // SBC #$07
    0xD8, // CLD
    0x4C, 0x00, 0x06, // JMP $0600
];

fn benchmark(name: &'static str, program: &'static [u8], duration: Duration) -> BenchmarkResult {
    let (tx, rx) = mpsc::channel();

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|_| {
            let tx = tx.clone();
            thread::spawn(move || {
                let config = CoreConfig {
                    reset_vector: ResetVector::Fixed(ORIGIN),
                    ..CoreConfig::default()
                };
                let Ok(mut cpu) = Cpu::new(config) else {
                    return;
                };
                cpu.memory_mut().load(ORIGIN, program);

                let mut total_instructions = 0u64;
                let mut total_cycles = 0u64;
                let start = Instant::now();

                while start.elapsed() < duration {
                    let report = cpu.execute(FRAME_BUDGET_CYCLES);
                    total_instructions += report.instructions;
                    total_cycles += report.cycles_consumed;
                    if report.fault.is_some() {
                        break;
                    }
                }

                tx.send((total_instructions, total_cycles)).ok();
            })
        })
        .collect();

    for h in handles {
        h.join().ok();
    }

    drop(tx);

    let mut total_instructions = 0u64;
    let mut total_cycles = 0u64;
    for (inst, cyc) in rx {
        total_instructions += inst;
        total_cycles += cyc;
    }

    let elapsed_secs = duration.as_secs_f64();
    let cycles_per_second = total_cycles as f64 / elapsed_secs;

    BenchmarkResult {
        name,
        instructions_per_second: total_instructions as f64 / elapsed_secs,
        cycles_per_second,
        realtime_cores: cycles_per_second / (FRAME_BUDGET_CYCLES as f64 * 60.0),
    }
}

fn format_number(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.2}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.2}K", n / 1_000.0)
    } else {
        format!("{:.2}", n)
    }
}

fn print_results(results: &[BenchmarkResult]) {
    println!();
    println!("mos6502-core throughput ({NUM_THREADS} threads, {FRAME_BUDGET_CYCLES} cycles/frame)");
    println!(
        "{:12} | {:>12} | {:>12} | {:>12}",
        "Benchmark", "Instr/sec", "Cycles/sec", "Cores@60Hz"
    );
    println!("{}", "-".repeat(57));
    for result in results {
        println!(
            "{:12} | {:>12} | {:>12} | {:>12.1}",
            result.name,
            format_number(result.instructions_per_second),
            format_number(result.cycles_per_second),
            result.realtime_cores
        );
    }
}

fn main() {
    let duration = Duration::from_secs(2);

    let results = [
        benchmark("nop_loop", NOP_LOOP, duration),
        benchmark("alu_loop", ALU_LOOP, duration),
        benchmark("memory_loop", MEMORY_LOOP, duration),
        benchmark("decimal_loop", DECIMAL_LOOP, duration),
    ];

    print_results(&results);
}
