// Copyright (c) 2024 Mudit Bhargava
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

// trace_generator.rs
//
// This file contains the random trace generator. It tracks a model
// register file alongside the generated instructions so LOAD/STORE
// offsets keep effective addresses inside memory, never loads into R0,
// and never divides by R0.

use crate::errors::SimulatorError;
use crate::simulator::config::SimulatorConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

// Offsets are kept small for variety, then clamped to the valid range for
// the base value.
const MIN_OFFSET: i64 = -32;
const MAX_OFFSET: i64 = 32;

fn valid_offset<R: Rng>(rng: &mut R, base_value: i64, memory_size: usize) -> i64 {
    let mut min_offset = (-base_value).max(MIN_OFFSET);
    let mut max_offset = (memory_size as i64 - 1 - base_value).min(MAX_OFFSET);
    if min_offset > max_offset {
        min_offset = 0;
        max_offset = 0;
    }
    rng.gen_range(min_offset..=max_offset)
}

fn floor_div(lhs: i64, rhs: i64) -> i64 {
    let quotient = lhs / rhs;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        quotient - 1
    } else {
        quotient
    }
}

/// Generate `num_instructions` trace lines. A fixed seed reproduces the
/// same trace; `None` draws one from the OS.
pub fn generate(num_instructions: usize, seed: Option<u64>) -> String {
    let defaults = SimulatorConfig::default();
    let num_registers = defaults.num_registers;
    let memory_size = defaults.memory_size;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Model register file: R0 = 0, the rest random, updated as the trace
    // would update them so memory operands stay in range.
    let mut reg_values: Vec<i64> = vec![0];
    for _ in 1..num_registers {
        reg_values.push(rng.gen_range(1..=100));
    }

    let mut lines = Vec::with_capacity(num_instructions);

    for _ in 0..num_instructions {
        let kind = rng.gen_range(0..6);
        let line = match kind {
            0 | 1 | 2 => {
                // ADD / SUB / MUL
                let mnemonic = ["ADD", "SUB", "MUL"][kind];
                let dest = rng.gen_range(1..num_registers);
                let src1 = rng.gen_range(0..num_registers);
                let src2 = rng.gen_range(0..num_registers);
                reg_values[dest] = match kind {
                    0 => reg_values[src1].wrapping_add(reg_values[src2]),
                    1 => reg_values[src1].wrapping_sub(reg_values[src2]),
                    _ => reg_values[src1].wrapping_mul(reg_values[src2]),
                };
                format!("{} R{}, R{}, R{}", mnemonic, dest, src1, src2)
            },
            3 => {
                // DIV, never by R0
                let dest = rng.gen_range(1..num_registers);
                let src1 = rng.gen_range(0..num_registers);
                let src2 = rng.gen_range(1..num_registers);
                reg_values[dest] = if reg_values[src2] != 0 {
                    floor_div(reg_values[src1], reg_values[src2])
                } else {
                    0
                };
                format!("DIV R{}, R{}, R{}", dest, src1, src2)
            },
            4 => {
                // LOAD, never into R0
                let dest = rng.gen_range(1..num_registers);
                let base = rng.gen_range(0..num_registers);
                let offset = valid_offset(&mut rng, reg_values[base], memory_size);
                reg_values[dest] = rng.gen_range(1..=100);
                format!("LOAD R{}, {}(R{})", dest, offset, base)
            },
            _ => {
                let src = rng.gen_range(1..num_registers);
                let base = rng.gen_range(0..num_registers);
                let offset = valid_offset(&mut rng, reg_values[base], memory_size);
                format!("STORE {}(R{}), R{}", offset, base, src)
            },
        };
        lines.push(line);
    }

    let mut trace = lines.join("\n");
    trace.push('\n');
    trace
}

/// Generate a trace and write it to `path`.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    num_instructions: usize,
    seed: Option<u64>,
) -> Result<(), SimulatorError> {
    fs::write(path, generate(num_instructions, seed))?;
    Ok(())
}
