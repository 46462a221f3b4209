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

// parser.rs
//
// This file contains the instruction trace parser. Trace files are
// line-oriented: blank lines and `#` comments are skipped, and each
// remaining line is one instruction in one of three forms:
//
//   OP Rd, Rs1, Rs2        for OP in ADD, SUB, MUL, DIV
//   LOAD Rd, OFFSET(Rb)
//   STORE OFFSET(Rb), Rs
//
// Whitespace inside the operand list is insignificant and register names
// are case-insensitive; they are normalised to upper-case R<digit> here.
// A malformed line is logged with its number and skipped; register
// validity beyond the name shape is enforced later by the register file.

use crate::components::instruction::{Instruction, Opcode};
use crate::errors::SimulatorError;
use log::error;
use std::fs;
use std::path::Path;

fn parse_offset(text: &str) -> Result<i64, SimulatorError> {
    text.parse()
        .map_err(|_| SimulatorError::ParseError(format!("invalid offset: {}", text)))
}

// Split "OFFSET(Rb)" into the signed offset and the base register name.
fn parse_memory_ref(text: &str) -> Result<(i64, String), SimulatorError> {
    let (offset_text, rest) = text.split_once('(').ok_or_else(|| {
        SimulatorError::ParseError(format!("invalid memory reference: {}", text))
    })?;
    let base = rest.strip_suffix(')').ok_or_else(|| {
        SimulatorError::ParseError(format!("invalid memory reference: {}", text))
    })?;

    if base.is_empty() {
        return Err(SimulatorError::ParseError(format!(
            "invalid memory reference: {}",
            text
        )));
    }

    Ok((parse_offset(offset_text)?, base.to_uppercase()))
}

/// Parse one instruction line. The line must not be blank or a comment.
pub fn parse_line(line: &str) -> Result<Instruction, SimulatorError> {
    let trimmed = line.trim();
    let (mnemonic, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((mnemonic, rest)) => (mnemonic, rest),
        None => (trimmed, ""),
    };

    let op = Opcode::from_mnemonic(&mnemonic.to_uppercase()).ok_or_else(|| {
        SimulatorError::ParseError(format!("unknown operation: {}", mnemonic))
    })?;

    // The operand list is whitespace-insensitive: strip it all, then split
    // on commas.
    let compact: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    let operands: Vec<&str> = compact.split(',').filter(|s| !s.is_empty()).collect();

    match op {
        Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
            if operands.len() != 3 {
                return Err(SimulatorError::ParseError(format!(
                    "{} expects 3 operands, got {}",
                    op,
                    operands.len()
                )));
            }
            Ok(Instruction::arithmetic(
                op,
                &operands[0].to_uppercase(),
                &operands[1].to_uppercase(),
                &operands[2].to_uppercase(),
            ))
        },
        Opcode::Load => {
            if operands.len() != 2 {
                return Err(SimulatorError::ParseError(format!(
                    "LOAD expects 2 operands, got {}",
                    operands.len()
                )));
            }
            let (offset, base) = parse_memory_ref(operands[1])?;
            Ok(Instruction::load(&operands[0].to_uppercase(), offset, &base))
        },
        Opcode::Store => {
            if operands.len() != 2 {
                return Err(SimulatorError::ParseError(format!(
                    "STORE expects 2 operands, got {}",
                    operands.len()
                )));
            }
            let (offset, base) = parse_memory_ref(operands[0])?;
            Ok(Instruction::store(offset, &base, &operands[1].to_uppercase()))
        },
    }
}

/// Parse a whole trace. Blank lines and `#` comments are skipped; a line
/// that fails to parse is logged with its number and dropped, and the
/// remaining lines still load.
pub fn parse_str(source: &str) -> Vec<Instruction> {
    let mut instructions = Vec::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Ok(instruction) => instructions.push(instruction),
            Err(err) => {
                error!("Error parsing line {}: {} (line: {})", index + 1, err, line);
            },
        }
    }

    instructions
}

/// Parse a trace file. I/O failures are hard errors; per-line parse
/// failures are soft and only shrink the returned program.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Instruction>, SimulatorError> {
    let source = fs::read_to_string(path)?;
    Ok(parse_str(&source))
}
