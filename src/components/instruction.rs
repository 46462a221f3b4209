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

// instruction.rs
//
// This file contains the instruction model for the Tomasulo simulator.
// It defines the Opcode enum for the six supported operations and the
// Instruction struct, which carries the operand fields and the per-stage
// timestamp fields filled in as the instruction moves through the pipeline.

use std::fmt;

/// Operations supported by the simulated ISA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
    Load,
    Store,
}

impl Opcode {
    /// Parse an upper-case mnemonic as produced by the trace parser.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "ADD" => Some(Opcode::Add),
            "SUB" => Some(Opcode::Sub),
            "MUL" => Some(Opcode::Mul),
            "DIV" => Some(Opcode::Div),
            "LOAD" => Some(Opcode::Load),
            "STORE" => Some(Opcode::Store),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }

    pub fn is_memory_op(&self) -> bool {
        matches!(self, Opcode::Load | Opcode::Store)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// A single instruction from the trace.
///
/// The operand fields are fixed at parse time. The four cycle fields are
/// each written exactly once by the pipeline stage that retires them:
/// issue, execute start, and (coalesced) execute complete / write result.
#[derive(Debug, Clone)]
pub struct Instruction {
    pub op: Opcode,
    pub dest: Option<String>,
    pub src1: Option<String>,
    pub src2: Option<String>,
    pub offset: Option<i64>,
    pub base: Option<String>,

    // Execution tracking
    pub issue_cycle: Option<usize>,
    pub start_cycle: Option<usize>,
    pub execute_complete_cycle: Option<usize>,
    pub write_result_cycle: Option<usize>,
}

impl Instruction {
    fn new(op: Opcode) -> Self {
        Self {
            op,
            dest: None,
            src1: None,
            src2: None,
            offset: None,
            base: None,
            issue_cycle: None,
            start_cycle: None,
            execute_complete_cycle: None,
            write_result_cycle: None,
        }
    }

    /// Build an ADD/SUB/MUL/DIV instruction.
    pub fn arithmetic(op: Opcode, dest: &str, src1: &str, src2: &str) -> Self {
        let mut instruction = Self::new(op);
        instruction.dest = Some(dest.to_string());
        instruction.src1 = Some(src1.to_string());
        instruction.src2 = Some(src2.to_string());
        instruction
    }

    /// Build a LOAD instruction: `LOAD dest, offset(base)`.
    pub fn load(dest: &str, offset: i64, base: &str) -> Self {
        let mut instruction = Self::new(Opcode::Load);
        instruction.dest = Some(dest.to_string());
        instruction.offset = Some(offset);
        instruction.base = Some(base.to_string());
        instruction
    }

    /// Build a STORE instruction: `STORE offset(base), src`.
    ///
    /// STORE has no destination register; the stored value comes from `src`.
    pub fn store(offset: i64, base: &str, src: &str) -> Self {
        let mut instruction = Self::new(Opcode::Store);
        instruction.offset = Some(offset);
        instruction.base = Some(base.to_string());
        instruction.src1 = Some(src.to_string());
        instruction
    }

    pub fn is_arithmetic(&self) -> bool {
        self.op.is_arithmetic()
    }

    pub fn is_memory_op(&self) -> bool {
        self.op.is_memory_op()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let none = "?";
        match self.op {
            op if op.is_arithmetic() => write!(
                f,
                "{} {}, {}, {}",
                op,
                self.dest.as_deref().unwrap_or(none),
                self.src1.as_deref().unwrap_or(none),
                self.src2.as_deref().unwrap_or(none),
            ),
            Opcode::Load => write!(
                f,
                "LOAD {}, {}({})",
                self.dest.as_deref().unwrap_or(none),
                self.offset.unwrap_or(0),
                self.base.as_deref().unwrap_or(none),
            ),
            _ => write!(
                f,
                "STORE {}({}), {}",
                self.offset.unwrap_or(0),
                self.base.as_deref().unwrap_or(none),
                self.src1.as_deref().unwrap_or(none),
            ),
        }
    }
}
