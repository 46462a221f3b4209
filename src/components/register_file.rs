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

// register_file.rs
//
// This file contains the register file implementation. It manages the
// register value vector and the parallel status vector, which names the
// reservation station that will produce each pending register. Register
// names are the normalised form R0..R<N-1>; anything else is a hard error.

use crate::errors::SimulatorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct RegisterFile {
    pub values: Vec<i64>,
    // status[i] is the tag of the station that will write R<i>, or None
    pub status: Vec<Option<String>>,
}

impl RegisterFile {
    /// Create a register file with R0 = 0 and R1..R<N-1> drawn from 1..=100.
    pub fn new(num_registers: usize) -> Self {
        Self::from_rng(num_registers, &mut rand::thread_rng())
    }

    /// Seeded variant of [`RegisterFile::new`] for reproducible runs.
    pub fn with_seed(num_registers: usize, seed: u64) -> Self {
        Self::from_rng(num_registers, &mut StdRng::seed_from_u64(seed))
    }

    fn from_rng<R: Rng>(num_registers: usize, rng: &mut R) -> Self {
        assert!(num_registers > 0, "Register count must be positive");

        let mut values = vec![0i64];
        for _ in 1..num_registers {
            values.push(rng.gen_range(1..=100));
        }

        Self {
            values,
            status: vec![None; num_registers],
        }
    }

    /// Convert a register name (e.g. `R1`) to its index.
    pub fn register_index(&self, name: &str) -> Result<usize, SimulatorError> {
        let digits = name
            .strip_prefix('R')
            .ok_or_else(|| SimulatorError::InvalidRegisterName(name.to_string()))?;

        let index: usize = digits
            .parse()
            .map_err(|_| SimulatorError::InvalidRegisterName(name.to_string()))?;

        if index >= self.values.len() {
            return Err(SimulatorError::RegisterOutOfRange(index));
        }

        Ok(index)
    }

    pub fn read(&self, name: &str) -> Result<i64, SimulatorError> {
        let index = self.register_index(name)?;
        Ok(self.values[index])
    }

    /// Write a register value. R0 is an ordinary register here; there is no
    /// hardware-zero special case.
    pub fn write(&mut self, name: &str, value: i64) -> Result<(), SimulatorError> {
        let index = self.register_index(name)?;
        self.values[index] = value;
        Ok(())
    }

    /// The tag of the station that will produce this register, if any.
    pub fn get_status(&self, name: &str) -> Result<Option<String>, SimulatorError> {
        let index = self.register_index(name)?;
        Ok(self.status[index].clone())
    }

    pub fn set_status(
        &mut self,
        name: &str,
        station: Option<String>,
    ) -> Result<(), SimulatorError> {
        let index = self.register_index(name)?;
        self.status[index] = station;
        Ok(())
    }

    /// True if the register is not waiting on any pending producer.
    pub fn is_available(&self, name: &str) -> Result<bool, SimulatorError> {
        let index = self.register_index(name)?;
        Ok(self.status[index].is_none())
    }
}
