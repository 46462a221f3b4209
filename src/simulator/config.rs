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

// config.rs
//
// This file contains the configuration structs for the simulator: pool
// sizes, register and memory dimensions, and the latency table. The
// scheduler receives one immutable SimulatorConfig at construction.

use crate::components::instruction::Opcode;

/// Execution latency, in cycles, per operation.
#[derive(Debug, Clone, Copy)]
pub struct Latencies {
    pub add: usize,
    pub sub: usize,
    pub mul: usize,
    pub div: usize,
    pub load: usize,
    pub store: usize,
}

impl Default for Latencies {
    fn default() -> Self {
        Self {
            add: 2,
            sub: 2,
            mul: 10,
            div: 20,
            load: 5,
            store: 5,
        }
    }
}

impl Latencies {
    pub fn for_op(&self, op: Opcode) -> usize {
        match op {
            Opcode::Add => self.add,
            Opcode::Sub => self.sub,
            Opcode::Mul => self.mul,
            Opcode::Div => self.div,
            Opcode::Load => self.load,
            Opcode::Store => self.store,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub num_registers: usize,
    pub memory_size: usize,

    // Functional unit pools
    pub num_alu_units: usize,
    pub num_mul_div_units: usize,
    pub num_load_store_units: usize,

    // Reservation station pools
    pub num_alu_stations: usize,
    pub num_mul_div_stations: usize,
    pub num_load_buffers: usize,
    pub num_store_buffers: usize,

    pub latencies: Latencies,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            num_registers: 8,
            memory_size: 1024,
            num_alu_units: 2,
            num_mul_div_units: 1,
            num_load_store_units: 1,
            num_alu_stations: 3,
            num_mul_div_stations: 2,
            num_load_buffers: 2,
            num_store_buffers: 2,
            latencies: Latencies::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registers(mut self, num: usize) -> Self {
        assert!(num > 0, "Register count must be positive");
        self.num_registers = num;
        self
    }

    pub fn with_memory_size(mut self, size: usize) -> Self {
        assert!(size > 0, "Memory size must be positive");
        self.memory_size = size;
        self
    }

    pub fn with_alu_units(mut self, num: usize) -> Self {
        assert!(num > 0, "ALU unit count must be positive");
        self.num_alu_units = num;
        self
    }

    pub fn with_mul_div_units(mut self, num: usize) -> Self {
        assert!(num > 0, "MUL/DIV unit count must be positive");
        self.num_mul_div_units = num;
        self
    }

    pub fn with_load_store_units(mut self, num: usize) -> Self {
        assert!(num > 0, "LOAD/STORE unit count must be positive");
        self.num_load_store_units = num;
        self
    }

    pub fn with_alu_stations(mut self, num: usize) -> Self {
        assert!(num > 0, "ALU station count must be positive");
        self.num_alu_stations = num;
        self
    }

    pub fn with_mul_div_stations(mut self, num: usize) -> Self {
        assert!(num > 0, "MUL/DIV station count must be positive");
        self.num_mul_div_stations = num;
        self
    }

    pub fn with_load_buffers(mut self, num: usize) -> Self {
        assert!(num > 0, "Load buffer count must be positive");
        self.num_load_buffers = num;
        self
    }

    pub fn with_store_buffers(mut self, num: usize) -> Self {
        assert!(num > 0, "Store buffer count must be positive");
        self.num_store_buffers = num;
        self
    }

    pub fn with_latencies(mut self, latencies: Latencies) -> Self {
        self.latencies = latencies;
        self
    }
}
