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

// simulator.rs
//
// This file contains the scheduler: the component that owns every other
// component and advances the pipeline one clock cycle at a time. A tick
// runs the three stages in reverse order — write-back, execute, issue —
// so that results produced this cycle are observable to executions and
// issues in the same cycle, while a newly issued instruction can never
// complete in the cycle it was issued.

use crate::components::common_data_bus::CommonDataBus;
use crate::components::functional_unit::FunctionalUnits;
use crate::components::instruction::{Instruction, Opcode};
use crate::components::memory::Memory;
use crate::components::register_file::RegisterFile;
use crate::components::reservation_station::ReservationStations;
use crate::errors::SimulatorError;
use crate::simulator::config::SimulatorConfig;
use crate::simulator::visualization::CycleState;
use crate::utils::metrics::{Metrics, MetricsReport};
use crate::utils::parser;
use log::debug;
use std::path::Path;

// Register renaming at issue: record the pending producer's tag in the
// q-slot, or capture the current register value into the v-slot.
fn capture_operand(
    registers: &RegisterFile,
    source: &str,
    q_slot: &mut Option<String>,
    v_slot: &mut Option<i64>,
) -> Result<(), SimulatorError> {
    match registers.get_status(source)? {
        Some(tag) => {
            *q_slot = Some(tag);
        },
        None => {
            *q_slot = None;
            *v_slot = Some(registers.read(source)?);
        },
    }
    Ok(())
}

pub struct Simulator {
    pub config: SimulatorConfig,
    pub memory: Memory,
    pub registers: RegisterFile,
    pub functional_units: FunctionalUnits,
    pub reservation_stations: ReservationStations,
    pub cdb: CommonDataBus,
    pub metrics: Metrics,

    // Program state
    pub instructions: Vec<Instruction>,
    pub pc: usize,
    pub cycle: usize,
    pub done: bool,
}

impl Simulator {
    /// Create a simulator with OS-random initial register values.
    pub fn new(config: SimulatorConfig) -> Self {
        let registers = RegisterFile::new(config.num_registers);
        Self::with_registers(config, registers)
    }

    /// Create a simulator whose initial register values are drawn from a
    /// fixed seed, for reproducible runs.
    pub fn with_seed(config: SimulatorConfig, seed: u64) -> Self {
        let registers = RegisterFile::with_seed(config.num_registers, seed);
        Self::with_registers(config, registers)
    }

    fn with_registers(config: SimulatorConfig, registers: RegisterFile) -> Self {
        let memory = Memory::new(config.memory_size);
        let functional_units = FunctionalUnits::new(
            config.num_alu_units,
            config.num_mul_div_units,
            config.num_load_store_units,
        );
        let reservation_stations = ReservationStations::new(
            config.num_alu_stations,
            config.num_mul_div_stations,
            config.num_load_buffers,
            config.num_store_buffers,
        );

        Self {
            config,
            memory,
            registers,
            functional_units,
            reservation_stations,
            cdb: CommonDataBus::new(),
            metrics: Metrics::new(),
            instructions: Vec::new(),
            pc: 0,
            cycle: 0,
            done: false,
        }
    }

    /// Load a program, resetting the program counter, clock, and metrics.
    pub fn load_program(&mut self, instructions: Vec<Instruction>) {
        self.metrics = Metrics::new();
        self.metrics.total_instructions = instructions.len();
        self.instructions = instructions;
        self.pc = 0;
        self.cycle = 0;
        self.done = false;
    }

    /// Parse a trace file and load it. Returns the number of instructions
    /// that survived parsing.
    pub fn load_trace<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, SimulatorError> {
        let instructions = parser::parse_file(path)?;
        let count = instructions.len();
        self.load_program(instructions);
        Ok(count)
    }

    /// Issue the next instruction, if a station of its class is free.
    ///
    /// On a structural hazard the stall counter is bumped and the program
    /// counter stays put, so the same instruction retries next tick.
    fn issue(&mut self) -> Result<bool, SimulatorError> {
        if self.pc >= self.instructions.len() {
            return Ok(false);
        }

        let instruction = self.instructions[self.pc].clone();
        let op = instruction.op;

        let station = match self.reservation_stations.get_available(op) {
            Some(station) => station,
            None => {
                self.metrics.increment_structural_hazard_stalls();
                return Ok(false);
            },
        };

        station.busy = true;
        station.op = Some(op);
        station.instruction = Some(self.pc);
        let tag = station.name.clone();

        match op {
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                station.dest = instruction.dest.clone();
                if let Some(src1) = instruction.src1.as_deref() {
                    capture_operand(&self.registers, src1, &mut station.qj, &mut station.vj)?;
                }
                if let Some(src2) = instruction.src2.as_deref() {
                    capture_operand(&self.registers, src2, &mut station.qk, &mut station.vk)?;
                }
            },
            Opcode::Load => {
                station.dest = instruction.dest.clone();
                if let Some(base) = instruction.base.as_deref() {
                    capture_operand(&self.registers, base, &mut station.qj, &mut station.vj)?;
                }
                station.offset = instruction.offset;
            },
            Opcode::Store => {
                if let Some(base) = instruction.base.as_deref() {
                    capture_operand(&self.registers, base, &mut station.qj, &mut station.vj)?;
                }
                if let Some(src) = instruction.src1.as_deref() {
                    capture_operand(&self.registers, src, &mut station.qk, &mut station.vk)?;
                }
                station.offset = instruction.offset;
            },
        }

        // Destination renaming. STORE produces no register result, so it
        // never renames. A previous pending producer is simply
        // overwritten; its eventual write-back will see the newer tag and
        // leave the register file alone.
        if op != Opcode::Store {
            if let Some(dest) = instruction.dest.as_deref() {
                self.registers.set_status(dest, Some(tag.clone()))?;
            }
        }

        self.instructions[self.pc].issue_cycle = Some(self.cycle);
        debug!("Cycle {}: issued '{}' to {}", self.cycle, instruction, tag);
        self.pc += 1;
        Ok(true)
    }

    /// Start execution for every ready station that can get a unit.
    ///
    /// Traversal is in station pool order, which also breaks ties between
    /// equally ready stations.
    fn execute(&mut self) {
        for index in 0..self.reservation_stations.stations.len() {
            let (ready, op) = {
                let station = &self.reservation_stations.stations[index];
                (station.is_ready(), station.op)
            };
            let op = match op {
                Some(op) if ready => op,
                _ => continue,
            };

            let latency = self.config.latencies.for_op(op);
            let tag = self.reservation_stations.stations[index].name.clone();

            if let Some(unit) = self.functional_units.get_available(op) {
                unit.start_execution(tag, latency);

                let station = &mut self.reservation_stations.stations[index];
                station.executing = true;
                station.cycles_left = latency;

                // Effective address is frozen at execute start and never
                // recomputed.
                if op.is_memory_op() {
                    station.address = Some(
                        station
                            .vj
                            .unwrap_or(0)
                            .wrapping_add(station.offset.unwrap_or(0)),
                    );
                }

                if let Some(instr_index) = station.instruction {
                    let instruction = &mut self.instructions[instr_index];
                    if instruction.start_cycle.is_none() {
                        instruction.start_cycle = Some(self.cycle);
                    }
                }
            }
        }
    }

    /// Retire at most one completion through the CDB.
    ///
    /// All units advance one cycle first. If several finish together only
    /// the first in traversal order broadcasts; the others have already
    /// released their units, so their stations fall back to ready and
    /// re-execute in a later cycle.
    fn write_back(&mut self) -> Result<(), SimulatorError> {
        self.cdb.clear();

        let results = self
            .functional_units
            .tick(&mut self.reservation_stations, &mut self.memory)?;

        let (tag, value) = match results.into_iter().next() {
            Some(result) => result,
            None => return Ok(()),
        };

        self.cdb.broadcast(&tag, value);

        let (op, dest, instr_index) = match self.reservation_stations.get_by_tag(&tag) {
            Some(station) => (station.op, station.dest.clone(), station.instruction),
            None => return Ok(()),
        };

        if let Some(instr_index) = instr_index {
            let instruction = &mut self.instructions[instr_index];
            if instruction.execute_complete_cycle.is_none() {
                instruction.execute_complete_cycle = Some(self.cycle);
            }
            if instruction.write_result_cycle.is_none() {
                instruction.write_result_cycle = Some(self.cycle);
            }
        }

        if op != Some(Opcode::Store) {
            if let Some(dest) = dest.as_deref() {
                if let Some(result) = value {
                    self.registers.write(dest, result)?;
                }
                // Clear the status only if it still names this station; a
                // younger issue may have re-renamed the destination.
                if self.registers.get_status(dest)?.as_deref() == Some(tag.as_str()) {
                    self.registers.set_status(dest, None)?;
                }
            }
        }

        self.reservation_stations.broadcast(&tag, value);

        if let Some(station) = self.reservation_stations.get_mut_by_tag(&tag) {
            station.clear();
        }

        self.metrics.completed_instructions += 1;
        debug!("Cycle {}: {} wrote back {:?}", self.cycle, tag, value);
        Ok(())
    }

    /// Advance the simulation by one clock cycle.
    ///
    /// Returns true while the simulation should continue.
    pub fn tick(&mut self) -> Result<bool, SimulatorError> {
        self.cycle += 1;
        self.metrics.total_cycles = self.cycle;
        self.metrics.update_rs_occupancy(&self.reservation_stations);
        self.metrics
            .update_ls_buffer_utilization(&self.reservation_stations);

        self.write_back()?;
        self.execute();
        let issued = self.issue()?;

        // Done when nothing issued, the program is exhausted, and every
        // station has drained.
        if !issued && self.pc >= self.instructions.len() && self.reservation_stations.all_free() {
            self.done = true;
            return Ok(false);
        }

        Ok(true)
    }

    /// Run until completion and return the performance report.
    pub fn run(&mut self) -> Result<MetricsReport, SimulatorError> {
        while self.tick()? {}
        Ok(self.metrics.report())
    }

    /// Run a single cycle and capture the resulting state, for stepwise
    /// driving and visualisation.
    pub fn run_step(&mut self) -> Result<(bool, CycleState), SimulatorError> {
        let continue_simulation = self.tick()?;
        Ok((continue_simulation, CycleState::capture(self)))
    }
}
