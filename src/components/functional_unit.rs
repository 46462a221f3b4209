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

// functional_unit.rs
//
// This file contains the functional units and their pool. A unit binds to
// at most one reservation station (by tag) while executing, counts down
// its latency, and computes the result when the countdown reaches zero.
// LOAD/STORE units touch memory through the borrow passed into tick().

use crate::components::instruction::Opcode;
use crate::components::memory::Memory;
use crate::components::reservation_station::{ReservationStation, ReservationStations};
use crate::errors::SimulatorError;
use log::warn;

/// Unit classes and the operations each one executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Alu,
    MulDiv,
    LoadStore,
}

impl UnitKind {
    pub fn supports(&self, op: Opcode) -> bool {
        matches!(
            (self, op),
            (UnitKind::Alu, Opcode::Add)
                | (UnitKind::Alu, Opcode::Sub)
                | (UnitKind::MulDiv, Opcode::Mul)
                | (UnitKind::MulDiv, Opcode::Div)
                | (UnitKind::LoadStore, Opcode::Load)
                | (UnitKind::LoadStore, Opcode::Store)
        )
    }
}

/// One functional unit. `station` is the transient binding tag of the
/// reservation station being executed; the station itself stays owned by
/// the pool for its whole issue-to-write-back lifetime.
#[derive(Debug, Clone)]
pub struct FunctionalUnit {
    pub name: String,
    pub kind: UnitKind,
    pub busy: bool,
    pub station: Option<String>,
    pub cycles_left: usize,
}

impl FunctionalUnit {
    pub fn new(name: String, kind: UnitKind) -> Self {
        Self {
            name,
            kind,
            busy: false,
            station: None,
            cycles_left: 0,
        }
    }

    pub fn can_accept(&self, op: Opcode) -> bool {
        self.kind.supports(op) && !self.busy
    }

    /// Bind a reservation station and arm the latency countdown.
    pub fn start_execution(&mut self, station_tag: String, latency: usize) {
        self.busy = true;
        self.station = Some(station_tag);
        self.cycles_left = latency;
    }

    fn reset(&mut self) {
        self.busy = false;
        self.station = None;
        self.cycles_left = 0;
    }
}

// Integer division with the quotient rounded toward negative infinity.
fn floor_div(lhs: i64, rhs: i64) -> i64 {
    let quotient = lhs / rhs;
    if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        quotient - 1
    } else {
        quotient
    }
}

fn compute_result(
    unit_name: &str,
    kind: UnitKind,
    station: &ReservationStation,
    memory: &mut Memory,
) -> Result<Option<i64>, SimulatorError> {
    let op = station.op.ok_or_else(|| SimulatorError::UnsupportedOperation {
        unit: unit_name.to_string(),
        op: "<none>".to_string(),
    })?;

    let vj = station.vj.unwrap_or(0);
    let vk = station.vk.unwrap_or(0);

    match (kind, op) {
        (UnitKind::Alu, Opcode::Add) => Ok(Some(vj.wrapping_add(vk))),
        (UnitKind::Alu, Opcode::Sub) => Ok(Some(vj.wrapping_sub(vk))),
        (UnitKind::MulDiv, Opcode::Mul) => Ok(Some(vj.wrapping_mul(vk))),
        (UnitKind::MulDiv, Opcode::Div) => {
            if vk == 0 {
                warn!("Division by zero in {}; result forced to 0", station.name);
                Ok(Some(0))
            } else {
                Ok(Some(floor_div(vj, vk)))
            }
        },
        (UnitKind::LoadStore, Opcode::Load) => {
            Ok(Some(memory.read(station.address.unwrap_or(0))))
        },
        (UnitKind::LoadStore, Opcode::Store) => {
            memory.write(station.address.unwrap_or(0), vk);
            Ok(None)
        },
        _ => Err(SimulatorError::UnsupportedOperation {
            unit: unit_name.to_string(),
            op: op.to_string(),
        }),
    }
}

/// Owns every functional unit, in fixed declaration order: ALUs, MUL/DIV
/// units, LOAD/STORE units.
pub struct FunctionalUnits {
    pub units: Vec<FunctionalUnit>,
}

impl FunctionalUnits {
    pub fn new(num_alu: usize, num_mul_div: usize, num_load_store: usize) -> Self {
        let mut units = Vec::new();
        for i in 0..num_alu {
            units.push(FunctionalUnit::new(format!("ALU{}", i + 1), UnitKind::Alu));
        }
        for i in 0..num_mul_div {
            units.push(FunctionalUnit::new(
                format!("MULDIV{}", i + 1),
                UnitKind::MulDiv,
            ));
        }
        for i in 0..num_load_store {
            units.push(FunctionalUnit::new(
                format!("LOADSTORE{}", i + 1),
                UnitKind::LoadStore,
            ));
        }

        Self { units }
    }

    /// First free unit that executes `op`, in pool order.
    pub fn get_available(&mut self, op: Opcode) -> Option<&mut FunctionalUnit> {
        self.units.iter_mut().find(|unit| unit.can_accept(op))
    }

    /// Advance every unit by one cycle.
    ///
    /// Each busy unit decrements its countdown (mirrored onto its bound
    /// station). A unit that reaches zero computes its result, releases
    /// the station binding, and contributes a `(tag, value)` completion.
    /// Completions come back in unit traversal order; the value is `None`
    /// for STORE. Arbitration between them is the scheduler's problem.
    pub fn tick(
        &mut self,
        stations: &mut ReservationStations,
        memory: &mut Memory,
    ) -> Result<Vec<(String, Option<i64>)>, SimulatorError> {
        let mut results = Vec::new();

        for unit in &mut self.units {
            if !unit.busy {
                continue;
            }

            let tag = match unit.station.clone() {
                Some(tag) => tag,
                None => continue,
            };

            unit.cycles_left = unit.cycles_left.saturating_sub(1);
            if let Some(station) = stations.get_mut_by_tag(&tag) {
                station.cycles_left = station.cycles_left.saturating_sub(1);
            }

            if unit.cycles_left > 0 {
                continue;
            }

            if let Some(station) = stations.get_mut_by_tag(&tag) {
                let result = compute_result(&unit.name, unit.kind, station, memory)?;
                station.executing = false;
                results.push((tag, result));
            }

            unit.reset();
        }

        Ok(results)
    }
}
