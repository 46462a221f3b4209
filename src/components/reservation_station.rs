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

// reservation_station.rs
//
// This file contains the reservation station entry and the pool that
// owns every station. Stations are partitioned into four classes (ALU,
// MUL/DIV, load buffer, store buffer) and identified by a stable textual
// tag, which is also the producer identifier broadcast on the CDB.

use crate::components::instruction::Opcode;

/// Station classes. Dispatch never places an operation in the wrong class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationKind {
    Alu,
    MulDiv,
    LoadBuffer,
    StoreBuffer,
}

impl StationKind {
    pub fn accepts(&self, op: Opcode) -> bool {
        matches!(
            (self, op),
            (StationKind::Alu, Opcode::Add)
                | (StationKind::Alu, Opcode::Sub)
                | (StationKind::MulDiv, Opcode::Mul)
                | (StationKind::MulDiv, Opcode::Div)
                | (StationKind::LoadBuffer, Opcode::Load)
                | (StationKind::StoreBuffer, Opcode::Store)
        )
    }
}

/// One reservation station entry.
///
/// `vj`/`qj` and `vk`/`qk` are the operand slots: a `Some` q-slot names
/// the station that will produce the operand, otherwise the value sits in
/// the v-slot. `instruction` is the program index of the issued
/// instruction, used by the scheduler to stamp its cycle fields.
#[derive(Debug, Clone)]
pub struct ReservationStation {
    pub name: String,
    pub kind: StationKind,
    pub busy: bool,
    pub op: Option<Opcode>,
    pub dest: Option<String>,
    pub instruction: Option<usize>,
    pub vj: Option<i64>,
    pub vk: Option<i64>,
    pub qj: Option<String>,
    pub qk: Option<String>,
    pub offset: Option<i64>,
    pub address: Option<i64>,
    pub executing: bool,
    pub cycles_left: usize,
}

impl ReservationStation {
    pub fn new(name: String, kind: StationKind) -> Self {
        Self {
            name,
            kind,
            busy: false,
            op: None,
            dest: None,
            instruction: None,
            vj: None,
            vk: None,
            qj: None,
            qk: None,
            offset: None,
            address: None,
            executing: false,
            cycles_left: 0,
        }
    }

    /// Ready to start execution: occupied, not already on a unit, and no
    /// pending operand.
    pub fn is_ready(&self) -> bool {
        self.busy && !self.executing && self.qj.is_none() && self.qk.is_none()
    }

    /// Return the station to the free pool.
    pub fn clear(&mut self) {
        self.busy = false;
        self.op = None;
        self.dest = None;
        self.instruction = None;
        self.vj = None;
        self.vk = None;
        self.qj = None;
        self.qk = None;
        self.offset = None;
        self.address = None;
        self.executing = false;
        self.cycles_left = 0;
    }

    /// CDB snoop for one entry: capture the broadcast value into any
    /// operand slot waiting on `tag`. Returns true if a slot was filled.
    pub fn update_operand(&mut self, tag: &str, value: Option<i64>) -> bool {
        let mut updated = false;

        if self.qj.as_deref() == Some(tag) {
            self.qj = None;
            self.vj = value;
            updated = true;
        }

        if self.qk.as_deref() == Some(tag) {
            self.qk = None;
            self.vk = value;
            updated = true;
        }

        updated
    }
}

/// Owns every reservation station, in fixed declaration order:
/// ALU stations, MUL/DIV stations, load buffers, store buffers. All
/// traversal-order tie-breaking in the pipeline follows this order.
pub struct ReservationStations {
    pub stations: Vec<ReservationStation>,
}

impl ReservationStations {
    pub fn new(
        num_alu: usize,
        num_mul_div: usize,
        num_load_buffers: usize,
        num_store_buffers: usize,
    ) -> Self {
        let mut stations = Vec::new();
        for i in 0..num_alu {
            stations.push(ReservationStation::new(
                format!("ALU{}", i + 1),
                StationKind::Alu,
            ));
        }
        for i in 0..num_mul_div {
            stations.push(ReservationStation::new(
                format!("MUL{}", i + 1),
                StationKind::MulDiv,
            ));
        }
        for i in 0..num_load_buffers {
            stations.push(ReservationStation::new(
                format!("LOAD{}", i + 1),
                StationKind::LoadBuffer,
            ));
        }
        for i in 0..num_store_buffers {
            stations.push(ReservationStation::new(
                format!("STORE{}", i + 1),
                StationKind::StoreBuffer,
            ));
        }

        Self { stations }
    }

    /// First free station whose class accepts `op`, in pool order.
    pub fn get_available(&mut self, op: Opcode) -> Option<&mut ReservationStation> {
        self.stations
            .iter_mut()
            .find(|station| station.kind.accepts(op) && !station.busy)
    }

    pub fn get_by_tag(&self, tag: &str) -> Option<&ReservationStation> {
        self.stations.iter().find(|station| station.name == tag)
    }

    pub fn get_mut_by_tag(&mut self, tag: &str) -> Option<&mut ReservationStation> {
        self.stations.iter_mut().find(|station| station.name == tag)
    }

    /// CDB snoop across the whole pool.
    pub fn broadcast(&mut self, tag: &str, value: Option<i64>) {
        for station in &mut self.stations {
            let _ = station.update_operand(tag, value);
        }
    }

    pub fn all_free(&self) -> bool {
        self.stations.iter().all(|station| !station.busy)
    }

    /// ALU + MUL/DIV stations, for occupancy accounting.
    pub fn arithmetic_stations(&self) -> impl Iterator<Item = &ReservationStation> {
        self.stations
            .iter()
            .filter(|station| matches!(station.kind, StationKind::Alu | StationKind::MulDiv))
    }

    /// Load + store buffers, for utilisation accounting.
    pub fn memory_buffers(&self) -> impl Iterator<Item = &ReservationStation> {
        self.stations.iter().filter(|station| {
            matches!(
                station.kind,
                StationKind::LoadBuffer | StationKind::StoreBuffer
            )
        })
    }
}
