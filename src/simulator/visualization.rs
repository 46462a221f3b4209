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

// visualization.rs
//
// This file contains the per-cycle state snapshot consumed by external
// viewers, and its text/JSON rendering. The snapshot captures everything
// a viewer needs for one cycle: the register file, every busy station
// with full operand-tag detail, and the CDB.

use crate::simulator::simulator::Simulator;
use serde::Serialize;

/// One busy reservation station, as seen by a viewer.
#[derive(Debug, Clone, Serialize)]
pub struct StationState {
    pub name: String,
    pub busy: bool,
    pub op: Option<String>,
    pub dest: Option<String>,
    pub vj: Option<i64>,
    pub vk: Option<i64>,
    pub qj: Option<String>,
    pub qk: Option<String>,
    pub address: Option<i64>,
    pub executing: bool,
    pub cycles_left: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CdbState {
    pub producer: Option<String>,
    pub value: Option<i64>,
    pub busy: bool,
}

/// Full simulator state after one tick.
#[derive(Debug, Clone, Serialize)]
pub struct CycleState {
    pub cycle: usize,
    pub pc: usize,
    pub registers: Vec<i64>,
    pub register_status: Vec<Option<String>>,
    pub reservation_stations: Vec<StationState>,
    pub cdb: CdbState,
}

impl CycleState {
    pub fn capture(simulator: &Simulator) -> Self {
        let reservation_stations = simulator
            .reservation_stations
            .stations
            .iter()
            .filter(|station| station.busy)
            .map(|station| StationState {
                name: station.name.clone(),
                busy: station.busy,
                op: station.op.map(|op| op.mnemonic().to_string()),
                dest: station.dest.clone(),
                vj: station.vj,
                vk: station.vk,
                qj: station.qj.clone(),
                qk: station.qk.clone(),
                address: station.address,
                executing: station.executing,
                cycles_left: station.cycles_left,
            })
            .collect();

        Self {
            cycle: simulator.cycle,
            pc: simulator.pc,
            registers: simulator.registers.values.clone(),
            register_status: simulator.registers.status.clone(),
            reservation_stations,
            cdb: CdbState {
                producer: simulator.cdb.producer.clone(),
                value: simulator.cdb.value,
                busy: simulator.cdb.busy,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Renders cycle snapshots for the CLI and for the cycle log file.
pub struct StateDump {
    pub format: OutputFormat,
}

impl StateDump {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, state: &CycleState) -> String {
        match self.format {
            OutputFormat::Text => Self::render_text(state),
            OutputFormat::Json => {
                serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string())
            },
        }
    }

    fn render_text(state: &CycleState) -> String {
        let mut result = String::new();

        result.push_str(&format!(
            "=== Cycle {} (PC {}) ===\n",
            state.cycle, state.pc
        ));

        result.push_str("Registers:");
        for (index, value) in state.registers.iter().enumerate() {
            result.push_str(&format!(" R{}={}", index, value));
        }
        result.push('\n');

        let pending: Vec<String> = state
            .register_status
            .iter()
            .enumerate()
            .filter_map(|(index, status)| {
                status.as_ref().map(|tag| format!("R{}->{}", index, tag))
            })
            .collect();
        if !pending.is_empty() {
            result.push_str(&format!("Register status: {}\n", pending.join(" ")));
        }

        if state.reservation_stations.is_empty() {
            result.push_str("Reservation stations: all free\n");
        } else {
            result.push_str("Reservation stations:\n");
            for station in &state.reservation_stations {
                result.push_str(&format!(
                    "  {}: op={} dest={} vj={} vk={} qj={} qk={} executing={} cycles_left={}\n",
                    station.name,
                    station.op.as_deref().unwrap_or("-"),
                    station.dest.as_deref().unwrap_or("-"),
                    station
                        .vj
                        .map_or_else(|| "-".to_string(), |v| v.to_string()),
                    station
                        .vk
                        .map_or_else(|| "-".to_string(), |v| v.to_string()),
                    station.qj.as_deref().unwrap_or("-"),
                    station.qk.as_deref().unwrap_or("-"),
                    station.executing,
                    station.cycles_left,
                ));
            }
        }

        if state.cdb.busy {
            result.push_str(&format!(
                "CDB: {} -> {}\n",
                state.cdb.producer.as_deref().unwrap_or("-"),
                state
                    .cdb
                    .value
                    .map_or_else(|| "-".to_string(), |v| v.to_string()),
            ));
        } else {
            result.push_str("CDB: idle\n");
        }

        result
    }
}
