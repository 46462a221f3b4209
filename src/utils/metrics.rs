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

// metrics.rs
//
// This file contains the performance counters sampled each tick and the
// derived report (IPC, occupancy, stall rate) produced at the end of a run.

use crate::components::reservation_station::ReservationStations;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Metrics {
    pub total_cycles: usize,
    pub total_instructions: usize,
    pub completed_instructions: usize,

    // RS occupancy tracking (ALU + MUL/DIV pools)
    pub rs_busy_cycles: usize,
    pub total_rs_cycles: usize,

    // LOAD/STORE buffer utilization tracking
    pub ls_buffer_busy_cycles: usize,
    pub total_ls_buffer_cycles: usize,

    pub structural_hazard_stalls: usize,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample ALU + MUL/DIV station occupancy for this cycle.
    pub fn update_rs_occupancy(&mut self, stations: &ReservationStations) {
        for station in stations.arithmetic_stations() {
            if station.busy {
                self.rs_busy_cycles += 1;
            }
            self.total_rs_cycles += 1;
        }
    }

    /// Sample load/store buffer utilisation for this cycle.
    pub fn update_ls_buffer_utilization(&mut self, stations: &ReservationStations) {
        for buffer in stations.memory_buffers() {
            if buffer.busy {
                self.ls_buffer_busy_cycles += 1;
            }
            self.total_ls_buffer_cycles += 1;
        }
    }

    pub fn increment_structural_hazard_stalls(&mut self) {
        self.structural_hazard_stalls += 1;
    }

    /// Derive the end-of-run report from the raw counters.
    pub fn report(&self) -> MetricsReport {
        let ratio = |num: usize, denom: usize| {
            if denom > 0 {
                num as f64 / denom as f64
            } else {
                0.0
            }
        };

        MetricsReport {
            total_cycles: self.total_cycles,
            total_instructions: self.total_instructions,
            completed_instructions: self.completed_instructions,
            structural_hazard_stalls: self.structural_hazard_stalls,
            ipc: ratio(self.completed_instructions, self.total_cycles),
            rs_occupancy_percent: ratio(self.rs_busy_cycles, self.total_rs_cycles) * 100.0,
            ls_buffer_utilization_percent: ratio(
                self.ls_buffer_busy_cycles,
                self.total_ls_buffer_cycles,
            ) * 100.0,
            stall_percent: ratio(self.structural_hazard_stalls, self.total_cycles) * 100.0,
        }
    }
}

/// Performance summary for a completed simulation.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_cycles: usize,
    pub total_instructions: usize,
    pub completed_instructions: usize,
    pub structural_hazard_stalls: usize,
    pub ipc: f64,
    pub rs_occupancy_percent: f64,
    pub ls_buffer_utilization_percent: f64,
    pub stall_percent: f64,
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Performance Metrics ===")?;
        writeln!(f, "Total execution time: {} cycles", self.total_cycles)?;
        writeln!(f, "Instructions per cycle (IPC): {:.2}", self.ipc)?;
        writeln!(
            f,
            "Average reservation station occupancy: {:.2}%",
            self.rs_occupancy_percent
        )?;
        writeln!(
            f,
            "Load/store buffer utilization: {:.2}%",
            self.ls_buffer_utilization_percent
        )?;
        writeln!(
            f,
            "Structural hazard stalls: {} cycles ({:.2}%)",
            self.structural_hazard_stalls, self.stall_percent
        )
    }
}
