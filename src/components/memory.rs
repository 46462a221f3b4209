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

// memory.rs
//
// This file contains the memory system for the simulator: a linear,
// word-addressable store. Out-of-bounds accesses are soft failures so a
// bad trace degrades to warnings instead of aborting the run.

use log::warn;

pub struct Memory {
    pub data: Vec<i64>,
}

impl Memory {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Memory size must be positive");
        Self {
            data: vec![0; size],
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Read a word. Out-of-range addresses return 0 with a warning.
    pub fn read(&self, address: i64) -> i64 {
        if address < 0 || address >= self.data.len() as i64 {
            warn!("Memory address out of range: {}. LOAD returns 0.", address);
            return 0;
        }
        self.data[address as usize]
    }

    /// Write a word. Out-of-range writes are dropped with a warning.
    pub fn write(&mut self, address: i64, value: i64) {
        if address < 0 || address >= self.data.len() as i64 {
            warn!("Memory address out of range: {}. STORE skipped.", address);
            return;
        }
        self.data[address as usize] = value;
    }
}
