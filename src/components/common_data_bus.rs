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

// common_data_bus.rs
//
// This file contains the Common Data Bus: a single-slot broadcast channel
// carrying one (producer tag, value) pair per cycle. It is cleared at the
// start of write-back and holds nothing across ticks.

#[derive(Debug, Clone, Default)]
pub struct CommonDataBus {
    pub producer: Option<String>,
    pub value: Option<i64>,
    pub busy: bool,
}

impl CommonDataBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the bus for this cycle. Returns false if a broadcast already
    /// happened this cycle; the caller must drop the losing completion.
    pub fn broadcast(&mut self, producer: &str, value: Option<i64>) -> bool {
        if self.busy {
            return false;
        }

        self.producer = Some(producer.to_string());
        self.value = value;
        self.busy = true;
        true
    }

    /// Reset the bus for the next cycle.
    pub fn clear(&mut self) {
        self.producer = None;
        self.value = None;
        self.busy = false;
    }
}
