//! Bounded circular-buffer core with registered data and error pulses.
//!
//! # Output timing
//!
//! | output             | class                                              |
//! |--------------------|----------------------------------------------------|
//! | `read_data`        | registered                                         |
//! | `error_write_full` | registered (one-tick pulse)                        |
//! | `error_read_empty` | registered (one-tick pulse)                        |
//! | `full`, `empty`    | combinational on the count, or registered from the |
//! |                    | start-of-tick count under [`StatusTiming::Registered`] |
//!
//! # Per-tick update
//!
//! With `full`/`empty` taken from the count at the start of the tick:
//!
//! - a write is admitted iff `write_enable && !full && !read_enable`;
//! - a read is admitted iff `read_enable && !empty && !write_enable`;
//! - both enables together are a no-op for both, and are not flagged;
//! - `error_write_full = write_enable && full && !read_enable`;
//! - `error_read_empty = read_enable && empty && !write_enable`;
//! - when no read is admitted and the buffer started the tick empty,
//!   `read_data` is forced to zero.
//!
//! Reset zeroes the pointers, count, `read_data` and both pulses, and reports
//! `full = false`, `empty = true` for that tick. Slot contents are not
//! cleared; they are unreachable until overwritten.

use pulse_common::{InternalError, PulseResult, Word};
use pulse_config::{FifoParams, StatusTiming};
use serde::Serialize;

use crate::clocked::{bit, Clocked, ResetInput, SignalInfo, TimingClass};
use crate::error::SimError;

/// Inputs presented to the FIFO for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoInputs {
    /// Reset level.
    pub reset: bool,
    /// Write request.
    pub write_enable: bool,
    /// Read request.
    pub read_enable: bool,
    /// Data stored by an admitted write.
    pub write_data: Word,
}

impl FifoInputs {
    /// No request, reset deasserted.
    pub fn idle(width: u32) -> Self {
        Self {
            reset: false,
            write_enable: false,
            read_enable: false,
            write_data: Word::zero(width),
        }
    }

    /// Reset asserted, no request.
    pub fn reset(width: u32) -> Self {
        Self {
            reset: true,
            ..Self::idle(width)
        }
    }

    /// Write request for `data`.
    pub fn write(data: Word) -> Self {
        Self {
            write_enable: true,
            write_data: data,
            ..Self::idle(data.width())
        }
    }

    /// Read request.
    pub fn read(width: u32) -> Self {
        Self {
            read_enable: true,
            ..Self::idle(width)
        }
    }

    /// Both enables asserted in the same tick.
    pub fn write_and_read(data: Word) -> Self {
        Self {
            read_enable: true,
            ..Self::write(data)
        }
    }
}

impl ResetInput for FifoInputs {
    fn set_reset(&mut self, reset: bool) {
        self.reset = reset;
    }
}

/// FIFO outputs visible after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FifoOutputs {
    /// The word returned by the most recent admitted read.
    pub read_data: Word,
    /// Buffer holds `D` words.
    pub full: bool,
    /// Buffer holds no words.
    pub empty: bool,
    /// A write was attempted while full on the previous tick.
    pub error_write_full: bool,
    /// A read was attempted while empty on the previous tick.
    pub error_read_empty: bool,
}

/// Cycle-accurate model of the circular-buffer core.
#[derive(Clone, Debug)]
pub struct FifoCore {
    params: FifoParams,
    slots: Box<[u64]>,
    write_index: u32,
    read_index: u32,
    count: u32,
    read_data: u64,
    error_write_full: bool,
    error_read_empty: bool,
    /// Status registered from the start-of-tick count, for [`StatusTiming::Registered`].
    registered_full: bool,
    registered_empty: bool,
}

impl FifoCore {
    /// Builds a FIFO in its reset state.
    pub fn new(params: FifoParams) -> Result<Self, SimError> {
        if params.width == 0 || params.width > pulse_common::MAX_WORD_WIDTH {
            return Err(SimError::InvalidParameter {
                reason: format!("fifo width {} outside 1..=64", params.width),
            });
        }
        if params.depth == 0 || params.depth > pulse_common::MAX_FIFO_DEPTH {
            return Err(SimError::InvalidParameter {
                reason: format!(
                    "fifo depth {} outside 1..={}",
                    params.depth,
                    pulse_common::MAX_FIFO_DEPTH
                ),
            });
        }
        Ok(Self {
            params,
            slots: vec![0; params.depth as usize].into_boxed_slice(),
            write_index: 0,
            read_index: 0,
            count: 0,
            read_data: 0,
            error_write_full: false,
            error_read_empty: false,
            registered_full: false,
            registered_empty: true,
        })
    }

    /// Returns the construction parameters.
    pub fn params(&self) -> &FifoParams {
        &self.params
    }

    /// Number of unread words currently stored.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Slot the next admitted write will fill.
    pub fn write_index(&self) -> u32 {
        self.write_index
    }

    /// Slot the next admitted read will drain.
    pub fn read_index(&self) -> u32 {
        self.read_index
    }

    /// True when the count equals the depth, independent of status timing.
    pub fn is_full(&self) -> bool {
        self.count == self.params.depth
    }

    /// True when the count is zero, independent of status timing.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The unread words, oldest first.
    pub fn contents(&self) -> Vec<Word> {
        (0..self.count)
            .map(|i| {
                let slot = (self.read_index + i) % self.params.depth;
                Word::from_u64(self.slots[slot as usize], self.params.width)
            })
            .collect()
    }

    fn status_timing_class(&self) -> TimingClass {
        match self.params.status_timing {
            StatusTiming::Combinational => TimingClass::Combinational,
            StatusTiming::Registered => TimingClass::Registered,
        }
    }

    fn apply_reset(&mut self) {
        self.write_index = 0;
        self.read_index = 0;
        self.count = 0;
        self.read_data = 0;
        self.error_write_full = false;
        self.error_read_empty = false;
        self.registered_full = false;
        self.registered_empty = true;
    }

    fn advance(&self, index: u32) -> u32 {
        (index + 1) % self.params.depth
    }
}

impl Clocked for FifoCore {
    type Inputs = FifoInputs;
    type Outputs = FifoOutputs;

    fn name(&self) -> &'static str {
        "fifo"
    }

    fn validate_inputs(&self, inputs: &FifoInputs) -> Result<(), SimError> {
        // `write_data` is ignored under reset and when the write enable is low.
        if !inputs.reset
            && inputs.write_enable
            && inputs.write_data.width() != self.params.width
        {
            return Err(SimError::WidthMismatch {
                signal: "write_data".to_string(),
                expected: self.params.width,
                actual: inputs.write_data.width(),
            });
        }
        Ok(())
    }

    fn step(&mut self, inputs: &FifoInputs) -> Result<FifoOutputs, SimError> {
        self.validate_inputs(inputs)?;

        if inputs.reset {
            self.apply_reset();
            return Ok(self.outputs());
        }

        let full = self.is_full();
        let empty = self.is_empty();
        let write_enable = inputs.write_enable;
        let read_enable = inputs.read_enable;

        let write_admitted = write_enable && !full && !read_enable;
        let read_admitted = read_enable && !empty && !write_enable;

        // Admissions are mutually exclusive, so applying them in sequence
        // commits the same state as a simultaneous update.
        if write_admitted {
            self.slots[self.write_index as usize] = inputs.write_data.value();
            self.write_index = self.advance(self.write_index);
            self.count += 1;
        }
        if read_admitted {
            self.read_data = self.slots[self.read_index as usize];
            self.read_index = self.advance(self.read_index);
            self.count -= 1;
        } else if empty {
            self.read_data = 0;
        }

        self.error_write_full = write_enable && full && !read_enable;
        self.error_read_empty = read_enable && empty && !write_enable;
        self.registered_full = full;
        self.registered_empty = empty;

        Ok(self.outputs())
    }

    fn outputs(&self) -> FifoOutputs {
        let (full, empty) = match self.params.status_timing {
            StatusTiming::Combinational => (self.is_full(), self.is_empty()),
            StatusTiming::Registered => (self.registered_full, self.registered_empty),
        };
        FifoOutputs {
            read_data: Word::from_u64(self.read_data, self.params.width),
            full,
            empty,
            error_write_full: self.error_write_full,
            error_read_empty: self.error_read_empty,
        }
    }

    fn signals(&self) -> Vec<SignalInfo> {
        let width = self.params.width;
        let status = self.status_timing_class();
        vec![
            SignalInfo::input("reset", 1),
            SignalInfo::input("write_enable", 1),
            SignalInfo::input("read_enable", 1),
            SignalInfo::input("write_data", width),
            SignalInfo::output("read_data", width, TimingClass::Registered),
            SignalInfo::output("full", 1, status),
            SignalInfo::output("empty", 1, status),
            SignalInfo::output("error_write_full", 1, TimingClass::Registered),
            SignalInfo::output("error_read_empty", 1, TimingClass::Registered),
        ]
    }

    fn sample(&self, inputs: &FifoInputs, outputs: &FifoOutputs) -> Vec<Word> {
        vec![
            bit(inputs.reset),
            bit(inputs.write_enable),
            bit(inputs.read_enable),
            inputs.write_data,
            outputs.read_data,
            bit(outputs.full),
            bit(outputs.empty),
            bit(outputs.error_write_full),
            bit(outputs.error_read_empty),
        ]
    }

    fn check_invariants(&self) -> PulseResult<()> {
        let depth = self.params.depth;
        if self.count > depth {
            return Err(InternalError::new(format!(
                "fifo count {} exceeds depth {depth}",
                self.count
            )));
        }
        if self.write_index >= depth || self.read_index >= depth {
            return Err(InternalError::new(format!(
                "fifo pointer out of range: write {} read {} depth {depth}",
                self.write_index, self.read_index
            )));
        }
        let distance = (self.write_index + depth - self.read_index) % depth;
        if distance != self.count % depth {
            return Err(InternalError::new(format!(
                "fifo count {} disagrees with pointers (write {} read {})",
                self.count, self.write_index, self.read_index
            )));
        }
        Ok(())
    }
}
