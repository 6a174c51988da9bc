//! Conformance test helpers for the Pulse cycle models.
//!
//! Provides a queue-based reference FIFO, parameter and word builders, and a
//! one-call path from TOML text to a finished bench run, for assertion in
//! integration tests.

#![warn(missing_docs)]

use std::collections::VecDeque;

use pulse_common::Word;
use pulse_config::{
    load_bench_from_str, load_config_from_str, ComparatorParams, FifoParams, StatusTiming,
};
use pulse_sim::{BenchResult, FifoInputs, FifoOutputs};

/// Builds FIFO parameters with combinational status flags.
pub fn fifo_params(width: u32, depth: u32) -> FifoParams {
    FifoParams {
        width,
        depth,
        status_timing: StatusTiming::Combinational,
    }
}

/// Builds comparator parameters.
pub fn comparator_params(width: u32, inputs: u32) -> ComparatorParams {
    ComparatorParams { width, inputs }
}

/// Wraps each value as a `width`-bit word, truncating excess bits.
pub fn words(values: &[u64], width: u32) -> Vec<Word> {
    values.iter().map(|&v| Word::from_u64(v, width)).collect()
}

/// Mask of the low `width` bits.
pub fn width_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Loads a project config and a bench from TOML text, resolves, and runs it.
pub fn run_bench_source(
    config_toml: &str,
    bench_name: &str,
    bench_toml: &str,
) -> Result<BenchResult, Box<dyn std::error::Error>> {
    let config = load_config_from_str(config_toml)?;
    let bench = load_bench_from_str(bench_name, bench_toml)?;
    let resolved = pulse_config::resolve_bench(&config, bench_name, &bench)?;
    Ok(pulse_sim::simulate(&resolved, None)?)
}

/// A FIFO reference model built on a `VecDeque`.
///
/// Admission, pulse, and read-data rules are written against queue length
/// rather than pointers and a counter, so agreement with [`pulse_sim::FifoCore`]
/// is a meaningful check. Status flags are combinational.
#[derive(Clone, Debug)]
pub struct ReferenceFifo {
    width: u32,
    depth: usize,
    queue: VecDeque<u64>,
    read_data: u64,
}

impl ReferenceFifo {
    /// Creates an empty reference FIFO.
    pub fn new(params: FifoParams) -> Self {
        Self {
            width: params.width,
            depth: params.depth as usize,
            queue: VecDeque::with_capacity(params.depth as usize),
            read_data: 0,
        }
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Stored words, oldest first.
    pub fn contents(&self) -> Vec<Word> {
        self.queue
            .iter()
            .map(|&v| Word::from_u64(v, self.width))
            .collect()
    }

    /// Applies one tick and returns the expected outputs.
    pub fn step(&mut self, inputs: &FifoInputs) -> FifoOutputs {
        let mut error_write_full = false;
        let mut error_read_empty = false;

        if inputs.reset {
            self.queue.clear();
            self.read_data = 0;
        } else {
            let was_full = self.queue.len() == self.depth;
            if self.queue.is_empty() {
                self.read_data = 0;
            }
            match (inputs.write_enable, inputs.read_enable) {
                (true, false) if was_full => error_write_full = true,
                (true, false) => self.queue.push_back(inputs.write_data.value()),
                (false, true) => match self.queue.pop_front() {
                    Some(v) => self.read_data = v,
                    None => error_read_empty = true,
                },
                _ => {}
            }
        }

        FifoOutputs {
            read_data: Word::from_u64(self.read_data, self.width),
            full: self.queue.len() == self.depth,
            empty: self.queue.is_empty(),
            error_write_full,
            error_read_empty,
        }
    }
}
