//! Cycle-accurate models of the Pulse hardware cores.
//!
//! This crate models two synchronous cores one clock tick at a time: a
//! circular-buffer FIFO with overflow/underflow pulses and a capture-sort-report
//! comparator that selects the minimum or maximum of a fixed set of words.
//! Both implement the [`Clocked`] trait, so the bench driver, replication
//! array, and waveform output work with either.
//!
//! # Usage
//!
//! ```ignore
//! use pulse_sim::{FifoCore, FifoInputs, Clocked};
//!
//! let mut fifo = FifoCore::new(params)?;
//! fifo.step(&FifoInputs::write(word))?;
//! let out = fifo.step(&FifoInputs::read(params.width))?;
//! assert_eq!(out.read_data, word);
//! ```
//!
//! # Modules
//!
//! - `clocked`: the per-tick stepping trait and port descriptions
//! - `fifo`: circular-buffer FIFO core
//! - `comparator`: min/max comparator core
//! - `array`: independent replication of cores
//! - `testbench`: bench program execution and tracing
//! - `waveform`: waveform recording (VCD format)
//! - `error`: simulation error types

#![warn(missing_docs)]

pub mod array;
pub mod clocked;
pub mod comparator;
pub mod error;
pub mod fifo;
pub mod testbench;
pub mod waveform;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use pulse_config::ResolvedBench;

pub use array::CoreArray;
pub use clocked::{Clocked, Direction, ResetInput, SignalInfo, TimingClass};
pub use comparator::{
    insertion_sort, ComparatorCore, ComparatorInputs, ComparatorOutputs, ComparatorState,
};
pub use error::SimError;
pub use fifo::{FifoCore, FifoInputs, FifoOutputs};
pub use testbench::{run_bench, BenchResult, ExpectationFailure, Trace, TraceRow};
pub use waveform::{VcdRecorder, WaveformRecorder};

/// High-level entry point: runs a resolved bench, optionally dumping a VCD.
///
/// When `waveform_path` is `Some`, the file is created (truncating any
/// existing file) and every port's value changes are written to it.
pub fn simulate(
    bench: &ResolvedBench,
    waveform_path: Option<&Path>,
) -> Result<BenchResult, SimError> {
    match waveform_path {
        Some(path) => {
            let file = File::create(path)?;
            let mut recorder = VcdRecorder::new(BufWriter::new(file));
            run_bench(bench, Some(&mut recorder))
        }
        None => run_bench(bench, None),
    }
}
