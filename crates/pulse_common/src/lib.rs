//! Shared foundational types used across the Pulse cycle models.
//!
//! This crate provides fixed-width data words, arbitrarily wide packed buses,
//! simulation durations with unit parsing, size limits, and common result types.

#![warn(missing_docs)]

pub mod duration;
pub mod limits;
pub mod packed;
pub mod result;
pub mod word;

pub use duration::{Duration, ParseDurationError};
pub use limits::{MAX_BENCH_TICKS, MAX_COMPARATOR_INPUTS, MAX_FIFO_DEPTH};
pub use packed::PackedBus;
pub use result::{InternalError, PulseResult};
pub use word::{Word, MAX_WORD_WIDTH};
