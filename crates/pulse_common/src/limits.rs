//! Upper bounds on model sizes and bench lengths.
//!
//! Configuration is rejected above these limits rather than allocating
//! unbounded storage.

/// Largest FIFO depth.
pub const MAX_FIFO_DEPTH: u32 = 1 << 20;

/// Largest number of comparator inputs.
pub const MAX_COMPARATOR_INPUTS: u32 = 1 << 12;

/// Largest number of ticks in one bench, counting repeats.
pub const MAX_BENCH_TICKS: u64 = 1 << 24;
