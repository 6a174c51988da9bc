//! Simulation error types.
//!
//! Illegal FIFO operations are not errors: they are observable through the
//! error pulse outputs. [`SimError`] covers misuse by the driver (inputs that
//! do not match the core's parameters) and host-side failures.

use std::io;

use pulse_common::InternalError;

/// Errors that can occur while constructing or driving a core.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A construction parameter is outside its supported range.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the rejected parameter.
        reason: String,
    },

    /// An input word does not have the core's configured width.
    #[error("signal '{signal}' expects {expected}-bit words, got {actual} bits")]
    WidthMismatch {
        /// The input port name.
        signal: String,
        /// The configured width.
        expected: u32,
        /// The width that was supplied.
        actual: u32,
    },

    /// The number of supplied items does not match what the core expects.
    #[error("expected {expected} {what}, got {actual}")]
    InputCountMismatch {
        /// What was being counted (e.g., "input words", "instance inputs").
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Supplied count.
        actual: usize,
    },

    /// A raw value does not fit in the width of the signal it drives.
    #[error("value {value:#x} does not fit signal '{signal}' ({width} bits)")]
    ValueOutOfRange {
        /// The signal name.
        signal: String,
        /// The rejected value.
        value: u64,
        /// The signal width.
        width: u32,
    },

    /// A tick's timestamp does not fit in 64-bit femtoseconds.
    #[error("tick {tick} at a {period_fs}fs clock period overflows the timeline")]
    TimeOverflow {
        /// The tick that could not be stamped.
        tick: u64,
        /// Clock period in femtoseconds.
        period_fs: u64,
    },

    /// A waveform change referenced a signal that was never registered.
    #[error("unregistered waveform signal {0}")]
    UnregisteredSignal(u32),

    /// A core's state violated one of its invariants.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_display() {
        let e = SimError::InvalidParameter {
            reason: "depth must be at least 1".into(),
        };
        assert_eq!(e.to_string(), "invalid parameter: depth must be at least 1");
    }

    #[test]
    fn width_mismatch_display() {
        let e = SimError::WidthMismatch {
            signal: "write_data".into(),
            expected: 8,
            actual: 16,
        };
        assert_eq!(
            e.to_string(),
            "signal 'write_data' expects 8-bit words, got 16 bits"
        );
    }

    #[test]
    fn input_count_display() {
        let e = SimError::InputCountMismatch {
            what: "input words",
            expected: 8,
            actual: 3,
        };
        assert_eq!(e.to_string(), "expected 8 input words, got 3");
    }

    #[test]
    fn value_out_of_range_display() {
        let e = SimError::ValueOutOfRange {
            signal: "write_data".into(),
            value: 0x100,
            width: 8,
        };
        assert_eq!(
            e.to_string(),
            "value 0x100 does not fit signal 'write_data' (8 bits)"
        );
    }

    #[test]
    fn internal_is_transparent() {
        let e: SimError = InternalError::new("count 17 exceeds depth 16").into();
        assert_eq!(
            e.to_string(),
            "internal model error: count 17 exceeds depth 16"
        );
    }

    #[test]
    fn waveform_io_display() {
        let e = SimError::WaveformIo(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(e.to_string().contains("waveform I/O error"));
    }
}
