//! Simulation durations with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = FS_PER_MS * 1_000;

/// A span of simulated time stored in femtoseconds.
///
/// Parses from strings like "10ns", "500 ps" or "1us". A unit is required.
/// Displays using the largest unit that divides the value exactly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Duration(u64);

impl Duration {
    /// Creates a duration from femtoseconds.
    pub fn from_fs(fs: u64) -> Self {
        Self(fs)
    }

    /// Creates a duration from nanoseconds.
    pub fn from_ns(ns: u64) -> Self {
        Self(ns * FS_PER_NS)
    }

    /// Returns the duration in femtoseconds.
    pub fn as_fs(&self) -> u64 {
        self.0
    }

    /// Returns true for the zero duration.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::from_ns(10)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({self})")
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.0;
        let units = [
            (FS_PER_S, "s"),
            (FS_PER_MS, "ms"),
            (FS_PER_US, "us"),
            (FS_PER_NS, "ns"),
            (FS_PER_PS, "ps"),
        ];
        for (scale, unit) in units {
            if fs >= scale && fs % scale == 0 {
                return write!(f, "{}{unit}", fs / scale);
            }
        }
        write!(f, "{fs}fs")
    }
}

/// Error type for parsing duration strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration '{input}': {reason}")]
pub struct ParseDurationError {
    /// The input string that failed to parse.
    pub input: String,
    /// What was wrong with it.
    pub reason: String,
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = |reason: &str| ParseDurationError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        if digit_end == 0 {
            return Err(err("no numeric value"));
        }
        let number: u64 = s[..digit_end].parse().map_err(|_| err("bad number"))?;

        let multiplier = match s[digit_end..].trim() {
            "fs" => 1,
            "ps" => FS_PER_PS,
            "ns" => FS_PER_NS,
            "us" => FS_PER_US,
            "ms" => FS_PER_MS,
            "s" => FS_PER_S,
            "" => return Err(err("missing unit (use fs, ps, ns, us, ms, or s)")),
            _ => return Err(err("unknown unit (use fs, ps, ns, us, ms, or s)")),
        };

        number
            .checked_mul(multiplier)
            .map(Duration)
            .ok_or_else(|| err("overflows 64-bit femtoseconds"))
    }
}
