//! Fixed-width two-state data words.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The widest word a model can carry.
pub const MAX_WORD_WIDTH: u32 = 64;

/// A `width`-bit unsigned value, stored in the low bits of a `u64`.
///
/// Bits above `width` are always zero. Two words compare equal only if both
/// their widths and their values match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    width: u32,
    bits: u64,
}

impl Word {
    /// Creates the all-zero word of the given width.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or greater than [`MAX_WORD_WIDTH`].
    pub fn zero(width: u32) -> Self {
        assert_width(width);
        Self { width, bits: 0 }
    }

    /// Creates a word from a `u64`, discarding bits beyond `width`.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or greater than [`MAX_WORD_WIDTH`].
    pub fn from_u64(value: u64, width: u32) -> Self {
        assert_width(width);
        Self {
            width,
            bits: value & mask(width),
        }
    }

    /// Creates a word from a `u64`, returning `None` if the value does not
    /// fit in `width` bits or the width is unsupported.
    pub fn try_new(value: u64, width: u32) -> Option<Self> {
        if width == 0 || width > MAX_WORD_WIDTH || value & !mask(width) != 0 {
            return None;
        }
        Some(Self { width, bits: value })
    }

    /// Returns the bit width of this word.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the value as a `u64`.
    pub fn value(&self) -> u64 {
        self.bits
    }

    /// Returns true if every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.bits == 0
    }

    /// Returns the bit at `index` (0 is the least significant bit).
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn bit(&self, index: u32) -> bool {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        (self.bits >> index) & 1 != 0
    }

    /// Formats the word as a binary string, most significant bit first.
    pub fn to_binary_string(&self) -> String {
        (0..self.width)
            .rev()
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.width.div_ceil(4) as usize;
        write!(f, "0x{:0digits$x}", self.bits)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word<{}>({self})", self.width)
    }
}

/// Returns a mask of the low `width` bits.
fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn assert_width(width: u32) {
    assert!(
        (1..=MAX_WORD_WIDTH).contains(&width),
        "word width {width} outside 1..={MAX_WORD_WIDTH}"
    );
}
