//! Packed two-state buses of arbitrary width.
//!
//! A [`PackedBus`] is how a flat input port wider than one [`Word`] is carried,
//! for example the comparator's `N·W`-bit input vector, which is split into
//! `N` equal-width fields with field 0 in the least-significant bits.

use crate::word::{Word, MAX_WORD_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits packed per u64 storage word.
const BITS_PER_WORD: u32 = 64;

/// A vector of two-state bits packed 64 per `u64`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedBus {
    width: u32,
    /// Packed storage, least-significant storage word first.
    data: Vec<u64>,
}

impl PackedBus {
    /// Creates a new all-zero bus of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            data: vec![0; storage_len(width)],
        }
    }

    /// Returns the number of bits on this bus.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Gets the bit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> bool {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / BITS_PER_WORD) as usize;
        (self.data[word_idx] >> (index % BITS_PER_WORD)) & 1 != 0
    }

    /// Sets the bit at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: bool) {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / BITS_PER_WORD) as usize;
        let bit = 1u64 << (index % BITS_PER_WORD);
        if value {
            self.data[word_idx] |= bit;
        } else {
            self.data[word_idx] &= !bit;
        }
    }

    /// Concatenates words into a bus, the first word occupying the
    /// least-significant bits.
    pub fn from_words(words: &[Word]) -> Self {
        let width = words.iter().map(Word::width).sum();
        let mut bus = Self::new(width);
        let mut offset = 0;
        for word in words {
            for i in 0..word.width() {
                if word.bit(i) {
                    bus.set(offset + i, true);
                }
            }
            offset += word.width();
        }
        bus
    }

    /// Extracts field `index` of `field_width` bits, field 0 being the
    /// least-significant. Returns `None` if the field lies outside the bus or
    /// the field width is not a valid word width.
    pub fn field(&self, index: u32, field_width: u32) -> Option<Word> {
        if field_width == 0 || field_width > MAX_WORD_WIDTH {
            return None;
        }
        let lo = index.checked_mul(field_width)?;
        if lo.checked_add(field_width)? > self.width {
            return None;
        }
        let mut value = 0u64;
        for i in 0..field_width {
            if self.get(lo + i) {
                value |= 1 << i;
            }
        }
        Some(Word::from_u64(value, field_width))
    }

    /// Splits the bus into `count` equal-width fields, or `None` if the bus
    /// width is not exactly `count * field_width`.
    pub fn split(&self, count: u32, field_width: u32) -> Option<Vec<Word>> {
        if count.checked_mul(field_width)? != self.width {
            return None;
        }
        (0..count).map(|i| self.field(i, field_width)).collect()
    }

    /// Parses a hex string into a bus exactly `width` bits wide.
    ///
    /// The rightmost digit holds the least-significant nibble. Digits beyond
    /// `width` must be zero. An optional `0x` prefix and `_` separators are
    /// accepted.
    pub fn from_hex_str(s: &str, width: u32) -> Option<Self> {
        let digits = s.trim().trim_start_matches("0x").trim_start_matches("0X");
        let mut bus = Self::new(width);
        for (hex_idx, c) in digits.chars().rev().filter(|c| *c != '_').enumerate() {
            let nibble = c.to_digit(16)?;
            for bit in 0..4 {
                if nibble & (1 << bit) == 0 {
                    continue;
                }
                let index = (hex_idx as u32) * 4 + bit;
                if index >= width {
                    return None;
                }
                bus.set(index, true);
            }
        }
        Some(bus)
    }
}

impl fmt::Display for PackedBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", if self.get(i) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl fmt::Debug for PackedBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedBus({self})")
    }
}

/// Returns the number of u64 words needed to store `width` bits.
fn storage_len(width: u32) -> usize {
    width.div_ceil(BITS_PER_WORD) as usize
}
