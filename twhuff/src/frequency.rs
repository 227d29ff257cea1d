//! Symbol weights used to build a [`Dictionary`](crate::Dictionary).

use twhuff_core::error::{HuffmanError, Result};

/// Number of byte symbols carried by a frequency table.
pub const BYTE_SYMBOLS: usize = 256;

/// The Teeworlds network protocol's weight table.
///
/// It carries a 257th entry in the end-of-stream slot. The tree builder
/// always weights end-of-stream as 1, so that entry never takes effect.
/// Symbol 0 is pinned at 2^30 so it is merged last and gets a 1-bit code.
const LEGACY_WEIGHTS: [u32; BYTE_SYMBOLS + 1] = [
    1 << 30, 4545, 2657, 431, 1950, 919, 444, 482, 2244, 617, 838, 542, 715, 1814, 304, 240,
    754, 212, 647, 186, 283, 131, 146, 166, 543, 164, 167, 136, 179, 859, 363, 113,
    157, 154, 204, 108, 137, 180, 202, 176, 872, 404, 168, 134, 151, 111, 113, 109,
    120, 126, 129, 100, 41, 20, 16, 22, 18, 18, 17, 19, 16, 37, 13, 21,
    362, 166, 99, 78, 95, 88, 81, 70, 83, 284, 91, 187, 77, 68, 52, 68,
    59, 66, 61, 638, 71, 157, 50, 46, 69, 43, 11, 24, 13, 19, 10, 12,
    12, 20, 14, 9, 20, 20, 10, 10, 15, 15, 12, 12, 7, 19, 15, 14,
    13, 18, 35, 19, 17, 14, 8, 5, 15, 17, 9, 15, 14, 18, 8, 10,
    2173, 134, 157, 68, 188, 60, 170, 60, 194, 62, 175, 71, 148, 67, 167, 78,
    211, 67, 156, 69, 1674, 90, 174, 53, 147, 89, 181, 51, 174, 63, 163, 80,
    167, 94, 128, 122, 223, 153, 218, 77, 200, 110, 190, 73, 174, 69, 145, 66,
    277, 143, 141, 60, 136, 53, 180, 57, 142, 57, 158, 61, 166, 112, 152, 92,
    26, 22, 21, 28, 20, 26, 30, 21, 32, 27, 20, 17, 23, 21, 30, 22,
    22, 21, 27, 25, 17, 27, 23, 18, 39, 26, 15, 21, 12, 18, 18, 27,
    20, 18, 15, 19, 11, 17, 33, 12, 18, 15, 19, 18, 16, 26, 17, 18,
    9, 10, 25, 22, 22, 17, 20, 16, 6, 16, 15, 20, 14, 18, 24, 335,
    1517,
];

const fn byte_weights(legacy: &[u32; BYTE_SYMBOLS + 1]) -> [u32; BYTE_SYMBOLS] {
    let mut weights = [0u32; BYTE_SYMBOLS];
    let mut i = 0;
    while i < BYTE_SYMBOLS {
        weights[i] = legacy[i];
        i += 1;
    }
    weights
}

/// Weights for the 256 byte symbols.
///
/// The end-of-stream symbol is not part of the table: its weight is
/// fixed at 1 during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable([u32; BYTE_SYMBOLS]);

impl FrequencyTable {
    /// The empirically measured table of the target network protocol.
    pub const DEFAULT: Self = Self(byte_weights(&LEGACY_WEIGHTS));

    /// Create a table from 256 byte weights.
    pub const fn new(weights: [u32; BYTE_SYMBOLS]) -> Self {
        Self(weights)
    }

    /// Create a table from a slice of 256 weights, or 257 weights in the
    /// legacy layout (the trailing end-of-stream entry is ignored).
    pub fn from_slice(weights: &[u32]) -> Result<Self> {
        if weights.len() != BYTE_SYMBOLS && weights.len() != BYTE_SYMBOLS + 1 {
            return Err(HuffmanError::invalid_frequency_table(weights.len()));
        }
        let mut table = [0u32; BYTE_SYMBOLS];
        table.copy_from_slice(&weights[..BYTE_SYMBOLS]);
        Ok(Self(table))
    }

    /// Weight of a byte symbol.
    pub fn weight(&self, byte: u8) -> u32 {
        self.0[byte as usize]
    }

    /// All 256 weights.
    pub fn weights(&self) -> &[u32; BYTE_SYMBOLS] {
        &self.0
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}
