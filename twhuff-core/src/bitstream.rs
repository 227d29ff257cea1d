//! Bit-level accumulators for the Huffman packing engine.
//!
//! The wire format is an LSB-first bitstream: codes are packed starting from
//! the least significant bit of each byte, and the first bit of a code lands
//! in the lowest unused bit position.
//!
//! Unlike a reader/writer pair that owns its I/O, both accumulators here are
//! plain state. Callers push bytes in and pull bytes out, so the same state
//! can live across any number of chunked I/O calls.
//!
//! # Example
//!
//! ```
//! use twhuff_core::bitstream::{BitAccumulator, BitPacker};
//!
//! let mut packer = BitPacker::new();
//! packer.push(0b101, 3);
//! packer.push(0b11001, 5);
//! assert_eq!(packer.pop_byte(), Some(0xCD));
//!
//! let mut acc = BitAccumulator::new();
//! acc.push_byte(0xCD);
//! assert_eq!(acc.peek(3), 0b101);
//! acc.consume(3);
//! assert_eq!(acc.peek(5), 0b11001);
//! ```

/// Largest number of bits a single [`BitPacker::push`] accepts.
pub const MAX_PUSH_BITS: u32 = 32;

/// Decode-side bit accumulator (LSB-first).
///
/// Bytes are appended above the bits already held; bits are peeked and
/// consumed from the bottom. Peeking never consumes, which lets a decoder
/// resolve a whole code before committing to it.
#[derive(Debug, Clone, Default)]
pub struct BitAccumulator {
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u32,
    /// Total bits consumed (for error reporting).
    total_bits_consumed: u64,
}

impl BitAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of valid bits held.
    #[inline]
    pub fn bits_available(&self) -> u32 {
        self.bits_in_buffer
    }

    /// Whether another byte fits without losing bits.
    #[inline]
    pub fn has_room(&self) -> bool {
        self.bits_in_buffer <= 56
    }

    /// Append a byte above the held bits.
    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        debug_assert!(self.has_room(), "bit accumulator overflow");
        self.buffer |= (byte as u64) << self.bits_in_buffer;
        self.bits_in_buffer += 8;
    }

    /// Peek at the low `count` bits (0-32). Bits beyond those held read as zero.
    #[inline]
    pub fn peek(&self, count: u32) -> u32 {
        debug_assert!(count <= 32, "Cannot peek more than 32 bits at once");
        let mask = (1u64 << count).wrapping_sub(1);
        (self.buffer & mask) as u32
    }

    /// The bit at `index`, counted from the next unconsumed bit.
    #[inline]
    pub fn bit_at(&self, index: u32) -> usize {
        ((self.buffer >> index) & 1) as usize
    }

    /// Drop `count` bits from the bottom.
    #[inline]
    pub fn consume(&mut self, count: u32) {
        debug_assert!(count <= self.bits_in_buffer, "consuming bits not held");
        self.buffer = self.buffer.checked_shr(count).unwrap_or(0);
        self.bits_in_buffer -= count;
        self.total_bits_consumed += count as u64;
    }

    /// Discard all held bits. The consumed-bit counter is kept.
    pub fn clear(&mut self) {
        self.buffer = 0;
        self.bits_in_buffer = 0;
    }

    /// Bit position of the next unconsumed bit.
    pub fn bit_position(&self) -> u64 {
        self.total_bits_consumed
    }
}

/// Encode-side bit packer (LSB-first).
///
/// Codes are OR-ed in above the pending bits; complete bytes are popped
/// from the bottom. Drain with [`pop_byte`](Self::pop_byte) until it returns
/// `None` before pushing the next code.
#[derive(Debug, Clone, Default)]
pub struct BitPacker {
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of pending bits.
    bits_in_buffer: u32,
    /// Total bits pushed.
    total_bits_written: u64,
}

impl BitPacker {
    /// Create an empty packer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending bits, complete bytes included.
    #[inline]
    pub fn pending_bits(&self) -> u32 {
        self.bits_in_buffer
    }

    /// Whether nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits_in_buffer == 0
    }

    /// Get the total number of bits pushed so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Append `count` bits (0-32) of `value`, first bit in the LSB.
    #[inline]
    pub fn push(&mut self, value: u32, count: u32) {
        debug_assert!(count <= MAX_PUSH_BITS, "Cannot push more than 32 bits");
        debug_assert!(self.bits_in_buffer < 32, "packer must be drained first");

        if count == 0 {
            return;
        }

        let mask = (1u64 << count) - 1;
        self.buffer |= (value as u64 & mask) << self.bits_in_buffer;
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;
    }

    /// Pop the lowest complete byte, if any.
    #[inline]
    pub fn pop_byte(&mut self) -> Option<u8> {
        if self.bits_in_buffer < 8 {
            return None;
        }
        let byte = (self.buffer & 0xFF) as u8;
        self.buffer >>= 8;
        self.bits_in_buffer -= 8;
        Some(byte)
    }

    /// Zero-pad the pending bits out to a whole trailing byte.
    ///
    /// The trailing byte is always produced, even when the pending bits are
    /// already byte-aligned: a message closes with one byte holding whatever
    /// remains after its last code.
    pub fn pad_final_byte(&mut self) {
        let padding = 8 - (self.bits_in_buffer % 8);
        self.bits_in_buffer += padding;
        self.total_bits_written += padding as u64;
    }

    /// Discard all pending bits.
    pub fn clear(&mut self) {
        self.buffer = 0;
        self.bits_in_buffer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(packer: &mut BitPacker) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(byte) = packer.pop_byte() {
            out.push(byte);
        }
        out
    }

    #[test]
    fn test_accumulator_lsb_first() {
        // 0b10110101 = 0xB5
        let mut acc = BitAccumulator::new();
        acc.push_byte(0xB5);

        let mut bits = Vec::new();
        for _ in 0..8 {
            bits.push(acc.peek(1));
            acc.consume(1);
        }
        assert_eq!(bits, vec![1, 0, 1, 0, 1, 1, 0, 1]);
        assert_eq!(acc.bits_available(), 0);
        assert_eq!(acc.bit_position(), 8);
    }

    #[test]
    fn test_accumulator_crosses_bytes() {
        let mut acc = BitAccumulator::new();
        acc.push_byte(0xFF);
        acc.push_byte(0x00);

        assert_eq!(acc.peek(4), 0xF);
        acc.consume(4);
        assert_eq!(acc.peek(8), 0x0F);
        assert_eq!(acc.bit_at(3), 1);
        assert_eq!(acc.bit_at(4), 0);
    }

    #[test]
    fn test_accumulator_peek_beyond_held_reads_zero() {
        let mut acc = BitAccumulator::new();
        acc.push_byte(0xAB);
        assert_eq!(acc.peek(10), 0xAB);
        assert_eq!(acc.peek(4), 0xB);
    }

    #[test]
    fn test_accumulator_clear_keeps_position() {
        let mut acc = BitAccumulator::new();
        acc.push_byte(0x12);
        acc.consume(5);
        acc.clear();
        assert_eq!(acc.bits_available(), 0);
        assert_eq!(acc.bit_position(), 5);
    }

    #[test]
    fn test_packer_multi_bits() {
        let mut packer = BitPacker::new();
        packer.push(0b101, 3);
        packer.push(0b11001, 5);
        // 3 bits: 101, 5 bits: 11001 -> 11001_101 = 0xCD
        assert_eq!(drain(&mut packer), vec![0xCD]);
        assert!(packer.is_empty());
    }

    #[test]
    fn test_packer_masks_excess_bits() {
        let mut packer = BitPacker::new();
        packer.push(0xFFFF_FFFF, 4);
        packer.push(0, 4);
        assert_eq!(drain(&mut packer), vec![0x0F]);
    }

    #[test]
    fn test_packer_full_width_push() {
        let mut packer = BitPacker::new();
        packer.push(0b1, 1);
        packer.push(0x8000_0001, 32);
        packer.pad_final_byte();
        assert_eq!(drain(&mut packer), vec![0x03, 0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_pad_final_byte_always_emits() {
        let mut packer = BitPacker::new();
        packer.push(0xAB, 8);
        assert_eq!(drain(&mut packer), vec![0xAB]);

        // Aligned: still one trailing zero byte.
        packer.pad_final_byte();
        assert_eq!(drain(&mut packer), vec![0x00]);

        packer.push(0b11, 2);
        packer.pad_final_byte();
        assert_eq!(drain(&mut packer), vec![0x03]);
        assert_eq!(packer.bits_written(), 24);
    }

    #[test]
    fn test_roundtrip() {
        let mut packer = BitPacker::new();
        let mut bytes = Vec::new();
        for (value, count) in [(0b101, 3), (0b1111, 4), (0b10, 2), (0b110011, 6)] {
            packer.push(value, count);
            bytes.extend(drain(&mut packer));
        }
        packer.pad_final_byte();
        bytes.extend(drain(&mut packer));

        let mut acc = BitAccumulator::new();
        for byte in bytes {
            acc.push_byte(byte);
        }
        for (value, count) in [(0b101, 3), (0b1111, 4), (0b10, 2), (0b110011, 6)] {
            assert_eq!(acc.peek(count), value);
            acc.consume(count);
        }
    }
}
