//! Bit-packing engine shared by the one-shot and streaming paths.
//!
//! [`SymbolEncoder`] and [`SymbolDecoder`] hold the only mutable state a
//! codec needs (the partial-bit accumulators). The one-shot functions,
//! [`HuffmanReader`](crate::HuffmanReader), [`HuffmanWriter`](crate::HuffmanWriter)
//! and the push-style codecs all drive the same two types, so every path
//! produces identical bits.

use crate::dictionary::{Dictionary, EOF_SYMBOL, LUT_BITS, MAX_CODE_LEN, Symbol};
use std::io::{self, BufRead};
use std::sync::Arc;
use twhuff_core::bitstream::{BitAccumulator, BitPacker};
use twhuff_core::error::{HuffmanError, Result};

/// Lifecycle of the message an encoder is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum MessageState {
    /// No symbol written yet; terminating emits nothing.
    #[default]
    Empty,
    /// At least one symbol written.
    Open,
    /// End-of-stream and padding emitted.
    Terminated,
}

/// Packs symbol codes into bytes.
#[derive(Debug, Clone, Default)]
pub(crate) struct SymbolEncoder {
    packer: BitPacker,
}

impl SymbolEncoder {
    /// Append one symbol's code. The packer must hold fewer than 8 bits.
    pub(crate) fn encode(&mut self, dict: &Dictionary, symbol: Symbol) -> Result<()> {
        let code = dict.code_of(symbol);
        if code.len as u32 > MAX_CODE_LEN {
            return Err(HuffmanError::code_too_long(
                symbol,
                code.len,
                MAX_CODE_LEN as u16,
            ));
        }
        self.packer.push(code.bits, code.len as u32);
        Ok(())
    }

    /// Append end-of-stream and pad out the trailing byte.
    pub(crate) fn terminate(&mut self, dict: &Dictionary) -> Result<()> {
        self.encode(dict, EOF_SYMBOL)?;
        self.packer.pad_final_byte();
        Ok(())
    }

    #[inline]
    pub(crate) fn pop_byte(&mut self) -> Option<u8> {
        self.packer.pop_byte()
    }

    pub(crate) fn drain_into(&mut self, out: &mut Vec<u8>) {
        while let Some(byte) = self.packer.pop_byte() {
            out.push(byte);
        }
    }

    /// Whether a complete byte is waiting to be popped.
    pub(crate) fn has_pending_byte(&self) -> bool {
        self.packer.pending_bits() >= 8
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.packer.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.packer.clear();
    }
}

/// Outcome of one decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// A byte symbol was decoded.
    Symbol(u8),
    /// The end-of-stream symbol was decoded.
    End,
    /// The source ran dry before a full code was available. No bits were
    /// consumed; calling again once more input exists resumes cleanly.
    Starved,
}

/// Pull one byte from a buffered source.
pub(crate) fn next_byte<R: BufRead>(src: &mut R) -> io::Result<Option<u8>> {
    let byte = match src.fill_buf()?.first() {
        Some(&byte) => byte,
        None => return Ok(None),
    };
    src.consume(1);
    Ok(Some(byte))
}

/// Resolves codes from a bitstream.
///
/// Bytes are pulled from the source only when the current code needs them,
/// and bits are consumed only once a whole code has been resolved.
#[derive(Debug, Clone, Default)]
pub(crate) struct SymbolDecoder {
    acc: BitAccumulator,
}

impl SymbolDecoder {
    /// Pull bytes until `want` bits are held. `false` if the source ran dry.
    fn fill<R: BufRead>(&mut self, src: &mut R, want: u32) -> Result<bool> {
        while self.acc.bits_available() < want {
            match next_byte(src)? {
                Some(byte) => self.acc.push_byte(byte),
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Decode the next symbol.
    pub(crate) fn step<R: BufRead>(&mut self, dict: &Dictionary, src: &mut R) -> Result<Step> {
        // The lookup window grows one byte at a time, so no byte is pulled
        // past the one that completes the code.
        let mut id = loop {
            let available = self.acc.bits_available();
            if available > 0 {
                // Missing high bits read as zero; a leaf found within the held
                // bits does not depend on them.
                let window = self.acc.peek(LUT_BITS);
                let found = dict.lookup(window);
                if let Some((symbol, len)) = found.and_then(|id| dict.leaf(id)) {
                    if len <= available {
                        return Ok(self.resolve(symbol, len));
                    }
                } else if available >= LUT_BITS {
                    break found
                        .ok_or_else(|| HuffmanError::corrupt(window, self.acc.bit_position()))?;
                }
            }
            match next_byte(src)? {
                Some(byte) => self.acc.push_byte(byte),
                None => return Ok(Step::Starved),
            }
        };

        let mut depth = LUT_BITS;
        let (symbol, len) = loop {
            if depth >= MAX_CODE_LEN {
                return Err(HuffmanError::corrupt(
                    self.acc.peek(MAX_CODE_LEN),
                    self.acc.bit_position(),
                ));
            }
            if depth >= self.acc.bits_available() && !self.fill(src, depth + 1)? {
                return Ok(Step::Starved);
            }

            id = dict.child(id, self.acc.bit_at(depth)).ok_or_else(|| {
                HuffmanError::corrupt(self.acc.peek(depth), self.acc.bit_position())
            })?;
            depth += 1;

            if let Some(leaf) = dict.leaf(id) {
                break leaf;
            }
        };
        Ok(self.resolve(symbol, len))
    }

    /// Consume a resolved code of `len` bits.
    fn resolve(&mut self, symbol: Symbol, len: u32) -> Step {
        self.acc.consume(len);
        if symbol == EOF_SYMBOL {
            Step::End
        } else {
            Step::Symbol(symbol as u8)
        }
    }

    /// Drop the padding after an end-of-stream code.
    ///
    /// Returns `true` when the padding is a whole byte still in the source
    /// (the terminator ended on a byte boundary).
    pub(crate) fn skip_padding(&mut self) -> bool {
        let padding = self.acc.bits_available() % 8;
        self.acc.consume(padding);
        if padding > 0 {
            return false;
        }
        if self.acc.bits_available() >= 8 {
            self.acc.consume(8);
            return false;
        }
        true
    }

    pub(crate) fn bits_available(&self) -> u32 {
        self.acc.bits_available()
    }

    pub(crate) fn bit_position(&self) -> u64 {
        self.acc.bit_position()
    }

    pub(crate) fn clear(&mut self) {
        self.acc.clear();
    }
}

/// Compress `data` with the default dictionary.
///
/// Empty input compresses to empty output.
///
/// # Example
///
/// ```rust
/// let compressed = twhuff::compress(b"hello world").unwrap();
/// assert_eq!(
///     compressed,
///     [174, 149, 19, 92, 9, 87, 194, 22, 177, 86, 220, 218, 34, 56, 185, 18, 156, 168, 184, 1]
/// );
/// ```
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with(&Dictionary::shared(), data)
}

/// Decompress a complete message with the default dictionary.
///
/// # Example
///
/// ```rust
/// let data = twhuff::decompress(&[188, 181, 98, 92, 113, 3]).unwrap();
/// assert_eq!(data, b"ABC");
/// ```
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    decompress_with(&Dictionary::shared(), data)
}

/// Compress `data` with an explicit dictionary.
pub fn compress_with(dict: &Dictionary, data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() + 4);
    if data.is_empty() {
        return Ok(output);
    }

    let mut encoder = SymbolEncoder::default();
    for &byte in data {
        encoder.encode(dict, byte as Symbol)?;
        encoder.drain_into(&mut output);
    }
    encoder.terminate(dict)?;
    encoder.drain_into(&mut output);

    Ok(output)
}

/// Decompress a complete message with an explicit dictionary.
///
/// Decoding stops at the end-of-stream symbol; anything after it is
/// ignored. Input that ends before end-of-stream is an error.
pub fn decompress_with(dict: &Dictionary, data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(data.len() * 2);
    if data.is_empty() {
        return Ok(output);
    }

    let mut src = data;
    let mut decoder = SymbolDecoder::default();
    loop {
        match decoder.step(dict, &mut src)? {
            Step::Symbol(byte) => output.push(byte),
            Step::End => return Ok(output),
            Step::Starved => return Err(HuffmanError::truncated(decoder.bit_position())),
        }
    }
}

/// A dictionary bundled with one-shot compress/decompress.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    dictionary: Arc<Dictionary>,
}

impl HuffmanCodec {
    /// Create a codec over the shared default dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(Dictionary::shared())
    }

    /// Create a codec over a custom dictionary.
    pub fn with_dictionary(dictionary: Arc<Dictionary>) -> Self {
        Self { dictionary }
    }

    /// The dictionary in use.
    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Compress `data`.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        compress_with(&self.dictionary, data)
    }

    /// Decompress a complete message.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        decompress_with(&self.dictionary, data)
    }
}

impl Default for HuffmanCodec {
    fn default() -> Self {
        Self::new()
    }
}
