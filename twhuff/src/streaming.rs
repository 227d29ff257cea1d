//! Push-style codecs over caller-owned buffers.
//!
//! [`StreamingEncoder`] and [`StreamingDecoder`] implement the core
//! [`Compressor`] and [`Decompressor`] traits for callers that manage their
//! own I/O, such as packet handlers that receive one datagram at a time.

use crate::codec::{MessageState, Step, SymbolDecoder, SymbolEncoder};
use crate::dictionary::{Dictionary, Symbol};
use std::sync::Arc;
use tracing::debug;
use twhuff_core::error::{HuffmanError, Result};
use twhuff_core::traits::{
    CompressStatus, Compressor, DecompressStatus, Decompressor, FlushMode,
};

/// Streaming Huffman encoder.
///
/// With [`FlushMode::None`] or [`FlushMode::Sync`] only complete bytes are
/// emitted. [`FlushMode::Finish`] terminates the message;
/// [`FlushMode::Full`] terminates it and re-arms the encoder for another
/// message.
///
/// # Example
///
/// ```rust
/// use twhuff::StreamingEncoder;
/// use twhuff_core::Compressor;
///
/// let mut encoder = StreamingEncoder::new();
/// let compressed = encoder.compress_all(b"foo").unwrap();
/// assert_eq!(compressed, [0x74, 0xde, 0x16, 0xd9, 0x22, 0xc5, 0x0d]);
/// ```
#[derive(Debug, Clone)]
pub struct StreamingEncoder {
    dictionary: Arc<Dictionary>,
    encoder: SymbolEncoder,
    state: MessageState,
}

impl StreamingEncoder {
    /// Create an encoder using the shared default dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(Dictionary::shared())
    }

    /// Create an encoder using a custom dictionary.
    pub fn with_dictionary(dictionary: Arc<Dictionary>) -> Self {
        Self {
            dictionary,
            encoder: SymbolEncoder::default(),
            state: MessageState::Empty,
        }
    }

    /// Copy pending complete bytes into `output` starting at `produced`.
    fn drain(&mut self, output: &mut [u8], mut produced: usize) -> usize {
        while produced < output.len() {
            match self.encoder.pop_byte() {
                Some(byte) => {
                    output[produced] = byte;
                    produced += 1;
                }
                None => break,
            }
        }
        produced
    }
}

impl Default for StreamingEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for StreamingEncoder {
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)> {
        let mut produced = self.drain(output, 0);
        if self.encoder.has_pending_byte() {
            return Ok((0, produced, CompressStatus::NeedsOutput));
        }

        if self.state == MessageState::Terminated {
            if flush == FlushMode::Full {
                self.state = MessageState::Empty;
            } else if input.is_empty() {
                return Ok((0, produced, CompressStatus::Done));
            } else {
                return Err(HuffmanError::StreamFinished);
            }
        }

        let mut consumed = 0;
        for &byte in input {
            self.encoder.encode(&self.dictionary, byte as Symbol)?;
            self.state = MessageState::Open;
            consumed += 1;

            produced = self.drain(output, produced);
            if self.encoder.has_pending_byte() {
                return Ok((consumed, produced, CompressStatus::NeedsOutput));
            }
        }

        match flush {
            FlushMode::None | FlushMode::Sync => Ok((consumed, produced, CompressStatus::NeedsInput)),
            FlushMode::Full | FlushMode::Finish => {
                if self.state == MessageState::Open {
                    self.encoder.terminate(&self.dictionary)?;
                    debug!("huffman message terminated");
                    produced = self.drain(output, produced);
                }
                self.state = MessageState::Terminated;

                if !self.encoder.is_empty() {
                    return Ok((consumed, produced, CompressStatus::NeedsOutput));
                }
                if flush == FlushMode::Full {
                    self.state = MessageState::Empty;
                    return Ok((consumed, produced, CompressStatus::NeedsInput));
                }
                Ok((consumed, produced, CompressStatus::Done))
            }
        }
    }

    fn reset(&mut self) {
        self.encoder.clear();
        self.state = MessageState::Empty;
    }

    fn is_finished(&self) -> bool {
        self.state == MessageState::Terminated && self.encoder.is_empty()
    }
}

/// Streaming Huffman decoder.
///
/// Partial codes are kept between calls, so input may be split anywhere.
/// Decoding stops at end-of-stream; the consumed count then covers the
/// message through its padding.
#[derive(Debug, Clone)]
pub struct StreamingDecoder {
    dictionary: Arc<Dictionary>,
    decoder: SymbolDecoder,
    finished: bool,
    /// The padding byte after a byte-aligned terminator was not yet seen.
    pad_pending: bool,
}

impl StreamingDecoder {
    /// Create a decoder using the shared default dictionary.
    pub fn new() -> Self {
        Self::with_dictionary(Dictionary::shared())
    }

    /// Create a decoder using a custom dictionary.
    pub fn with_dictionary(dictionary: Arc<Dictionary>) -> Self {
        Self {
            dictionary,
            decoder: SymbolDecoder::default(),
            finished: false,
            pad_pending: false,
        }
    }
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decompressor for StreamingDecoder {
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        if self.finished {
            if self.pad_pending && !input.is_empty() {
                self.pad_pending = false;
                return Ok((1, 0, DecompressStatus::Done));
            }
            return Ok((0, 0, DecompressStatus::Done));
        }

        let mut src = input;
        let mut produced = 0;
        let status = loop {
            if produced == output.len() {
                break DecompressStatus::NeedsOutput;
            }
            match self.decoder.step(&self.dictionary, &mut src)? {
                Step::Symbol(byte) => {
                    output[produced] = byte;
                    produced += 1;
                }
                Step::End => {
                    self.finished = true;
                    self.pad_pending = self.decoder.skip_padding();
                    if self.pad_pending && !src.is_empty() {
                        src = &src[1..];
                        self.pad_pending = false;
                    }
                    break DecompressStatus::Done;
                }
                Step::Starved => break DecompressStatus::NeedsInput,
            }
        };

        Ok((input.len() - src.len(), produced, status))
    }

    fn reset(&mut self) {
        self.decoder = SymbolDecoder::default();
        self.finished = false;
        self.pad_pending = false;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
