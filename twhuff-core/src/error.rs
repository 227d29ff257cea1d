//! Error types for twhuff operations.
//!
//! A single error enum covers dictionary construction, encoding, decoding,
//! and the I/O performed by the streaming adapters.

use std::io;
use thiserror::Error;

/// The main error type for twhuff operations.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// I/O error from the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The current bits do not resolve to any code in the dictionary.
    #[error("Corrupt stream: no code matches bits {bits:#x} at bit position {position}")]
    CorruptStream {
        /// The bit window that failed to resolve.
        bits: u32,
        /// Bit position where the unresolved code starts.
        position: u64,
    },

    /// The input ended before the end-of-stream symbol was decoded.
    #[error("Truncated stream: input exhausted at bit position {position} before end-of-stream")]
    TruncatedStream {
        /// Bit position where decoding ran out of input.
        position: u64,
    },

    /// A symbol's code does not fit the bit packer.
    #[error("Code for symbol {symbol} is {length} bits long, limit is {max}")]
    CodeTooLong {
        /// The symbol being encoded.
        symbol: u16,
        /// Its code length in bits.
        length: u16,
        /// Largest code length the packer accepts.
        max: u16,
    },

    /// A frequency table with the wrong number of entries.
    #[error("Invalid frequency table: expected 256 or 257 weights, got {len}")]
    InvalidFrequencyTable {
        /// Number of weights supplied.
        len: usize,
    },

    /// Data was appended after the message terminator was written.
    #[error("Stream already finished: start a new message before writing more data")]
    StreamFinished,

    /// The sink rejected a write; `accepted` input bytes were already encoded.
    #[error("Sink write failed after accepting {accepted} input bytes: {source}")]
    SinkWrite {
        /// Input bytes consumed before the failure.
        accepted: usize,
        /// The sink's error.
        #[source]
        source: io::Error,
    },
}

/// Result type alias for twhuff operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;

impl HuffmanError {
    /// Create a corrupt stream error.
    pub fn corrupt(bits: u32, position: u64) -> Self {
        Self::CorruptStream { bits, position }
    }

    /// Create a truncated stream error.
    pub fn truncated(position: u64) -> Self {
        Self::TruncatedStream { position }
    }

    /// Create a code-too-long error.
    pub fn code_too_long(symbol: u16, length: u16, max: u16) -> Self {
        Self::CodeTooLong {
            symbol,
            length,
            max,
        }
    }

    /// Create an invalid frequency table error.
    pub fn invalid_frequency_table(len: usize) -> Self {
        Self::InvalidFrequencyTable { len }
    }

    /// Create a sink write error.
    pub fn sink_write(accepted: usize, source: io::Error) -> Self {
        Self::SinkWrite { accepted, source }
    }

    /// Whether this error means the compressed data itself is bad.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::CorruptStream { .. } | Self::TruncatedStream { .. }
        )
    }
}

impl From<HuffmanError> for io::Error {
    fn from(err: HuffmanError) -> Self {
        match err {
            HuffmanError::Io(e) => e,
            HuffmanError::SinkWrite { source, .. } => source,
            HuffmanError::TruncatedStream { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            HuffmanError::StreamFinished => io::Error::new(io::ErrorKind::InvalidInput, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
