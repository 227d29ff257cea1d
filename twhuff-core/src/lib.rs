//! # twhuff Core
//!
//! Core components for the twhuff Huffman codec.
//!
//! This crate provides the building blocks shared by the codec crate:
//!
//! - [`bitstream`]: LSB-first bit accumulators for packing and unpacking codes
//! - [`traits`]: Push-style streaming compression traits
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Adapters                                            │
//! │     Reader / Writer over std::io, push-style codecs     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Dictionary (tree + LUT), symbol encoder/decoder     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Bits (this crate)                                   │
//! │     BitAccumulator / BitPacker, errors, traits          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use twhuff_core::bitstream::{BitAccumulator, BitPacker};
//!
//! let mut packer = BitPacker::new();
//! packer.push(0b1011, 4);
//! packer.pad_final_byte();
//! let byte = packer.pop_byte().unwrap();
//!
//! let mut acc = BitAccumulator::new();
//! acc.push_byte(byte);
//! assert_eq!(acc.peek(4), 0b1011);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitAccumulator, BitPacker};
pub use error::{HuffmanError, Result};
pub use traits::{CompressStatus, Compressor, DecompressStatus, Decompressor, FlushMode};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitAccumulator, BitPacker};
    pub use crate::error::{HuffmanError, Result};
    pub use crate::traits::{
        CompressStatus, Compressor, DecompressStatus, Decompressor, FlushMode,
    };
}
