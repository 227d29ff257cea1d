//! # twhuff: Teeworlds Huffman Codec
//!
//! This crate provides the static byte-oriented Huffman codec used by the
//! Teeworlds and DDNet network protocol, bit-for-bit compatible with the
//! game's own encoder and decoder.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Wire compatible**: Same tree, same tie-breaking, same padding
//! - **Table-driven decoding**: 10-bit lookup table, tree walk for longer codes
//! - **Streaming**: `std::io` reader/writer plus push-style codecs
//!
//! ## Format
//!
//! - **257 symbols**: byte values plus an end-of-stream symbol
//! - **LSB-first**: The first bit of a code is the lowest bit of a byte
//! - **Terminated**: Every non-empty message ends with end-of-stream,
//!   followed by one final byte holding the remaining bits and zero padding
//! - **Empty messages**: Compress to zero bytes
//!
//! ## Example
//!
//! ```rust
//! use twhuff::{compress, decompress};
//!
//! let original = b"hello world";
//!
//! let compressed = compress(original).unwrap();
//! assert_eq!(compressed.len(), 20);
//!
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use std::io::{Read, Write};
//! use twhuff::{HuffmanReader, HuffmanWriter};
//!
//! let mut writer = HuffmanWriter::new(Vec::new());
//! writer.write_all(b"ABC").unwrap();
//! writer.finish().unwrap();
//! let compressed = writer.into_inner();
//! assert_eq!(compressed, [188, 181, 98, 92, 113, 3]);
//!
//! let mut reader = HuffmanReader::new(&compressed[..]);
//! let mut out = String::new();
//! reader.read_to_string(&mut out).unwrap();
//! assert_eq!(out, "ABC");
//! ```
//!
//! ## Custom Weights
//!
//! ```rust
//! use std::sync::Arc;
//! use twhuff::{Dictionary, FrequencyTable, HuffmanCodec};
//!
//! let mut weights = [1u32; 256];
//! weights[b'a' as usize] = 1000;
//! let dictionary = Dictionary::new(&FrequencyTable::new(weights));
//! assert!(dictionary.code(u16::from(b'a')).unwrap().len < 4);
//!
//! let codec = HuffmanCodec::with_dictionary(Arc::new(dictionary));
//! let compressed = codec.compress(b"aaaa").unwrap();
//! assert_eq!(codec.decompress(&compressed).unwrap(), b"aaaa");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod codec;
mod config;
mod dictionary;
mod frequency;
mod reader;
mod streaming;
mod writer;

pub use codec::{HuffmanCodec, compress, compress_with, decompress, decompress_with};
pub use config::StreamConfig;
pub use dictionary::{
    Code, Dictionary, EOF_SYMBOL, LUT_BITS, MAX_CODE_LEN, MAX_NODES, SYMBOL_COUNT, Symbol,
};
pub use frequency::{BYTE_SYMBOLS, FrequencyTable};
pub use reader::HuffmanReader;
pub use streaming::{StreamingDecoder, StreamingEncoder};
pub use writer::HuffmanWriter;

pub use twhuff_core::error::{HuffmanError, Result};
pub use twhuff_core::traits::{
    CompressStatus, Compressor, DecompressStatus, Decompressor, FlushMode,
};
