//! Pull-style decoder over a buffered byte source.

use crate::codec::{Step, SymbolDecoder, next_byte};
use crate::config::StreamConfig;
use crate::dictionary::Dictionary;
use std::io::{self, BufRead, BufReader, Read};
use std::mem;
use std::sync::Arc;
use tracing::debug;
use twhuff_core::error::{HuffmanError, Result};
use twhuff_core::traits::DecompressStatus;

/// Decompressing reader.
///
/// Bytes are pulled from the source only as far as the current code needs,
/// so the source is left positioned just past a message once its
/// end-of-stream symbol has been decoded. Partial codes are kept between
/// calls, which makes reads of any size (one byte included) produce the
/// same output as [`decompress`](crate::decompress).
///
/// # Example
///
/// ```rust
/// use std::io::Read;
/// use twhuff::HuffmanReader;
///
/// let compressed = twhuff::compress(b"hello world").unwrap();
/// let mut reader = HuffmanReader::new(&compressed[..]);
///
/// let mut out = Vec::new();
/// reader.read_to_end(&mut out).unwrap();
/// assert_eq!(out, b"hello world");
/// ```
#[derive(Debug)]
pub struct HuffmanReader<R> {
    inner: R,
    dictionary: Arc<Dictionary>,
    decoder: SymbolDecoder,
    /// Symbols produced for the current message.
    message_len: u64,
    finished: bool,
    /// The terminator ended byte-aligned and its padding byte is unread.
    pad_pending: bool,
    /// Error hit after output was already returned; reported next call.
    deferred: Option<HuffmanError>,
}

impl<R: BufRead> HuffmanReader<R> {
    /// Create a reader using the shared default dictionary.
    pub fn new(inner: R) -> Self {
        Self::with_dictionary(inner, Dictionary::shared())
    }

    /// Create a reader using a custom dictionary.
    pub fn with_dictionary(inner: R, dictionary: Arc<Dictionary>) -> Self {
        Self {
            inner,
            dictionary,
            decoder: SymbolDecoder::default(),
            message_len: 0,
            finished: false,
            pad_pending: false,
            deferred: None,
        }
    }

    /// Decode into `output`.
    ///
    /// Returns the number of bytes written and why decoding stopped:
    ///
    /// - [`Done`](DecompressStatus::Done): end-of-stream reached. Later calls
    ///   return `(0, Done)` until [`next_message`](Self::next_message).
    /// - [`NeedsOutput`](DecompressStatus::NeedsOutput): `output` is full.
    /// - [`NeedsInput`](DecompressStatus::NeedsInput): the source is exhausted
    ///   on a message boundary before any symbol was decoded.
    ///
    /// A source that runs dry mid-message is [`TruncatedStream`]. When an
    /// error strikes after some bytes were already decoded in this call,
    /// those bytes are returned first and the error surfaces on the next call.
    ///
    /// [`TruncatedStream`]: HuffmanError::TruncatedStream
    pub fn decode_into(&mut self, output: &mut [u8]) -> Result<(usize, DecompressStatus)> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        if self.finished {
            return Ok((0, DecompressStatus::Done));
        }

        let mut produced = 0;
        while produced < output.len() {
            let err = match self.decoder.step(&self.dictionary, &mut self.inner) {
                Ok(Step::Symbol(byte)) => {
                    output[produced] = byte;
                    produced += 1;
                    self.message_len += 1;
                    continue;
                }
                Ok(Step::End) => {
                    self.finished = true;
                    self.pad_pending = self.decoder.skip_padding();
                    debug!(bytes = self.message_len, "huffman message decoded");
                    return Ok((produced, DecompressStatus::Done));
                }
                Ok(Step::Starved) => {
                    if self.message_len == 0 && self.decoder.bits_available() == 0 {
                        return Ok((produced, DecompressStatus::NeedsInput));
                    }
                    HuffmanError::truncated(self.decoder.bit_position())
                }
                Err(err) => err,
            };

            if produced == 0 {
                return Err(err);
            }
            debug!(error = %err, produced, "deferring decode error");
            self.deferred = Some(err);
            return Ok((produced, DecompressStatus::NeedsInput));
        }

        Ok((produced, DecompressStatus::NeedsOutput))
    }

    /// Prepare to decode the next message from the same source.
    ///
    /// A message that was not read to its end is abandoned.
    pub fn next_message(&mut self) -> Result<()> {
        if self.pad_pending {
            next_byte(&mut self.inner)?;
            self.pad_pending = false;
        }
        if !self.finished {
            self.decoder.clear();
        }
        self.finished = false;
        self.message_len = 0;
        self.deferred = None;
        Ok(())
    }

    /// Swap in a new source, discarding all decoding state. Returns the
    /// previous source.
    pub fn reset(&mut self, inner: R) -> R {
        self.decoder = SymbolDecoder::default();
        self.message_len = 0;
        self.finished = false;
        self.pad_pending = false;
        self.deferred = None;
        debug!("huffman reader reset");
        mem::replace(&mut self.inner, inner)
    }

    /// Whether the current message's end-of-stream has been decoded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The dictionary in use.
    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Get a reference to the source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a mutable reference to the source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader, returning the source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> HuffmanReader<BufReader<R>> {
    /// Wrap an unbuffered source in a `BufReader` sized by `config`.
    pub fn buffered(inner: R, config: &StreamConfig) -> Self {
        Self::new(BufReader::with_capacity(config.read_buffer_size, inner))
    }
}

impl<R: BufRead> Read for HuffmanReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let (n, _) = self.decode_into(buf)?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress;

    fn read_chunked<R: BufRead>(reader: &mut HuffmanReader<R>, chunk: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; chunk];
        let mut out = Vec::new();
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    #[test]
    fn test_every_chunk_size_matches_oneshot() {
        let data = b"hello world, hello teeworlds";
        let compressed = compress(data).unwrap();
        for chunk in 1..=data.len() + 1 {
            let mut reader = HuffmanReader::new(&compressed[..]);
            assert_eq!(read_chunked(&mut reader, chunk).unwrap(), data, "chunk {chunk}");
        }
    }

    #[test]
    fn test_one_byte_source_buffer() {
        let compressed = compress(b"ABC").unwrap();
        let config = StreamConfig::new().with_read_buffer_size(1);
        let mut reader = HuffmanReader::buffered(&compressed[..], &config);
        assert_eq!(read_chunked(&mut reader, 2).unwrap(), b"ABC");
    }

    #[test]
    fn test_decode_into_statuses() {
        let compressed = compress(b"foo").unwrap();
        let mut reader = HuffmanReader::new(&compressed[..]);

        let mut buf = [0u8; 2];
        assert_eq!(reader.decode_into(&mut buf).unwrap(), (2, DecompressStatus::NeedsOutput));
        assert_eq!(&buf, b"fo");
        assert_eq!(reader.decode_into(&mut buf).unwrap(), (1, DecompressStatus::Done));
        assert_eq!(buf[0], b'o');
        assert!(reader.is_finished());
        assert_eq!(reader.decode_into(&mut buf).unwrap(), (0, DecompressStatus::Done));
    }

    #[test]
    fn test_empty_source_is_clean_end() {
        let mut reader = HuffmanReader::new(&[][..]);
        let mut buf = [0u8; 8];
        assert_eq!(reader.decode_into(&mut buf).unwrap(), (0, DecompressStatus::NeedsInput));
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_source_consumed_exactly_through_message() {
        let compressed = compress(b"hello world").unwrap();
        let mut source = compressed.clone();
        source.extend_from_slice(b"tail");

        let mut reader = HuffmanReader::new(&source[..]);
        assert_eq!(read_chunked(&mut reader, 3).unwrap(), b"hello world");
        assert_eq!(reader.into_inner(), b"tail");
    }

    #[test]
    fn test_truncated_error_is_deferred() {
        let compressed = compress(b"hello world").unwrap();
        let truncated = &compressed[..compressed.len() - 1];
        let mut reader = HuffmanReader::new(truncated);

        let mut buf = [0u8; 64];
        let (n, status) = reader.decode_into(&mut buf).unwrap();
        assert!(n > 0);
        assert_eq!(status, DecompressStatus::NeedsInput);
        assert_eq!(&buf[..n], &b"hello world"[..n]);

        let err = reader.decode_into(&mut buf).unwrap_err();
        assert!(matches!(err, HuffmanError::TruncatedStream { .. }));
    }

    #[test]
    fn test_truncated_maps_to_unexpected_eof() {
        let mut reader = HuffmanReader::new(&[0xFFu8][..]);
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(out, [0u8; 8]);
    }

    #[test]
    fn test_next_message_on_same_source() {
        let mut source = compress(b"foo").unwrap();
        source.extend(compress(b"bar").unwrap());
        source.extend(compress(b"hello world").unwrap());

        let mut reader = HuffmanReader::new(&source[..]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"foo");

        for expected in [&b"bar"[..], b"hello world"] {
            reader.next_message().unwrap();
            out.clear();
            reader.read_to_end(&mut out).unwrap();
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_next_message_skips_aligned_padding_byte() {
        // The terminator of "ab" ends on a byte boundary, so a whole zero
        // byte of padding follows it.
        let mut source = compress(b"ab").unwrap();
        assert_eq!(source, [0x1c, 0x65, 0x8b, 0x15, 0x37, 0x00]);
        source.extend(compress(b"foo").unwrap());

        let mut reader = HuffmanReader::new(&source[..]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ab");
        assert_eq!(reader.get_ref().len(), 8);

        reader.next_message().unwrap();
        out.clear();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"foo");
        assert!(reader.get_ref().is_empty());
    }

    #[test]
    fn test_reset_returns_previous_source() {
        let first = compress(b"first").unwrap();
        let second = compress(b"second").unwrap();

        let mut reader = HuffmanReader::new(&first[..2]);
        let mut buf = [0u8; 1];
        reader.read(&mut buf).unwrap();

        let old = reader.reset(&second[..]);
        assert!(old.len() <= 2);

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"second");
    }
}
