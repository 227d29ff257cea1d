//! Push-style encoder over a byte sink.

use crate::codec::{MessageState, SymbolEncoder};
use crate::config::StreamConfig;
use crate::dictionary::{Dictionary, Symbol};
use std::io::{self, Write};
use std::mem;
use std::sync::Arc;
use tracing::{debug, trace};
use twhuff_core::error::{HuffmanError, Result};

/// Compressing writer.
///
/// Bytes are encoded as they arrive. Complete output bytes collect in an
/// internal buffer that is handed to the sink whenever it fills up. A
/// message is only terminated by [`finish`](Self::finish); dropping the
/// writer or calling [`flush`](Write::flush) does not emit end-of-stream.
///
/// # Example
///
/// ```rust
/// use twhuff::HuffmanWriter;
///
/// let mut writer = HuffmanWriter::new(Vec::new());
/// writer.append(b"hello ").unwrap();
/// writer.append(b"world").unwrap();
/// writer.finish().unwrap();
///
/// assert_eq!(writer.into_inner(), twhuff::compress(b"hello world").unwrap());
/// ```
#[derive(Debug)]
pub struct HuffmanWriter<W: Write> {
    inner: W,
    dictionary: Arc<Dictionary>,
    encoder: SymbolEncoder,
    buf: Vec<u8>,
    capacity: usize,
    state: MessageState,
}

impl<W: Write> HuffmanWriter<W> {
    /// Create a writer using the shared default dictionary.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, Dictionary::shared(), &StreamConfig::DEFAULT)
    }

    /// Create a writer using a custom dictionary.
    pub fn with_dictionary(inner: W, dictionary: Arc<Dictionary>) -> Self {
        Self::with_config(inner, dictionary, &StreamConfig::DEFAULT)
    }

    /// Create a writer with a custom dictionary and buffer size.
    pub fn with_config(inner: W, dictionary: Arc<Dictionary>, config: &StreamConfig) -> Self {
        let capacity = config.write_buffer_size.max(1);
        Self {
            inner,
            dictionary,
            encoder: SymbolEncoder::default(),
            buf: Vec::with_capacity(capacity),
            capacity,
            state: MessageState::Empty,
        }
    }

    /// Encode `data` into the current message.
    ///
    /// Returns `data.len()` on success. If the sink fails part-way, the
    /// error is [`SinkWrite`](HuffmanError::SinkWrite) carrying how many
    /// input bytes were accepted; their bits stay buffered and go out with
    /// the next successful write.
    pub fn append(&mut self, data: &[u8]) -> Result<usize> {
        if self.state == MessageState::Terminated {
            return Err(HuffmanError::StreamFinished);
        }
        self.drain_pending()
            .map_err(|err| HuffmanError::sink_write(0, err))?;

        for (i, &byte) in data.iter().enumerate() {
            self.encoder.encode(&self.dictionary, byte as Symbol)?;
            self.state = MessageState::Open;
            self.drain_pending()
                .map_err(|err| HuffmanError::sink_write(i + 1, err))?;
        }

        Ok(data.len())
    }

    /// Terminate the current message and flush everything to the sink.
    ///
    /// Emits end-of-stream plus padding if at least one byte was appended;
    /// an empty message emits nothing. Calling it again is a no-op apart
    /// from retrying a previously failed flush.
    pub fn finish(&mut self) -> Result<()> {
        self.drain_pending()?;
        match self.state {
            MessageState::Open => {
                self.encoder.terminate(&self.dictionary)?;
                self.state = MessageState::Terminated;
                debug!("huffman message terminated");
            }
            MessageState::Empty => self.state = MessageState::Terminated,
            MessageState::Terminated => {}
        }
        self.drain_pending()?;
        self.flush_buf()?;
        Ok(())
    }

    /// Finish the current message and start a new one on the same sink.
    pub fn next_message(&mut self) -> Result<()> {
        self.finish()?;
        self.state = MessageState::Empty;
        Ok(())
    }

    /// Swap in a new sink, discarding buffered output and encoder state.
    /// Returns the previous sink.
    pub fn reset(&mut self, inner: W) -> W {
        self.buf.clear();
        self.encoder.clear();
        self.state = MessageState::Empty;
        debug!("huffman writer reset");
        mem::replace(&mut self.inner, inner)
    }

    /// Whether the current message has been terminated.
    pub fn is_finished(&self) -> bool {
        self.state == MessageState::Terminated
    }

    /// The dictionary in use.
    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dictionary
    }

    /// Get a reference to the sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Get a mutable reference to the sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer, returning the sink. Unflushed output is lost.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Move complete bytes from the encoder into the buffer, flushing each
    /// time it fills.
    fn drain_pending(&mut self) -> io::Result<()> {
        if self.buf.len() >= self.capacity {
            self.flush_buf()?;
        }
        while let Some(byte) = self.encoder.pop_byte() {
            self.buf.push(byte);
            if self.buf.len() >= self.capacity {
                self.flush_buf()?;
            }
        }
        Ok(())
    }

    /// Hand the buffer to the sink. Bytes the sink accepted are removed even
    /// when a later write fails.
    fn flush_buf(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let total = self.buf.len();
        while !self.buf.is_empty() {
            match self.inner.write(&self.buf) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => {
                    self.buf.drain(..n);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        trace!(bytes = total, "flushed huffman output");
        Ok(())
    }
}

impl<W: Write> Write for HuffmanWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.append(buf) {
            Ok(n) => Ok(n),
            Err(HuffmanError::SinkWrite { accepted, .. }) if accepted > 0 => Ok(accepted),
            Err(err) => Err(err.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_pending()?;
        self.flush_buf()?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress;

    /// Sink that accepts `budget` bytes, then fails until refilled.
    struct FlakySink {
        data: Vec<u8>,
        budget: usize,
    }

    impl Write for FlakySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::other("sink full"));
            }
            let n = buf.len().min(self.budget);
            self.data.extend_from_slice(&buf[..n]);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_single_append_matches_oneshot() {
        let mut writer = HuffmanWriter::new(Vec::new());
        assert_eq!(writer.append(b"hello world").unwrap(), 11);
        writer.finish().unwrap();
        assert_eq!(writer.into_inner(), compress(b"hello world").unwrap());
    }

    #[test]
    fn test_byte_at_a_time_with_tiny_buffer() {
        let config = StreamConfig::new().with_write_buffer_size(1);
        let mut writer = HuffmanWriter::with_config(Vec::new(), Dictionary::shared(), &config);
        for &byte in b"the quick brown fox" {
            writer.write_all(&[byte]).unwrap();
        }
        writer.finish().unwrap();
        assert_eq!(writer.into_inner(), compress(b"the quick brown fox").unwrap());
    }

    #[test]
    fn test_empty_message_emits_nothing() {
        let mut writer = HuffmanWriter::new(Vec::new());
        writer.append(&[]).unwrap();
        writer.finish().unwrap();
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut writer = HuffmanWriter::new(Vec::new());
        writer.append(b"foo").unwrap();
        writer.finish().unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.get_ref(), &[0x74, 0xde, 0x16, 0xd9, 0x22, 0xc5, 0x0d]);
    }

    #[test]
    fn test_append_after_finish_fails() {
        let mut writer = HuffmanWriter::new(Vec::new());
        writer.append(b"foo").unwrap();
        writer.finish().unwrap();
        assert!(matches!(writer.append(b"x"), Err(HuffmanError::StreamFinished)));

        let err = writer.write(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_flush_does_not_terminate() {
        let mut writer = HuffmanWriter::new(Vec::new());
        writer.write_all(b"hello world").unwrap();
        writer.flush().unwrap();
        assert!(!writer.is_finished());

        let full = compress(b"hello world").unwrap();
        let flushed = writer.get_ref().clone();
        assert!(flushed.len() < full.len());
        assert_eq!(flushed, full[..flushed.len()]);
    }

    #[test]
    fn test_next_message_concatenates() {
        let mut writer = HuffmanWriter::new(Vec::new());
        writer.append(b"foo").unwrap();
        writer.next_message().unwrap();
        writer.append(b"bar").unwrap();
        writer.finish().unwrap();

        let mut expected = compress(b"foo").unwrap();
        expected.extend(compress(b"bar").unwrap());
        assert_eq!(writer.into_inner(), expected);
    }

    #[test]
    fn test_reset_returns_previous_sink() {
        let mut writer = HuffmanWriter::new(Vec::new());
        writer.append(b"discarded").unwrap();
        let old = writer.reset(Vec::new());
        assert!(old.is_empty());

        writer.append(b"ABC").unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.into_inner(), [188, 181, 98, 92, 113, 3]);
    }

    #[test]
    fn test_failing_sink_reports_accepted_and_recovers() {
        let data = b"hello world, hello world";
        let sink = FlakySink {
            data: Vec::new(),
            budget: 2,
        };
        let config = StreamConfig::new().with_write_buffer_size(4);
        let mut writer = HuffmanWriter::with_config(sink, Dictionary::shared(), &config);

        let accepted = match writer.append(data) {
            Err(HuffmanError::SinkWrite { accepted, .. }) => accepted,
            other => panic!("expected sink failure, got {other:?}"),
        };
        assert!(accepted > 0 && accepted < data.len());

        writer.get_mut().budget = usize::MAX;
        writer.append(&data[accepted..]).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.into_inner().data, compress(data).unwrap());
    }
}
