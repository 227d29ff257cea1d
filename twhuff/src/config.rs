//! Buffer configuration for the streaming adapters.

/// Buffer sizes used by [`HuffmanReader`](crate::HuffmanReader) and
/// [`HuffmanWriter`](crate::HuffmanWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamConfig {
    /// Capacity of the `BufReader` wrapped around plain `Read` sources.
    pub read_buffer_size: usize,
    /// Capacity of the writer's packed-output buffer. The buffer is handed
    /// to the sink whenever it fills up.
    pub write_buffer_size: usize,
}

impl StreamConfig {
    /// 2 KiB each way.
    pub const DEFAULT: Self = Self {
        read_buffer_size: 2048,
        write_buffer_size: 2048,
    };

    /// Create a configuration with the default sizes.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the read buffer size. Zero is raised to one byte.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Set the write buffer size. Zero is raised to one byte.
    pub fn with_write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = size.max(1);
        self
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
