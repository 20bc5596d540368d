//! Bounded-buffer upload writer
//!
//! Accumulates caller bytes into a fixed-capacity buffer and flushes one
//! write per full buffer, so no single write to the data connection
//! exceeds the buffer capacity and upload memory use stays fixed
//! regardless of input size.

use log::debug;
use std::io::{self, Write};

/// Capacity of the upload accumulation buffer
pub const TRANSFER_BUFFER_SIZE: usize = 1500;

/// Chunks application data into fixed-size segments before writing
pub struct BufferedWriter {
    buf: Vec<u8>,
    capacity: usize,
}

impl BufferedWriter {
    pub fn new() -> Self {
        Self::with_capacity(TRANSFER_BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Stream `data` to `sink` in at-most-capacity segments.
    ///
    /// Exactly the input bytes are written, in order; every write except
    /// possibly the last is a full buffer. The trailing partial buffer is
    /// flushed before returning, so the accumulator is empty between
    /// calls.
    pub fn stream<W: Write>(&mut self, sink: &mut W, data: &[u8]) -> io::Result<()> {
        let mut rest = data;
        while !rest.is_empty() {
            let room = self.capacity - self.buf.len();
            let take = room.min(rest.len());
            self.buf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];

            if self.buf.len() == self.capacity {
                sink.write_all(&self.buf)?;
                debug!("Flushed full buffer ({} bytes)", self.capacity);
                self.buf.clear();
            }
        }

        if !self.buf.is_empty() {
            sink.write_all(&self.buf)?;
            debug!("Flushed final buffer ({} bytes)", self.buf.len());
            self.buf.clear();
        }

        Ok(())
    }
}

impl Default for BufferedWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the size of every underlying write call
    struct RecordingSink {
        writes: Vec<usize>,
        data: Vec<u8>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                data: Vec::new(),
            }
        }
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.push(buf.len());
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_three_full_buffers_plus_partial() {
        let cap = TRANSFER_BUFFER_SIZE;
        let input: Vec<u8> = (0..cap * 3 + 7).map(|i| (i % 251) as u8).collect();

        let mut sink = RecordingSink::new();
        let mut writer = BufferedWriter::new();
        writer.stream(&mut sink, &input).unwrap();

        assert_eq!(sink.writes, vec![cap, cap, cap, 7]);
        assert_eq!(sink.data, input);
    }

    #[test]
    fn test_input_smaller_than_capacity_is_one_write() {
        let mut sink = RecordingSink::new();
        let mut writer = BufferedWriter::new();
        writer.stream(&mut sink, b"hello\r\n").unwrap();

        assert_eq!(sink.writes, vec![7]);
        assert_eq!(sink.data, b"hello\r\n");
    }

    #[test]
    fn test_exact_multiple_has_no_partial_write() {
        let cap = 8;
        let input = vec![0xAB; cap * 2];

        let mut sink = RecordingSink::new();
        let mut writer = BufferedWriter::with_capacity(cap);
        writer.stream(&mut sink, &input).unwrap();

        assert_eq!(sink.writes, vec![cap, cap]);
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let mut sink = RecordingSink::new();
        let mut writer = BufferedWriter::new();
        writer.stream(&mut sink, &[]).unwrap();

        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_accumulator_is_empty_between_calls() {
        let cap = 8;
        let mut sink = RecordingSink::new();
        let mut writer = BufferedWriter::with_capacity(cap);

        writer.stream(&mut sink, b"abc").unwrap();
        writer.stream(&mut sink, b"defgh").unwrap();

        // Each call flushes its own partial; no carry-over merging
        assert_eq!(sink.writes, vec![3, 5]);
        assert_eq!(sink.data, b"abcdefgh");
    }
}
