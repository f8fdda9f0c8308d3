//! Buffered push engine over any [`Stream`].
//!
//! [`Writer`] accumulates small writes in an internal buffer and
//! forwards them to the backend in capacity-sized bursts. The buffer
//! is allocated lazily on the first buffered write. An auto-flush mode
//! bypasses buffering entirely, pushing and flushing every write
//! immediately (for interactive backends where latency beats
//! throughput).
//!
//! [`Writer::close`] is deliberately two-phase: it first attempts a
//! flush, then releases the buffer and the stream unconditionally, and
//! only then reports the captured flush error. Resources are never
//! leaked because a final flush failed. Dropping a writer flushes
//! best-effort.

use crate::error::{OxiStreamError, Result};
use crate::stream::Stream;

/// Default internal buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 8192;

/// Smallest internal buffer capacity a writer accepts.
pub const MIN_CAPACITY: usize = 16;

/// A buffered writer with optional write-through mode.
pub struct Writer<'a> {
    buf: Option<Vec<u8>>,
    end: usize,
    capacity: usize,
    stream: Option<Box<dyn Stream + 'a>>,
    auto_flush: bool,
}

impl<'a> Writer<'a> {
    /// Wrap `stream` with the default buffer capacity.
    ///
    /// Pass the backend by value to hand it over, or pass `&mut
    /// backend` to lend it; a lent backend is not closed by
    /// [`close`](Self::close).
    pub fn new(stream: impl Stream + 'a) -> Self {
        Self::with_capacity(stream, DEFAULT_CAPACITY)
    }

    /// Wrap `stream` with an explicit buffer capacity, floored at
    /// [`MIN_CAPACITY`].
    pub fn with_capacity(stream: impl Stream + 'a, capacity: usize) -> Self {
        Self {
            buf: None,
            end: 0,
            capacity: capacity.max(MIN_CAPACITY),
            stream: Some(Box::new(stream)),
            auto_flush: false,
        }
    }

    /// The internal buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes buffered but not yet pushed to the stream.
    pub fn buffered(&self) -> usize {
        self.end
    }

    /// True if every write is pushed and flushed immediately.
    pub fn auto_flush(&self) -> bool {
        self.auto_flush
    }

    /// Switch write-through mode on or off. Turning it on flushes
    /// whatever is already buffered so ordering is preserved.
    pub fn set_auto_flush(&mut self, auto_flush: bool) -> Result<()> {
        if auto_flush {
            self.flush()?;
        }
        self.auto_flush = auto_flush;
        Ok(())
    }

    /// The wrapped stream, if this writer still holds one.
    pub fn stream(&mut self) -> Option<&mut (dyn Stream + 'a)> {
        self.stream.as_deref_mut()
    }

    /// Write a single byte.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        if self.auto_flush {
            let stream = self.backend()?;
            stream.write_byte(value)?;
            return stream.flush();
        }

        self.ensure_buffer(1)?;
        let end = self.end;
        self.buffer_mut()[end] = value;
        self.end += 1;

        if self.end == self.capacity {
            self.flush()?;
        }
        Ok(())
    }

    /// Write all of `data`, buffering and flushing as capacity allows.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.auto_flush {
            let stream = self.backend()?;
            stream.write_all(data)?;
            return stream.flush();
        }

        self.backend()?;
        let mut source = data;
        while !source.is_empty() {
            let num = source.len().min(self.capacity - self.end);
            let end = self.end;
            self.buffer_mut()[end..end + num].copy_from_slice(&source[..num]);
            self.end += num;
            source = &source[num..];

            if self.end == self.capacity {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Make at least `num_bytes` of contiguous buffer space free,
    /// flushing first if needed.
    ///
    /// Fails with [`OxiStreamError::BufferOverflow`] when `num_bytes`
    /// exceeds the buffer capacity outright.
    pub fn ensure_buffer(&mut self, num_bytes: usize) -> Result<()> {
        self.backend()?;
        if self.capacity - self.end < num_bytes {
            self.flush()?;

            if self.capacity - self.end < num_bytes {
                return Err(OxiStreamError::buffer_overflow(num_bytes, self.capacity));
            }
        }
        // Touch the buffer so the slot really exists.
        self.buffer_mut();
        Ok(())
    }

    /// Reserve `num_bytes` of buffer space and return it for in-place
    /// encoding. The bytes count as written once the call returns.
    pub fn reserve(&mut self, num_bytes: usize) -> Result<&mut [u8]> {
        self.ensure_buffer(num_bytes)?;
        let end = self.end;
        self.end += num_bytes;
        Ok(&mut self.buffer_mut()[end..end + num_bytes])
    }

    /// Push everything buffered to the stream and flush it through.
    pub fn flush(&mut self) -> Result<()> {
        if self.end > 0 {
            if let (Some(stream), Some(buf)) = (self.stream.as_deref_mut(), self.buf.as_deref()) {
                stream.write_all(&buf[..self.end])?;
                stream.flush()?;
                self.end = 0;
            }
        }
        Ok(())
    }

    /// Flush, release the buffer, and close an owned stream.
    ///
    /// Resources are released even when the flush fails; the first
    /// error is re-raised only afterwards. A stream lent via `&mut` is
    /// left open for its owner.
    pub fn close(&mut self) -> Result<()> {
        let flushed = self.flush();

        self.buf = None;
        self.end = 0;

        let closed = match self.stream.take() {
            Some(mut stream) => stream.close(),
            None => Ok(()),
        };

        flushed?;
        closed
    }

    fn backend(&mut self) -> Result<&mut (dyn Stream + 'a)> {
        self.stream
            .as_deref_mut()
            .ok_or_else(|| OxiStreamError::invalid_operation("writer is closed"))
    }

    /// The lazily allocated buffer.
    fn buffer_mut(&mut self) -> &mut [u8] {
        self.buf.get_or_insert_with(|| vec![0; self.capacity])
    }
}

impl std::fmt::Debug for Writer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("end", &self.end)
            .field("capacity", &self.capacity)
            .field("auto_flush", &self.auto_flush)
            .field("has_stream", &self.stream.is_some())
            .finish()
    }
}

impl Drop for Writer<'_> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    /// Records every backend call so tests can count pushes.
    #[derive(Default)]
    struct Tape {
        data: Vec<u8>,
        writes: usize,
        flushes: usize,
        fail_writes: bool,
        closed: bool,
    }

    impl Stream for Tape {
        fn can_write(&self) -> bool {
            true
        }

        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            if self.fail_writes {
                return Err(OxiStreamError::Io(std::io::Error::other("backend down")));
            }
            self.writes += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<()> {
            self.flushes += 1;
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn test_small_writes_coalesce() {
        let mut tape = Tape::default();
        {
            let mut writer = Writer::new(&mut tape);
            for n in 0u8..100 {
                writer.write_byte(n).unwrap();
            }
            assert_eq!(writer.buffered(), 100);
            writer.flush().unwrap();
        }

        assert_eq!(tape.writes, 1);
        assert_eq!(tape.data.len(), 100);
    }

    #[test]
    fn test_large_write_flushes_in_capacity_bursts() {
        let mut tape = Tape::default();
        {
            // 40 bytes through a 16-byte buffer: two full bursts flush
            // inline, 8 bytes stay buffered.
            let mut writer = Writer::with_capacity(&mut tape, 16);
            writer.write(&[9u8; 40]).unwrap();
            // 8 bytes left buffered proves exactly two 16-byte bursts
            // were flushed inline.
            assert_eq!(writer.buffered(), 8);
            writer.flush().unwrap();
        }

        assert_eq!(tape.writes, 3);
        assert_eq!(tape.flushes, 3);
        assert_eq!(tape.data, vec![9u8; 40]);
    }

    #[test]
    fn test_auto_flush_writes_through() {
        let mut tape = Tape::default();
        {
            let mut writer = Writer::new(&mut tape);
            writer.set_auto_flush(true).unwrap();
            writer.write(b"one").unwrap();
            writer.write_byte(b'!').unwrap();
            assert_eq!(writer.buffered(), 0);
        }

        assert_eq!(tape.writes, 2);
        assert_eq!(tape.flushes, 2);
        assert_eq!(tape.data, b"one!");
    }

    #[test]
    fn test_reserve_in_place() {
        let mut tape = Tape::default();
        {
            let mut writer = Writer::new(&mut tape);
            writer.reserve(4).unwrap().copy_from_slice(b"abcd");
            writer.write(b"ef").unwrap();
            writer.flush().unwrap();
        }
        assert_eq!(tape.data, b"abcdef");
    }

    #[test]
    fn test_ensure_buffer_overflow() {
        let mut tape = Tape::default();
        let mut writer = Writer::with_capacity(&mut tape, 256);
        assert!(matches!(
            writer.ensure_buffer(257),
            Err(OxiStreamError::BufferOverflow {
                needed: 257,
                capacity: 256
            })
        ));
        // The overflow did not disturb the writer.
        writer.write(b"still fine").unwrap();
    }

    #[test]
    fn test_close_releases_even_when_flush_fails() {
        let mut writer = Writer::new(Tape {
            fail_writes: true,
            ..Tape::default()
        });
        writer.write(b"doomed").unwrap();

        let err = writer.close().unwrap_err();
        assert!(matches!(err, OxiStreamError::Io(_)));

        // The writer is released; further writes are misuse.
        assert!(matches!(
            writer.write(b"more"),
            Err(OxiStreamError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_close_closes_owned_stream_only() {
        let mut writer = Writer::new(Tape::default());
        writer.write(b"x").unwrap();
        writer.close().unwrap();

        let mut lent = Tape::default();
        {
            let mut writer = Writer::new(&mut lent);
            writer.write(b"y").unwrap();
            writer.close().unwrap();
        }
        assert!(!lent.closed);
        assert_eq!(lent.data, b"y");
    }

    #[test]
    fn test_drop_flushes_best_effort() {
        let mut tape = Tape::default();
        {
            let mut writer = Writer::new(&mut tape);
            writer.write(b"pending").unwrap();
        }
        assert_eq!(tape.data, b"pending");
    }

    #[test]
    fn test_buffer_as_backend() {
        let mut sink = Buffer::new();
        {
            let mut writer = Writer::new(&mut sink);
            writer.write(b"memory bound").unwrap();
        }
        assert_eq!(sink.as_slice(), b"memory bound");
    }
}
