//! Buffered pull engine over any [`Stream`].
//!
//! [`Reader`] drains a backend stream through an internal buffer,
//! adding cheap byte-at-a-time access, lookahead (`peek`,
//! `peek_bytes`), single-byte pushback (`unread`), and a mark/reset
//! window for speculative parsing. It can also wrap a fixed byte range
//! zero-copy, in which case the range itself is the buffer and no
//! stream is involved.
//!
//! The buffer is allocated lazily on the first fill, so constructing a
//! reader is free. Filling compacts unread data (keeping marked data
//! alive when possible) before pulling from the stream, and a single
//! request larger than the buffer capacity fails with
//! [`OxiStreamError::BufferOverflow`].
//!
//! For backends with a blocking model, [`Reader::acquire`] bridges
//! readiness polling and settable read timeouts into one wait-for-data
//! call returning [`Acquired`].

use crate::error::{OxiStreamError, Result};
use crate::stream::Stream;
use std::time::Duration;

/// Default internal buffer capacity in bytes.
pub const DEFAULT_CAPACITY: usize = 8192;

/// Smallest internal buffer capacity a stream-backed reader accepts.
pub const MIN_CAPACITY: usize = 16;

#[derive(Debug)]
enum BufState<'a> {
    /// No fill has happened yet.
    Unallocated,
    Owned(Vec<u8>),
    /// Fixed byte range; the reader never grows or refills it.
    Borrowed(&'a [u8]),
}

/// Outcome of [`Reader::acquire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquired {
    /// At least the requested bytes are buffered; carries the number
    /// now available.
    Ready(usize),
    /// The wait expired before enough data arrived.
    TimedOut,
    /// The stream ended before enough data arrived.
    Eof,
}

/// A buffered reader with lookahead, pushback, and mark/reset.
pub struct Reader<'a> {
    buf: BufState<'a>,
    pos: usize,
    end: usize,
    mark: Option<usize>,
    capacity: usize,
    stream: Option<Box<dyn Stream + 'a>>,
}

impl<'a> Reader<'a> {
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
            buf: BufState::Unallocated,
            pos: 0,
            end: 0,
            mark: None,
            capacity: capacity.max(MIN_CAPACITY),
            stream: Some(Box::new(stream)),
        }
    }

    /// Read from a fixed byte range, zero-copy. The range is the
    /// entire data; once consumed the reader is at end-of-stream.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            buf: BufState::Borrowed(data),
            pos: 0,
            end: data.len(),
            mark: None,
            capacity: data.len(),
            stream: None,
        }
    }

    /// The internal buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes currently buffered and unread.
    pub fn available(&self) -> usize {
        self.end - self.pos
    }

    /// The buffered, unread bytes.
    pub fn buffered(&self) -> &[u8] {
        &self.buf()[self.pos..self.end]
    }

    /// The wrapped stream, if this reader has one.
    pub fn stream(&mut self) -> Option<&mut (dyn Stream + 'a)> {
        self.stream.as_deref_mut()
    }

    /// Drop everything buffered, including any mark. The next read
    /// pulls fresh data from the stream.
    pub fn discard_buffered(&mut self) {
        self.mark = None;
        self.pos = 0;
        self.end = 0;
    }

    /// True once neither the buffer nor the stream has more data.
    pub fn eof(&mut self) -> Result<bool> {
        Ok(self.fill_buffer(1)? == 0)
    }

    /// Read the next byte, or `None` at end-of-stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.fill_buffer(1)? == 0 {
            return Ok(None);
        }
        let byte = self.buf()[self.pos];
        self.pos += 1;
        Ok(Some(byte))
    }

    /// Look at the next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        if self.fill_buffer(1)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf()[self.pos]))
    }

    /// Look at the next `count` bytes without consuming them.
    ///
    /// Fails with [`OxiStreamError::EndOfStream`] if fewer than
    /// `count` bytes remain.
    pub fn peek_bytes(&mut self, count: usize) -> Result<&[u8]> {
        let available = self.fill_buffer(count)?;
        if available < count {
            return Err(OxiStreamError::end_of_stream(count - available));
        }
        Ok(&self.buf()[self.pos..self.pos + count])
    }

    /// Read up to `data.len()` bytes. Returns the number of bytes
    /// read; zero signals end-of-stream.
    pub fn read(&mut self, data: &mut [u8]) -> Result<usize> {
        let available = self.fill_buffer(1)?;
        if available == 0 {
            return Ok(0);
        }

        let count = data.len().min(available);
        data[..count].copy_from_slice(&self.buf()[self.pos..self.pos + count]);
        self.pos += count;
        Ok(count)
    }

    /// Fill `data` completely, failing with
    /// [`OxiStreamError::EndOfStream`] if the data runs out first.
    pub fn read_exact(&mut self, data: &mut [u8]) -> Result<()> {
        let mut offset = 0;
        while offset < data.len() {
            let num = self.read(&mut data[offset..])?;
            if num == 0 {
                return Err(OxiStreamError::end_of_stream(data.len() - offset));
            }
            offset += num;
        }
        Ok(())
    }

    /// Consume and discard up to `num_bytes`, stopping early at
    /// end-of-stream. Returns the number of bytes skipped.
    pub fn skip(&mut self, num_bytes: usize) -> Result<usize> {
        let mut remaining = num_bytes;
        while remaining > 0 && self.fill_buffer(1)? > 0 {
            let num = remaining.min(self.end - self.pos);
            self.pos += num;
            remaining -= num;
        }
        Ok(num_bytes - remaining)
    }

    /// Push one byte back, making it the next byte read.
    ///
    /// Only legal immediately after a read. An owned buffer is
    /// overwritten in place; a fixed byte range cannot be mutated, so
    /// the pushed byte must equal the byte originally read there, else
    /// [`OxiStreamError::NotSupported`].
    pub fn unread(&mut self, byte: u8) -> Result<()> {
        if self.pos == 0 {
            return Err(OxiStreamError::invalid_operation(
                "nothing has been read to push back over",
            ));
        }
        match &mut self.buf {
            BufState::Owned(buf) => buf[self.pos - 1] = byte,
            BufState::Borrowed(buf) => {
                if buf[self.pos - 1] != byte {
                    return Err(OxiStreamError::not_supported(
                        "pushback of a different byte into borrowed data",
                    ));
                }
            }
            // pos > 0 implies a fill already allocated the buffer
            BufState::Unallocated => {
                return Err(OxiStreamError::invalid_operation(
                    "nothing has been read to push back over",
                ));
            }
        }
        self.pos -= 1;
        Ok(())
    }

    /// Remember the current position so [`reset`](Self::reset) can
    /// return to it. Marked data is kept alive across refills while
    /// buffer space allows.
    pub fn mark(&mut self) {
        self.mark = Some(self.pos);
    }

    /// Forget the active mark, releasing its data for compaction.
    pub fn unmark(&mut self) {
        self.mark = None;
    }

    /// Rewind to the marked position and clear the mark.
    ///
    /// Fails with `InvalidOperation` when no mark is active, including
    /// when a fill had to discard the mark to make room.
    pub fn reset(&mut self) -> Result<()> {
        match self.mark.take() {
            Some(mark) => {
                self.pos = mark;
                Ok(())
            }
            None => Err(OxiStreamError::invalid_operation("no active mark to reset to")),
        }
    }

    /// Buffer at least `num_bytes`, failing with
    /// [`OxiStreamError::EndOfStream`] if the data runs out first.
    pub fn ensure(&mut self, num_bytes: usize) -> Result<()> {
        let available = self.fill_buffer(num_bytes)?;
        if available < num_bytes {
            return Err(OxiStreamError::end_of_stream(num_bytes - available));
        }
        Ok(())
    }

    /// Wait until at least `num_bytes` are buffered, `timeout` passes,
    /// or the stream ends.
    ///
    /// Streams that support readiness polling are polled between
    /// fills. Streams with a settable read timeout get `timeout`
    /// installed for the duration of the call, with the previous value
    /// restored on every exit path; a backend read that times out is
    /// reported as [`Acquired::TimedOut`], while any other stream
    /// failure propagates as an error. A stream with neither
    /// capability fails with [`OxiStreamError::NotSupported`].
    pub fn acquire(&mut self, num_bytes: usize, timeout: Duration) -> Result<Acquired> {
        let ready = self.available();
        if ready >= num_bytes {
            return Ok(Acquired::Ready(ready));
        }

        let (can_ready, can_timeout) = match &self.stream {
            Some(stream) => (stream.can_ready(), stream.can_timeout()),
            // A fixed byte range is exhausted once its data runs out,
            // however large the request.
            None => return Ok(Acquired::Eof),
        };

        if num_bytes > self.capacity {
            return Err(OxiStreamError::buffer_overflow(num_bytes, self.capacity));
        }

        if can_ready {
            let mut ready = ready;
            while ready < num_bytes {
                if !self.backend()?.ready_read(timeout)? {
                    return Ok(Acquired::TimedOut);
                }
                let value = self.fill_more()?;
                if value == ready {
                    return Ok(Acquired::Eof);
                }
                ready = value;
            }
            return Ok(Acquired::Ready(ready));
        }

        if can_timeout {
            let previous = self.backend()?.read_timeout()?;
            self.backend()?.set_read_timeout(Some(timeout))?;

            let outcome = self.fill_until(num_bytes, ready);
            let restore = self
                .backend()
                .and_then(|stream| stream.set_read_timeout(previous));

            let outcome = outcome?;
            restore?;
            return Ok(outcome);
        }

        Err(OxiStreamError::not_supported("acquire"))
    }

    /// Release the buffer and close an owned stream. A stream lent via
    /// `&mut` is left open for its owner.
    pub fn close(&mut self) -> Result<()> {
        self.buf = BufState::Unallocated;
        self.pos = 0;
        self.end = 0;
        self.mark = None;

        if let Some(mut stream) = self.stream.take() {
            stream.close()?;
        }
        Ok(())
    }

    fn buf(&self) -> &[u8] {
        match &self.buf {
            BufState::Unallocated => &[],
            BufState::Owned(buf) => buf,
            BufState::Borrowed(buf) => buf,
        }
    }

    fn backend(&mut self) -> Result<&mut (dyn Stream + 'a)> {
        self.stream
            .as_deref_mut()
            .ok_or_else(|| OxiStreamError::invalid_operation("reader has no stream"))
    }

    /// Fill loop of [`acquire`]'s settable-timeout branch. A timed-out
    /// backend read becomes `TimedOut`; other errors propagate.
    fn fill_until(&mut self, num_bytes: usize, mut ready: usize) -> Result<Acquired> {
        while ready < num_bytes {
            match self.fill_more() {
                Ok(value) if value == ready => return Ok(Acquired::Eof),
                Ok(value) => ready = value,
                Err(err) if err.is_timeout() => return Ok(Acquired::TimedOut),
                Err(err) => return Err(err),
            }
        }
        Ok(Acquired::Ready(ready))
    }

    /// Pull from the stream exactly once, regardless of what is
    /// already buffered.
    fn fill_more(&mut self) -> Result<usize> {
        self.fill_buffer(0)
    }

    /// Buffer up to `num_bytes` (zero means "read once more").
    ///
    /// Returns the number of bytes now available, which may fall short
    /// of the request only at end-of-stream. Compacts unread data to
    /// make room, preferring to keep marked data alive but dropping
    /// the mark when the request cannot fit otherwise. A request
    /// exceeding the buffer capacity fails with `BufferOverflow`.
    fn fill_buffer(&mut self, num_bytes: usize) -> Result<usize> {
        let available = self.end - self.pos;
        if self.stream.is_none() || (num_bytes > 0 && num_bytes <= available) {
            return Ok(available);
        }

        if matches!(self.buf, BufState::Unallocated) {
            self.buf = BufState::Owned(vec![0; self.capacity]);
        }

        // Negative when the request is already satisfied and the
        // caller just wants one more pull from the stream.
        let mut needed = num_bytes as i64 - available as i64;
        let mut free_space = self.capacity - self.end;

        if free_space == 0 || (free_space as i64) < needed {
            free_space = self.compact();

            if self.mark.is_some() && (free_space == 0 || (free_space as i64) < needed) {
                self.mark = None;
                free_space = self.compact();
            }

            if (free_space as i64) < needed {
                return Err(OxiStreamError::buffer_overflow(num_bytes, self.capacity));
            }
        }

        let BufState::Owned(buf) = &mut self.buf else {
            return Ok(available);
        };
        let Some(stream) = self.stream.as_deref_mut() else {
            return Ok(available);
        };

        loop {
            let num = stream.read(&mut buf[self.end..self.end + free_space])?;
            if num == 0 {
                break;
            }

            self.end += num;
            needed -= num as i64;
            free_space -= num;

            if needed <= 0 {
                break;
            }
        }

        Ok(self.end - self.pos)
    }

    /// Move live data (from the mark if one is active, else from the
    /// read position) to the front of the buffer. Returns the free
    /// space gained on the right.
    fn compact(&mut self) -> usize {
        let data_begin = match self.mark {
            Some(mark) if mark < self.pos => mark,
            _ => self.pos,
        };
        let data_size = self.end - data_begin;

        if data_size == 0 {
            self.pos = 0;
            self.end = 0;
            if self.mark.is_some() {
                self.mark = Some(0);
            }
        } else if data_begin > 0 {
            if let BufState::Owned(buf) = &mut self.buf {
                buf.copy_within(data_begin..self.end, 0);
            }
            self.mark = self.mark.map(|mark| mark - data_begin);
            self.pos -= data_begin;
            self.end -= data_begin;
        }

        self.capacity - self.end
    }
}

impl std::fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("pos", &self.pos)
            .field("end", &self.end)
            .field("mark", &self.mark)
            .field("capacity", &self.capacity)
            .field("has_stream", &self.stream.is_some())
            .finish()
    }
}

impl Drop for Reader<'_> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
