//! The `Stream` capability contract.
//!
//! A [`Stream`] is the minimal interface every byte backend implements:
//! in-memory buffers, files, sockets, and process pipes all look the
//! same to the buffered [`Reader`](crate::reader::Reader) and
//! [`Writer`](crate::writer::Writer) engines. A backend declares which
//! capabilities it actually supports via the `can_*` queries; calling
//! an unsupported operation fails with
//! [`OxiStreamError::NotSupported`] rather than silently doing
//! nothing.
//!
//! Ownership is expressed through the type system: pass a backend by
//! value to hand it over, or pass `&mut backend` (which also
//! implements `Stream`) to lend it.

use crate::error::{OxiStreamError, Result};
use std::time::Duration;

pub use std::io::SeekFrom;

/// An abstract source and/or sink of bytes.
///
/// All operations are synchronous and blocking; a call completes (or
/// fails) before it returns. Default method bodies report
/// `NotSupported`, so a backend only implements what it can honor,
/// plus the matching `can_*` queries.
pub trait Stream {
    /// True if the stream can serve reads.
    fn can_read(&self) -> bool {
        false
    }

    /// True if the stream can accept writes.
    fn can_write(&self) -> bool {
        false
    }

    /// True if the stream supports seek/position/length.
    fn can_seek(&self) -> bool {
        false
    }

    /// True if read/write timeouts can be installed.
    fn can_timeout(&self) -> bool {
        false
    }

    /// True if readiness polling (`ready_read`/`ready_write`) works.
    fn can_ready(&self) -> bool {
        false
    }

    /// Read up to `buf.len()` bytes into `buf`.
    ///
    /// Returns the number of bytes read; zero signals end-of-stream.
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(OxiStreamError::not_supported("read"))
    }

    /// Write up to `buf.len()` bytes from `buf`.
    ///
    /// Returns the number of bytes written, possibly zero.
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(OxiStreamError::not_supported("write"))
    }

    /// Push any internally buffered bytes to their destination.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release underlying resources. Further operations may fail.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Reposition the stream cursor. Returns the new position.
    fn seek(&mut self, _pos: SeekFrom) -> Result<u64> {
        Err(OxiStreamError::not_supported("seek"))
    }

    /// Current cursor position.
    fn position(&mut self) -> Result<u64> {
        Err(OxiStreamError::not_supported("position"))
    }

    /// Total length of the stream's data.
    fn stream_len(&mut self) -> Result<u64> {
        Err(OxiStreamError::not_supported("length"))
    }

    /// Grow or truncate the stream to `len` bytes.
    fn set_stream_len(&mut self, _len: u64) -> Result<()> {
        Err(OxiStreamError::not_supported("set length"))
    }

    /// The currently installed read timeout, if any.
    fn read_timeout(&self) -> Result<Option<Duration>> {
        Err(OxiStreamError::not_supported("read timeout"))
    }

    /// Install (or clear) the read timeout.
    fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> Result<()> {
        Err(OxiStreamError::not_supported("read timeout"))
    }

    /// The currently installed write timeout, if any.
    fn write_timeout(&self) -> Result<Option<Duration>> {
        Err(OxiStreamError::not_supported("write timeout"))
    }

    /// Install (or clear) the write timeout.
    fn set_write_timeout(&mut self, _timeout: Option<Duration>) -> Result<()> {
        Err(OxiStreamError::not_supported("write timeout"))
    }

    /// Wait up to `timeout` for the stream to become readable.
    fn ready_read(&mut self, _timeout: Duration) -> Result<bool> {
        Err(OxiStreamError::not_supported("ready_read"))
    }

    /// Wait up to `timeout` for the stream to become writable.
    fn ready_write(&mut self, _timeout: Duration) -> Result<bool> {
        Err(OxiStreamError::not_supported("ready_write"))
    }

    /// Read the next byte, or `None` at end-of-stream.
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        Ok(if self.read(&mut byte)? == 0 {
            None
        } else {
            Some(byte[0])
        })
    }

    /// Write a single byte.
    fn write_byte(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    /// Loop until `buf` is completely filled.
    ///
    /// Fails with [`OxiStreamError::EndOfStream`] if the stream ends
    /// first.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut offset = 0;
        while offset < buf.len() {
            let num = self.read(&mut buf[offset..])?;
            if num == 0 {
                return Err(OxiStreamError::end_of_stream(buf.len() - offset));
            }
            offset += num;
        }
        Ok(())
    }

    /// Loop until all of `buf` has been written.
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut offset = 0;
        while offset < buf.len() {
            let num = self.write(&buf[offset..])?;
            if num == 0 {
                return Err(OxiStreamError::Io(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "stream accepted zero bytes",
                )));
            }
            offset += num;
        }
        Ok(())
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }
    fn can_write(&self) -> bool {
        (**self).can_write()
    }
    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }
    fn can_timeout(&self) -> bool {
        (**self).can_timeout()
    }
    fn can_ready(&self) -> bool {
        (**self).can_ready()
    }
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
    fn close(&mut self) -> Result<()> {
        // A lent stream is not ours to tear down; the owner closes it.
        Ok(())
    }
    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek(pos)
    }
    fn position(&mut self) -> Result<u64> {
        (**self).position()
    }
    fn stream_len(&mut self) -> Result<u64> {
        (**self).stream_len()
    }
    fn set_stream_len(&mut self, len: u64) -> Result<()> {
        (**self).set_stream_len(len)
    }
    fn read_timeout(&self) -> Result<Option<Duration>> {
        (**self).read_timeout()
    }
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_read_timeout(timeout)
    }
    fn write_timeout(&self) -> Result<Option<Duration>> {
        (**self).write_timeout()
    }
    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_write_timeout(timeout)
    }
    fn ready_read(&mut self, timeout: Duration) -> Result<bool> {
        (**self).ready_read(timeout)
    }
    fn ready_write(&mut self, timeout: Duration) -> Result<bool> {
        (**self).ready_write(timeout)
    }
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }
    fn write_byte(&mut self, value: u8) -> Result<()> {
        (**self).write_byte(value)
    }
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }
}

/// Scoped read-timeout override.
///
/// Installs `timeout` on construction and restores the previous value
/// when dropped, on every exit path.
///
/// This is a convenience for callers driving a backend directly: it
/// holds the stream borrow for its whole scope, so code that needs the
/// stream through another owner in the meantime (as `Reader::acquire`
/// does) saves and restores the timeout itself instead. The guard also
/// swallows the restore error, where `acquire` reports it.
pub struct ReadTimeoutGuard<'a, S: Stream + ?Sized> {
    stream: &'a mut S,
    previous: Option<Duration>,
}

impl<'a, S: Stream + ?Sized> ReadTimeoutGuard<'a, S> {
    /// Install `timeout`, remembering the previous setting.
    pub fn new(stream: &'a mut S, timeout: Option<Duration>) -> Result<Self> {
        let previous = stream.read_timeout()?;
        stream.set_read_timeout(timeout)?;
        Ok(Self { stream, previous })
    }

    /// Access the guarded stream.
    pub fn stream(&mut self) -> &mut S {
        self.stream
    }
}

impl<S: Stream + ?Sized> Drop for ReadTimeoutGuard<'_, S> {
    fn drop(&mut self) {
        let _ = self.stream.set_read_timeout(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SlowSink {
        data: Vec<u8>,
        read_timeout: Option<Duration>,
    }

    impl Stream for SlowSink {
        fn can_read(&self) -> bool {
            true
        }
        fn can_write(&self) -> bool {
            true
        }
        fn can_timeout(&self) -> bool {
            true
        }

        // Accepts at most 3 bytes per call to exercise retry loops.
        fn write(&mut self, buf: &[u8]) -> Result<usize> {
            let num = buf.len().min(3);
            self.data.extend_from_slice(&buf[..num]);
            Ok(num)
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            let num = buf.len().min(self.data.len()).min(3);
            buf[..num].copy_from_slice(&self.data[..num]);
            self.data.drain(..num);
            Ok(num)
        }

        fn read_timeout(&self) -> Result<Option<Duration>> {
            Ok(self.read_timeout)
        }

        fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
            self.read_timeout = timeout;
            Ok(())
        }
    }

    #[test]
    fn test_defaults_report_not_supported() {
        struct Inert;
        impl Stream for Inert {}

        let mut s = Inert;
        assert!(!s.can_read());
        assert!(matches!(
            s.read(&mut [0u8; 4]),
            Err(OxiStreamError::NotSupported { .. })
        ));
        assert!(matches!(
            s.seek(SeekFrom::Start(0)),
            Err(OxiStreamError::NotSupported { .. })
        ));
        assert!(matches!(
            s.ready_read(Duration::from_millis(1)),
            Err(OxiStreamError::NotSupported { .. })
        ));
    }

    #[test]
    fn test_write_all_loops_over_partial_writes() {
        let mut sink = SlowSink::default();
        sink.write_all(b"0123456789").unwrap();
        assert_eq!(sink.data, b"0123456789");
    }

    #[test]
    fn test_read_exact_loops_and_fails_at_eof() {
        let mut sink = SlowSink::default();
        sink.write_all(b"abcdef").unwrap();

        let mut buf = [0u8; 6];
        sink.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"abcdef");

        let mut more = [0u8; 1];
        assert!(matches!(
            sink.read_exact(&mut more),
            Err(OxiStreamError::EndOfStream { expected: 1 })
        ));
    }

    #[test]
    fn test_mut_ref_is_a_stream() {
        let mut sink = SlowSink::default();
        {
            let lent: &mut SlowSink = &mut sink;
            let mut boxed: Box<dyn Stream + '_> = Box::new(lent);
            boxed.write_all(b"hi").unwrap();
            // Closing the borrowed view must not tear down the owner.
            boxed.close().unwrap();
        }
        assert_eq!(sink.data, b"hi");
    }

    #[test]
    fn test_timeout_guard_restores_previous() {
        let mut sink = SlowSink::default();
        sink.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

        {
            let guard =
                ReadTimeoutGuard::new(&mut sink, Some(Duration::from_millis(10))).unwrap();
            drop(guard);
        }
        assert_eq!(sink.read_timeout().unwrap(), Some(Duration::from_secs(5)));
    }
}
