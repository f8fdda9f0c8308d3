//! Growable byte buffer with independent read cursor and data length.
//!
//! [`Buffer`] plays two roles:
//!
//! - a resizable byte container with explicit positioning, growth, and
//!   compaction, usable as the accumulate-then-flip workspace of
//!   parsers and encoders;
//! - an in-memory [`Stream`] implementation (see [`MemoryStream`]),
//!   so readers and writers can wrap it like any other backend.
//!
//! Storage is either owned (growable) or borrowed from the caller
//! (fixed capacity, optionally read-only). Growth doubles the
//! capacity with a floor of 64 bytes and always preserves existing
//! data. Compaction, reservation, and clearing are the only
//! operations that move or reallocate storage; slices obtained from
//! accessors are invalidated by them (the borrow checker enforces
//! this).
//!
//! # Example
//!
//! ```
//! use oxistream_core::buffer::Buffer;
//! use oxistream_core::endian::Endian;
//!
//! let mut buf = Buffer::new().with_endian(Endian::BIG);
//! buf.write_u16(0xCAFE).unwrap();
//! buf.rewind();
//! assert_eq!(buf.read_u16().unwrap(), 0xCAFE);
//! ```

use crate::endian::{ByteOrder, Endian};
use crate::error::{OxiStreamError, Result};
use crate::stream::{SeekFrom, Stream};

/// Smallest capacity an owned buffer grows to.
pub const MIN_CAPACITY: usize = 64;

#[derive(Debug)]
enum Storage<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a [u8]),
    BorrowedMut(&'a mut [u8]),
}

/// A growable byte store with a read/write cursor.
///
/// Invariant: `0 <= position <= len <= capacity`.
#[derive(Debug)]
pub struct Buffer<'a> {
    storage: Storage<'a>,
    pos: usize,
    len: usize,
    endian: Endian,
}

/// A [`Buffer`] used through its [`Stream`] role.
pub type MemoryStream<'a> = Buffer<'a>;

impl Default for Buffer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer<'static> {
    /// Create an empty, growable buffer in host byte order.
    pub fn new() -> Self {
        Self {
            storage: Storage::Owned(Vec::new()),
            pos: 0,
            len: 0,
            endian: Endian::DEFAULT,
        }
    }

    /// Create an empty, growable buffer with `capacity` bytes
    /// preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Storage::Owned(vec![0; capacity]),
            pos: 0,
            len: 0,
            endian: Endian::DEFAULT,
        }
    }

    /// Take ownership of `data`; the buffer starts full (`len ==
    /// data.len()`) with the cursor at zero.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let len = data.len();
        Self {
            storage: Storage::Owned(data),
            pos: 0,
            len,
            endian: Endian::DEFAULT,
        }
    }
}

impl<'a> Buffer<'a> {
    /// Wrap externally supplied memory read-only. The buffer is fixed
    /// and rejects all mutation; the caller retains ownership.
    pub fn borrow(data: &'a [u8]) -> Self {
        let len = data.len();
        Self {
            storage: Storage::Borrowed(data),
            pos: 0,
            len,
            endian: Endian::DEFAULT,
        }
    }

    /// Wrap externally supplied memory writable-in-place. The buffer
    /// is fixed: it can be rewritten but never grown.
    pub fn borrow_mut(data: &'a mut [u8]) -> Self {
        let len = data.len();
        Self {
            storage: Storage::BorrowedMut(data),
            pos: 0,
            len,
            endian: Endian::DEFAULT,
        }
    }

    /// Set the byte order used by the primitive codec methods.
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Deep-copy into an owned, growable buffer, preserving cursor,
    /// length, and byte order.
    pub fn to_owned_buffer(&self) -> Buffer<'static> {
        Buffer {
            storage: Storage::Owned(self.data().to_vec()),
            pos: self.pos,
            len: self.len,
            endian: self.endian,
        }
    }

    /// Allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.data().len()
    }

    /// Valid data extent.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no valid data is held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to `pos`, which must lie within `[0, len]`.
    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.len {
            return Err(OxiStreamError::index_out_of_range(pos, self.len));
        }
        self.pos = pos;
        Ok(())
    }

    /// Bytes between the cursor and the end of valid data.
    pub fn remaining(&self) -> usize {
        self.len - self.pos
    }

    /// Unused capacity past the end of valid data.
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len
    }

    /// The configured byte order tag.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// The configured byte order.
    pub fn order(&self) -> ByteOrder {
        self.endian.order()
    }

    /// Replace the byte order used by the primitive codec methods.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.endian.set_order(order);
    }

    /// True if the storage was borrowed immutably.
    pub fn is_read_only(&self) -> bool {
        matches!(self.storage, Storage::Borrowed(_))
    }

    /// True if the capacity can never grow (borrowed storage).
    pub fn is_fixed(&self) -> bool {
        !matches!(self.storage, Storage::Owned(_))
    }

    /// All valid data, `[0, len)`.
    pub fn as_slice(&self) -> &[u8] {
        &self.data()[..self.len]
    }

    /// Unread data, `[position, len)`.
    pub fn current(&self) -> &[u8] {
        &self.data()[self.pos..self.len]
    }

    /// Byte at `index`. Panics if out of bounds of the valid data.
    pub fn at(&self, index: usize) -> u8 {
        self.as_slice()[index]
    }

    fn data(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(v) => v,
            Storage::Borrowed(s) => s,
            Storage::BorrowedMut(s) => s,
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.is_read_only() {
            return Err(OxiStreamError::invalid_operation("buffer is read-only"));
        }
        Ok(())
    }

    /// Full storage, mutable. Callers check `ensure_writable` first.
    fn data_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Owned(v) => v,
            Storage::BorrowedMut(s) => s,
            Storage::Borrowed(_) => unreachable!("writability checked before mutation"),
        }
    }

    /// Grow capacity to at least `size` bytes.
    ///
    /// Growth at least doubles the current capacity, floored at
    /// [`MIN_CAPACITY`], and preserves all existing bytes. Fails with
    /// `InvalidOperation` on read-only or fixed buffers.
    pub fn reserve(&mut self, size: usize) -> Result<()> {
        if size <= self.capacity() {
            return Ok(());
        }
        match &mut self.storage {
            Storage::Borrowed(_) => Err(OxiStreamError::invalid_operation("buffer is read-only")),
            Storage::BorrowedMut(_) => {
                Err(OxiStreamError::invalid_operation("buffer capacity is fixed"))
            }
            Storage::Owned(data) => {
                let doubled = data.len().saturating_mul(2);
                data.resize(size.max(doubled).max(MIN_CAPACITY), 0);
                Ok(())
            }
        }
    }

    /// Grow (if needed) and set the valid data extent to `len`.
    ///
    /// Shrinking below the cursor pulls the cursor back to `len`.
    pub fn set_len(&mut self, len: usize) -> Result<()> {
        self.reserve(len)?;
        self.len = len;
        if self.pos > self.len {
            self.pos = self.len;
        }
        Ok(())
    }

    /// Extend the valid data extent by `num_bytes`.
    pub fn extend_len(&mut self, num_bytes: usize) -> Result<()> {
        self.set_len(self.len + num_bytes)
    }

    /// Reset cursor and length to zero, optionally zeroing storage.
    ///
    /// Zeroing a read-only buffer is an error; a plain clear is not.
    pub fn clear(&mut self, with_zeros: bool) -> Result<()> {
        self.pos = 0;
        self.len = 0;
        if with_zeros {
            self.ensure_writable()?;
            self.data_mut().fill(0);
        }
        Ok(())
    }

    /// Shift unread data `[position, len)` down to offset zero.
    ///
    /// A no-op when the cursor is at zero; equivalent to a clear when
    /// nothing remains unread. Any previously obtained slice into the
    /// buffer is invalidated.
    pub fn compact(&mut self) -> Result<()> {
        if self.pos == 0 {
            return Ok(());
        }
        if self.pos >= self.len {
            self.pos = 0;
            self.len = 0;
            return Ok(());
        }

        self.ensure_writable()?;
        let (pos, len) = (self.pos, self.len);
        self.data_mut().copy_within(pos..len, 0);
        self.len = len - pos;
        self.pos = 0;
        Ok(())
    }

    /// Move the cursor back to zero without touching the data.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Flip from writing to reading: the data written so far becomes
    /// the valid extent, and the cursor returns to zero.
    pub fn flip(&mut self) {
        self.len = self.pos;
        self.pos = 0;
    }

    /// Advance the cursor by `num_bytes`.
    pub fn forward(&mut self, num_bytes: usize) -> Result<()> {
        self.set_position(self.pos + num_bytes)
    }

    /// Move the cursor back by `num_bytes`.
    pub fn backward(&mut self, num_bytes: usize) -> Result<()> {
        let target = self
            .pos
            .checked_sub(num_bytes)
            .ok_or_else(|| OxiStreamError::index_out_of_range(num_bytes, self.pos))?;
        self.pos = target;
        Ok(())
    }

    /// Replace the buffer contents with a copy of `data`, resetting
    /// the cursor.
    pub fn set_data(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_writable()?;
        self.reserve(data.len())?;
        self.data_mut()[..data.len()].copy_from_slice(data);
        self.pos = 0;
        self.len = data.len();
        Ok(())
    }

    /// Find the next occurrence of `byte` at or after `start` within
    /// the valid data.
    pub fn find(&self, start: usize, byte: u8) -> Option<usize> {
        self.as_slice()[start.min(self.len)..]
            .iter()
            .position(|&b| b == byte)
            .map(|i| start + i)
    }

    /// Find the next occurrence of any byte in `set` at or after
    /// `start`.
    pub fn find_any(&self, start: usize, set: &[u8]) -> Option<usize> {
        self.as_slice()[start.min(self.len)..]
            .iter()
            .position(|b| set.contains(b))
            .map(|i| start + i)
    }

    /// Copy valid data starting at `pos` into `dest` without touching
    /// the cursor. Returns the number of bytes copied.
    pub fn copy_to(&self, dest: &mut [u8], pos: usize) -> usize {
        let available = self.len.saturating_sub(pos);
        let num = dest.len().min(available);
        dest[..num].copy_from_slice(&self.data()[pos..pos + num]);
        num
    }

    /// Consume `width` bytes at the cursor, returning their offset.
    fn take(&mut self, width: usize) -> Result<usize> {
        let pos = self.pos;
        let end = pos + width;
        if end > self.len {
            return Err(OxiStreamError::index_out_of_range(end, self.len));
        }
        self.pos = end;
        Ok(pos)
    }

    /// Make room for `width` bytes at the cursor, advancing cursor and
    /// length, and return the writable region.
    fn put(&mut self, width: usize) -> Result<&mut [u8]> {
        self.ensure_writable()?;
        self.reserve(self.pos + width)?;
        let pos = self.pos;
        self.pos += width;
        if self.len < self.pos {
            self.len = self.pos;
        }
        Ok(&mut self.data_mut()[pos..pos + width])
    }

    /// Make room for `width` bytes at the end of valid data without
    /// touching the cursor, and return the writable region.
    fn put_end(&mut self, width: usize) -> Result<&mut [u8]> {
        self.ensure_writable()?;
        self.reserve(self.len + width)?;
        let at = self.len;
        self.len += width;
        Ok(&mut self.data_mut()[at..at + width])
    }

    fn peek_at(&self, offset: usize, width: usize) -> Result<&[u8]> {
        let start = self.pos + offset;
        let end = start + width;
        if end > self.len {
            return Err(OxiStreamError::index_out_of_range(end, self.len));
        }
        Ok(&self.data()[start..end])
    }
}

macro_rules! buffer_primitives {
    ($($ty:ty, $width:expr, $read:ident, $write:ident, $peek:ident, $append:ident, $endian_read:ident, $endian_write:ident;)*) => {
        impl<'a> Buffer<'a> {
            $(
                #[doc = concat!("Read a `", stringify!($ty), "` at the cursor in the configured byte order.")]
                pub fn $read(&mut self) -> Result<$ty> {
                    let pos = self.take($width)?;
                    Ok(self.endian.$endian_read(&self.data()[pos..]))
                }

                #[doc = concat!("Write a `", stringify!($ty), "` at the cursor, growing as needed.")]
                pub fn $write(&mut self, value: $ty) -> Result<()> {
                    let endian = self.endian;
                    endian.$endian_write(self.put($width)?, value);
                    Ok(())
                }

                #[doc = concat!("Read a `", stringify!($ty), "` at `offset` bytes past the cursor without consuming.")]
                pub fn $peek(&self, offset: usize) -> Result<$ty> {
                    Ok(self.endian.$endian_read(self.peek_at(offset, $width)?))
                }

                #[doc = concat!("Write a `", stringify!($ty), "` at the end of valid data, leaving the cursor alone.")]
                pub fn $append(&mut self, value: $ty) -> Result<()> {
                    let endian = self.endian;
                    endian.$endian_write(self.put_end($width)?, value);
                    Ok(())
                }
            )*
        }
    };
}

buffer_primitives! {
    i8,  1, read_i8,  write_i8,  peek_i8,  append_i8,  read_i8,  write_i8;
    u8,  1, read_u8,  write_u8,  peek_u8,  append_u8,  read_u8,  write_u8;
    i16, 2, read_i16, write_i16, peek_i16, append_i16, read_i16, write_i16;
    u16, 2, read_u16, write_u16, peek_u16, append_u16, read_u16, write_u16;
    i32, 4, read_i32, write_i32, peek_i32, append_i32, read_i32, write_i32;
    u32, 4, read_u32, write_u32, peek_u32, append_u32, read_u32, write_u32;
    i64, 8, read_i64, write_i64, peek_i64, append_i64, read_i64, write_i64;
    u64, 8, read_u64, write_u64, peek_u64, append_u64, read_u64, write_u64;
    f32, 4, read_f32, write_f32, peek_f32, append_f32, read_f32, write_f32;
    f64, 8, read_f64, write_f64, peek_f64, append_f64, read_f64, write_f64;
}

impl<'a> Buffer<'a> {
    /// Read exactly `size` bytes at the cursor as text.
    ///
    /// With `trim_nul` the result stops at the first NUL byte (the
    /// usual fixed-field convention); the cursor still advances by the
    /// full `size`. Invalid UTF-8 is replaced, not rejected.
    pub fn read_string(&mut self, size: usize, trim_nul: bool) -> Result<String> {
        let pos = self.take(size)?;
        let mut bytes = &self.data()[pos..pos + size];
        if trim_nul {
            if let Some(nul) = bytes.iter().position(|&b| b == 0) {
                bytes = &bytes[..nul];
            }
        }
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Write string bytes at the cursor.
    ///
    /// With a `width`, the field is truncated or NUL-padded to exactly
    /// `width` bytes; without one, exactly the string's bytes are
    /// written.
    pub fn write_string(&mut self, value: &str, width: Option<usize>) -> Result<()> {
        let bytes = value.as_bytes();
        let width = width.unwrap_or(bytes.len());
        let size = bytes.len().min(width);

        self.put(size)?.copy_from_slice(&bytes[..size]);
        self.write_repeated(0, width - size)
    }

    /// Append string bytes at the end of valid data, with the same
    /// fixed-width rules as [`write_string`](Self::write_string).
    pub fn append_string(&mut self, value: &str, width: Option<usize>) -> Result<()> {
        let bytes = value.as_bytes();
        let width = width.unwrap_or(bytes.len());
        let size = bytes.len().min(width);

        self.put_end(size)?.copy_from_slice(&bytes[..size]);
        self.append_repeated(0, width - size)
    }

    /// Write `count` copies of `value` at the cursor.
    pub fn write_repeated(&mut self, value: u8, count: usize) -> Result<()> {
        if count > 0 {
            self.put(count)?.fill(value);
        }
        Ok(())
    }

    /// Append `count` copies of `value` at the end of valid data.
    pub fn append_repeated(&mut self, value: u8, count: usize) -> Result<()> {
        if count > 0 {
            self.put_end(count)?.fill(value);
        }
        Ok(())
    }

    /// Append raw bytes at the end of valid data, leaving the cursor
    /// alone.
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<()> {
        if !data.is_empty() {
            self.put_end(data.len())?.copy_from_slice(data);
        }
        Ok(())
    }
}

impl Clone for Buffer<'_> {
    /// Cloning always produces an owned, growable copy.
    fn clone(&self) -> Buffer<'static> {
        self.to_owned_buffer()
    }
}

impl std::ops::Index<usize> for Buffer<'_> {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_slice()[index]
    }
}

impl Stream for Buffer<'_> {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        !self.is_read_only()
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let num = buf.len().min(self.remaining());
        if num > 0 {
            let pos = self.pos;
            buf[..num].copy_from_slice(&self.data()[pos..pos + num]);
            self.pos += num;
        }
        Ok(num)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if !buf.is_empty() {
            self.put(buf.len())?.copy_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(offset) => self.pos as i64 + offset,
            SeekFrom::End(offset) => self.len as i64 + offset,
        };
        if target < 0 {
            return Err(OxiStreamError::index_out_of_range(0, self.len));
        }
        self.set_position(target as usize)?;
        Ok(self.pos as u64)
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.pos as u64)
    }

    fn stream_len(&mut self) -> Result<u64> {
        Ok(self.len as u64)
    }

    fn set_stream_len(&mut self, len: u64) -> Result<()> {
        self.set_len(len as usize)
    }

    fn close(&mut self) -> Result<()> {
        self.storage = Storage::Owned(Vec::new());
        self.pos = 0;
        self.len = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_from_zero_capacity() {
        let mut buf = Buffer::new();
        assert_eq!(buf.capacity(), 0);

        let mut grew = false;
        for n in 0u8..100 {
            let before = buf.capacity();
            buf.append_u8(n).unwrap();
            if buf.capacity() > before {
                grew = true;
            }
        }

        assert_eq!(buf.len(), 100);
        assert!(grew);
        // Doubling growth never discards data already written.
        let expected: Vec<u8> = (0u8..100).collect();
        assert_eq!(buf.as_slice(), &expected[..]);
    }

    #[test]
    fn test_growth_floor_and_doubling() {
        let mut buf = Buffer::new();
        buf.reserve(1).unwrap();
        assert_eq!(buf.capacity(), MIN_CAPACITY);

        buf.reserve(65).unwrap();
        assert_eq!(buf.capacity(), 128);

        // A request far beyond double wins over doubling.
        buf.reserve(1000).unwrap();
        assert_eq!(buf.capacity(), 1000);
    }

    #[test]
    fn test_read_only_rejects_mutation() {
        let data = [1u8, 2, 3, 4];
        let mut buf = Buffer::borrow(&data);

        assert!(buf.is_read_only());
        assert!(buf.is_fixed());
        assert!(!buf.can_write());
        assert!(matches!(
            buf.write_u8(9),
            Err(OxiStreamError::InvalidOperation { .. })
        ));
        assert!(matches!(
            buf.reserve(100),
            Err(OxiStreamError::InvalidOperation { .. })
        ));
        assert!(matches!(
            buf.clear(true),
            Err(OxiStreamError::InvalidOperation { .. })
        ));

        // Reading and a plain clear are still fine.
        let mut fresh = Buffer::borrow(&data);
        assert_eq!(fresh.read_u8().unwrap(), 1);
        fresh.clear(false).unwrap();
    }

    #[test]
    fn test_fixed_capacity_rejects_growth() {
        let mut scratch = [0u8; 8];
        let mut buf = Buffer::borrow_mut(&mut scratch);
        buf.clear(false).unwrap();

        for n in 0..8 {
            buf.write_u8(n).unwrap();
        }
        assert!(matches!(
            buf.write_u8(8),
            Err(OxiStreamError::InvalidOperation { .. })
        ));

        drop(buf);
        assert_eq!(scratch, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_compact() {
        let mut buf = Buffer::from_vec(b"hello world".to_vec());
        buf.forward(6).unwrap();

        buf.compact().unwrap();
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.as_slice(), b"world");

        // No-op at position zero.
        buf.compact().unwrap();
        assert_eq!(buf.as_slice(), b"world");

        // Equivalent to clear once everything was consumed.
        buf.forward(5).unwrap();
        buf.compact().unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_compact_is_unobservable_through_reads() {
        let mut plain = Buffer::from_vec((0u8..50).collect());
        let mut compacted = Buffer::from_vec((0u8..50).collect());
        plain.forward(20).unwrap();
        compacted.forward(20).unwrap();
        compacted.compact().unwrap();

        let mut a = [0u8; 30];
        let mut b = [0u8; 30];
        Stream::read(&mut plain, &mut a).unwrap();
        Stream::read(&mut compacted, &mut b).unwrap();
        assert_eq!(a, b);
        assert_eq!(plain.remaining(), compacted.remaining());
    }

    #[test]
    fn test_flip_and_rewind() {
        let mut buf = Buffer::new();
        buf.write_u8(b'a').unwrap();
        buf.write_u8(b'b').unwrap();

        buf.flip();
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.read_u8().unwrap(), b'a');

        buf.rewind();
        assert_eq!(buf.read_u8().unwrap(), b'a');
    }

    #[test]
    fn test_primitive_roundtrip_both_orders() {
        for endian in [Endian::BIG, Endian::LITTLE] {
            let mut buf = Buffer::new().with_endian(endian);
            buf.write_u16(0x1234).unwrap();
            buf.write_i32(-77).unwrap();
            buf.write_u64(u64::MAX - 5).unwrap();
            buf.write_f64(1.25).unwrap();

            buf.rewind();
            assert_eq!(buf.read_u16().unwrap(), 0x1234);
            assert_eq!(buf.read_i32().unwrap(), -77);
            assert_eq!(buf.read_u64().unwrap(), u64::MAX - 5);
            assert_eq!(buf.read_f64().unwrap(), 1.25);
        }
    }

    #[test]
    fn test_cross_order_integer_is_reversed_float_is_not() {
        let mut big = Buffer::new().with_endian(Endian::BIG);
        big.write_u32(0x0102_0304).unwrap();
        big.write_f32(2.5).unwrap();

        let mut little = Buffer::borrow(big.as_slice()).with_endian(Endian::LITTLE);
        assert_eq!(little.read_u32().unwrap(), 0x0403_0201);
        assert_eq!(little.read_f32().unwrap(), 2.5);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut buf = Buffer::from_vec(vec![0xAA, 0xBB, 0xCC]);
        for _ in 0..3 {
            assert_eq!(buf.peek_u8(0).unwrap(), 0xAA);
        }
        assert_eq!(buf.peek_u8(1).unwrap(), 0xBB);
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.read_u8().unwrap(), 0xAA);
        assert_eq!(buf.position(), 1);
    }

    #[test]
    fn test_read_past_length_fails() {
        let mut buf = Buffer::from_vec(vec![1, 2, 3]);
        assert!(buf.read_u32().is_err());
        assert!(buf.peek_u32(0).is_err());
        // A failed read leaves the cursor alone.
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn test_append_leaves_cursor_alone() {
        let mut buf = Buffer::new();
        buf.write_u8(1).unwrap();
        buf.rewind();

        buf.append_u16(0x0203).unwrap();
        buf.append_bytes(&[9, 9]).unwrap();
        assert_eq!(buf.position(), 0);
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.read_u8().unwrap(), 1);
    }

    #[test]
    fn test_string_fields() {
        let mut buf = Buffer::new();
        buf.write_string("abc", Some(6)).unwrap();
        assert_eq!(buf.as_slice(), b"abc\0\0\0");

        buf.rewind();
        assert_eq!(buf.read_string(6, true).unwrap(), "abc");
        assert_eq!(buf.position(), 6);

        buf.rewind();
        assert_eq!(buf.read_string(6, false).unwrap(), "abc\0\0\0");

        // Truncation beyond the field width.
        let mut buf = Buffer::new();
        buf.write_string("toolong", Some(4)).unwrap();
        assert_eq!(buf.as_slice(), b"tool");
    }

    #[test]
    fn test_find() {
        let buf = Buffer::from_vec(b"key=value\n".to_vec());
        assert_eq!(buf.find(0, b'='), Some(3));
        assert_eq!(buf.find(4, b'='), None);
        assert_eq!(buf.find_any(0, b"\r\n"), Some(9));
        assert_eq!(buf.find_any(0, b"xz"), None);
    }

    #[test]
    fn test_clone_is_owned_and_growable() {
        let data = [1u8, 2, 3];
        let borrowed = Buffer::borrow(&data);
        let mut copy = borrowed.clone();

        assert!(!copy.is_read_only());
        assert!(!copy.is_fixed());
        copy.append_u8(4).unwrap();
        assert_eq!(copy.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_stream_role() {
        let mut buf = Buffer::new();
        Stream::write_all(&mut buf, b"stream role").unwrap();
        assert_eq!(buf.stream_len().unwrap(), 11);

        buf.seek(SeekFrom::Start(7)).unwrap();
        let mut tail = [0u8; 4];
        Stream::read_exact(&mut buf, &mut tail).unwrap();
        assert_eq!(&tail, b"role");

        // Seeking past the valid extent is rejected.
        assert!(buf.seek(SeekFrom::End(1)).is_err());
        assert!(buf.seek(SeekFrom::Start(100)).is_err());
        assert!(matches!(
            buf.seek(SeekFrom::Current(-100)),
            Err(OxiStreamError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_set_len_clamps_cursor() {
        let mut buf = Buffer::from_vec(vec![0; 10]);
        buf.forward(8).unwrap();
        buf.set_len(4).unwrap();
        assert_eq!(buf.position(), 4);
    }
}
