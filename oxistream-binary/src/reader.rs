//! Typed binary decoding over the buffered [`Reader`].

use oxistream_core::endian::{ByteOrder, Endian};
use oxistream_core::error::{OxiStreamError, Result};
use oxistream_core::reader::Reader;
use oxistream_core::stream::Stream;

/// Decodes primitive values from a stream in a configured byte order.
///
/// All exact-width reads fail with [`OxiStreamError::EndOfStream`]
/// when the data runs out mid-value. The `peek_*` family looks ahead
/// by a byte offset without consuming, bounded by the reader's buffer
/// capacity.
#[derive(Debug)]
pub struct BinaryReader<'a> {
    reader: Reader<'a>,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Decode from `stream` with the default buffer capacity.
    pub fn new(stream: impl Stream + 'a, endian: Endian) -> Self {
        Self {
            reader: Reader::new(stream),
            endian,
        }
    }

    /// Decode from `stream` with an explicit buffer capacity.
    pub fn with_capacity(stream: impl Stream + 'a, endian: Endian, capacity: usize) -> Self {
        Self {
            reader: Reader::with_capacity(stream, capacity),
            endian,
        }
    }

    /// Decode from a fixed byte range, zero-copy.
    pub fn from_bytes(data: &'a [u8], endian: Endian) -> Self {
        Self {
            reader: Reader::from_bytes(data),
            endian,
        }
    }

    /// Wrap an existing reader, keeping its buffered state.
    pub fn from_reader(reader: Reader<'a>, endian: Endian) -> Self {
        Self { reader, endian }
    }

    /// The configured byte order tag.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Replace the byte order for subsequent reads.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.endian.set_order(order);
    }

    /// The underlying buffered reader.
    pub fn reader(&mut self) -> &mut Reader<'a> {
        &mut self.reader
    }

    /// Unwrap back into the underlying reader.
    pub fn into_reader(self) -> Reader<'a> {
        self.reader
    }

    /// True once all data has been consumed.
    pub fn eof(&mut self) -> Result<bool> {
        self.reader.eof()
    }

    /// Consume and discard up to `num_bytes`.
    pub fn skip(&mut self, num_bytes: usize) -> Result<usize> {
        self.reader.skip(num_bytes)
    }

    /// Remember the current position for [`reset`](Self::reset).
    pub fn mark(&mut self) {
        self.reader.mark();
    }

    /// Forget the active mark.
    pub fn unmark(&mut self) {
        self.reader.unmark();
    }

    /// Rewind to the marked position.
    pub fn reset(&mut self) -> Result<()> {
        self.reader.reset()
    }

    /// Release the buffer and close an owned stream.
    pub fn close(&mut self) -> Result<()> {
        self.reader.close()
    }

    /// Read exactly `data.len()` raw bytes.
    pub fn read_exact(&mut self, data: &mut [u8]) -> Result<()> {
        self.reader.read_exact(data)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn peek_array<const N: usize>(&mut self, offset: usize) -> Result<[u8; N]> {
        self.reader.ensure(offset + N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.reader.buffered()[offset..offset + N]);
        Ok(buf)
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read an unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.reader
            .read_byte()?
            .ok_or_else(|| OxiStreamError::end_of_stream(1))
    }

    /// Read a 16-bit signed integer.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.endian.read_i16(&self.read_array::<2>()?))
    }

    /// Read a 16-bit unsigned integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.endian.read_u16(&self.read_array::<2>()?))
    }

    /// Read a 32-bit signed integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.endian.read_i32(&self.read_array::<4>()?))
    }

    /// Read a 32-bit unsigned integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.endian.read_u32(&self.read_array::<4>()?))
    }

    /// Read a 64-bit signed integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.endian.read_i64(&self.read_array::<8>()?))
    }

    /// Read a 64-bit unsigned integer.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.endian.read_u64(&self.read_array::<8>()?))
    }

    /// Read a 32-bit float, bit-for-bit.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.endian.read_f32(&self.read_array::<4>()?))
    }

    /// Read a 64-bit float, bit-for-bit.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.endian.read_f64(&self.read_array::<8>()?))
    }

    /// Read exactly `size` bytes as a UTF-8 string.
    pub fn read_string(&mut self, size: usize) -> Result<String> {
        let mut bytes = vec![0u8; size];
        self.reader.read_exact(&mut bytes)?;
        String::from_utf8(bytes)
            .map_err(|_| OxiStreamError::format("invalid UTF-8 in string field"))
    }

    /// Read a 7-bit encoded unsigned integer (little-endian groups,
    /// high bit marks continuation).
    ///
    /// A run longer than five bytes cannot encode a 32-bit value and
    /// fails with [`OxiStreamError::Format`].
    pub fn read_var_u32(&mut self) -> Result<u32> {
        let mut result = 0u32;
        let mut shift = 0;

        loop {
            if shift == 35 {
                return Err(OxiStreamError::format("invalid 7-bit encoded integer"));
            }

            let byte = self.read_u8()?;
            result |= u32::from(byte & 0x7F) << shift;
            shift += 7;

            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
    }

    /// Peek a signed byte `offset` bytes ahead.
    pub fn peek_i8(&mut self, offset: usize) -> Result<i8> {
        Ok(self.peek_u8(offset)? as i8)
    }

    /// Peek an unsigned byte `offset` bytes ahead.
    pub fn peek_u8(&mut self, offset: usize) -> Result<u8> {
        Ok(self.peek_array::<1>(offset)?[0])
    }

    /// Peek a 16-bit signed integer `offset` bytes ahead.
    pub fn peek_i16(&mut self, offset: usize) -> Result<i16> {
        Ok(self.endian.read_i16(&self.peek_array::<2>(offset)?))
    }

    /// Peek a 16-bit unsigned integer `offset` bytes ahead.
    pub fn peek_u16(&mut self, offset: usize) -> Result<u16> {
        Ok(self.endian.read_u16(&self.peek_array::<2>(offset)?))
    }

    /// Peek a 32-bit signed integer `offset` bytes ahead.
    pub fn peek_i32(&mut self, offset: usize) -> Result<i32> {
        Ok(self.endian.read_i32(&self.peek_array::<4>(offset)?))
    }

    /// Peek a 32-bit unsigned integer `offset` bytes ahead.
    pub fn peek_u32(&mut self, offset: usize) -> Result<u32> {
        Ok(self.endian.read_u32(&self.peek_array::<4>(offset)?))
    }

    /// Peek a 64-bit signed integer `offset` bytes ahead.
    pub fn peek_i64(&mut self, offset: usize) -> Result<i64> {
        Ok(self.endian.read_i64(&self.peek_array::<8>(offset)?))
    }

    /// Peek a 64-bit unsigned integer `offset` bytes ahead.
    pub fn peek_u64(&mut self, offset: usize) -> Result<u64> {
        Ok(self.endian.read_u64(&self.peek_array::<8>(offset)?))
    }

    /// Peek a 32-bit float `offset` bytes ahead.
    pub fn peek_f32(&mut self, offset: usize) -> Result<f32> {
        Ok(self.endian.read_f32(&self.peek_array::<4>(offset)?))
    }

    /// Peek a 64-bit float `offset` bytes ahead.
    pub fn peek_f64(&mut self, offset: usize) -> Result<f64> {
        Ok(self.endian.read_f64(&self.peek_array::<8>(offset)?))
    }
}
