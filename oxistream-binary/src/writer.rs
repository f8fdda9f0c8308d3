//! Typed binary encoding over the buffered [`Writer`].

use oxistream_core::endian::{ByteOrder, Endian};
use oxistream_core::error::Result;
use oxistream_core::stream::Stream;
use oxistream_core::writer::Writer;

/// Encodes primitive values to a stream in a configured byte order.
///
/// Multi-byte integers are laid out per the configured [`Endian`];
/// floats are copied bit-for-bit. Values are encoded in place into
/// the writer's buffer, so small fields cost no intermediate copies.
#[derive(Debug)]
pub struct BinaryWriter<'a> {
    writer: Writer<'a>,
    endian: Endian,
}

impl<'a> BinaryWriter<'a> {
    /// Encode to `stream` with the default buffer capacity.
    pub fn new(stream: impl Stream + 'a, endian: Endian) -> Self {
        Self {
            writer: Writer::new(stream),
            endian,
        }
    }

    /// Encode to `stream` with an explicit buffer capacity.
    pub fn with_capacity(stream: impl Stream + 'a, endian: Endian, capacity: usize) -> Self {
        Self {
            writer: Writer::with_capacity(stream, capacity),
            endian,
        }
    }

    /// Wrap an existing writer, keeping its buffered state.
    pub fn from_writer(writer: Writer<'a>, endian: Endian) -> Self {
        Self { writer, endian }
    }

    /// The configured byte order tag.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Replace the byte order for subsequent writes.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.endian.set_order(order);
    }

    /// The underlying buffered writer.
    pub fn writer(&mut self) -> &mut Writer<'a> {
        &mut self.writer
    }

    /// Unwrap back into the underlying writer.
    pub fn into_writer(self) -> Writer<'a> {
        self.writer
    }

    /// Write raw bytes unchanged.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write(data)
    }

    /// Push everything buffered to the stream.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    /// Flush, release the buffer, and close an owned stream.
    pub fn close(&mut self) -> Result<()> {
        self.writer.close()
    }

    /// Write a signed byte.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.writer.write_byte(value as u8)
    }

    /// Write an unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_byte(value)
    }

    /// Write a 16-bit signed integer.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        let endian = self.endian;
        endian.write_i16(self.writer.reserve(2)?, value);
        Ok(())
    }

    /// Write a 16-bit unsigned integer.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let endian = self.endian;
        endian.write_u16(self.writer.reserve(2)?, value);
        Ok(())
    }

    /// Write a 32-bit signed integer.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let endian = self.endian;
        endian.write_i32(self.writer.reserve(4)?, value);
        Ok(())
    }

    /// Write a 32-bit unsigned integer.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let endian = self.endian;
        endian.write_u32(self.writer.reserve(4)?, value);
        Ok(())
    }

    /// Write a 64-bit signed integer.
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        let endian = self.endian;
        endian.write_i64(self.writer.reserve(8)?, value);
        Ok(())
    }

    /// Write a 64-bit unsigned integer.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        let endian = self.endian;
        endian.write_u64(self.writer.reserve(8)?, value);
        Ok(())
    }

    /// Write a 32-bit float, bit-for-bit.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let endian = self.endian;
        endian.write_f32(self.writer.reserve(4)?, value);
        Ok(())
    }

    /// Write a 64-bit float, bit-for-bit.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let endian = self.endian;
        endian.write_f64(self.writer.reserve(8)?, value);
        Ok(())
    }

    /// Write string bytes.
    ///
    /// With a `width`, the field is truncated or NUL-padded to exactly
    /// `width` bytes; without one, exactly the string's bytes go out.
    pub fn write_string(&mut self, value: &str, width: Option<usize>) -> Result<()> {
        let bytes = value.as_bytes();
        let width = width.unwrap_or(bytes.len());
        let size = bytes.len().min(width);

        self.writer.write(&bytes[..size])?;
        for _ in size..width {
            self.writer.write_byte(0)?;
        }
        Ok(())
    }

    /// Write a 7-bit encoded unsigned integer: seven value bits per
    /// byte, least significant group first, high bit marks
    /// continuation. Values below 128 take one byte.
    pub fn write_var_u32(&mut self, value: u32) -> Result<()> {
        let mut num = value;
        while num >= 0x80 {
            self.writer.write_byte((num as u8) | 0x80)?;
            num >>= 7;
        }
        self.writer.write_byte(num as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxistream_core::buffer::Buffer;

    fn capture(encode: impl FnOnce(&mut BinaryWriter<'_>)) -> Vec<u8> {
        let mut sink = Buffer::new();
        {
            let mut writer = BinaryWriter::new(&mut sink, Endian::BIG);
            encode(&mut writer);
        }
        sink.as_slice().to_vec()
    }

    #[test]
    fn test_big_endian_layout() {
        let bytes = capture(|w| {
            w.write_u16(0x1234).unwrap();
            w.write_u32(0xDEAD_BEEF).unwrap();
        });
        assert_eq!(bytes, [0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_order_switch_mid_stream() {
        let mut sink = Buffer::new();
        {
            let mut writer = BinaryWriter::new(&mut sink, Endian::BIG);
            writer.write_u16(0x0102).unwrap();
            writer.set_order(ByteOrder::Little);
            writer.write_u16(0x0304).unwrap();
        }
        assert_eq!(sink.as_slice(), &[0x01, 0x02, 0x04, 0x03]);
    }

    #[test]
    fn test_fixed_width_string_pads_with_nul() {
        let bytes = capture(|w| w.write_string("ab", Some(5)).unwrap());
        assert_eq!(bytes, b"ab\0\0\0");

        let bytes = capture(|w| w.write_string("abcdef", Some(3)).unwrap());
        assert_eq!(bytes, b"abc");

        let bytes = capture(|w| w.write_string("plain", None).unwrap());
        assert_eq!(bytes, b"plain");
    }

    #[test]
    fn test_var_u32_boundaries() {
        assert_eq!(capture(|w| w.write_var_u32(0).unwrap()), [0x00]);
        assert_eq!(capture(|w| w.write_var_u32(127).unwrap()), [0x7F]);
        assert_eq!(capture(|w| w.write_var_u32(128).unwrap()), [0x80, 0x01]);
        assert_eq!(
            capture(|w| w.write_var_u32(u32::MAX).unwrap()),
            [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]
        );
    }
}
