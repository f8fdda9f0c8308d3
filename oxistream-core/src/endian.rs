//! Byte order tags and the in-memory primitive codec.
//!
//! This module provides [`ByteOrder`] and [`Endian`], the stateless
//! transforms used by every binary codec in OxiStream. Integers are
//! byte-swapped when the configured order differs from the host's
//! native order; floats are always copied bit-for-bit.
//!
//! # Byte Ordering
//!
//! Only multi-byte integers are order-sensitive. Single bytes pass
//! through untouched, and floats keep the host's IEEE-754 byte layout
//! regardless of the configured order. This mirrors the wire rule of
//! the binary codec: there is no "network float" format here.
//!
//! # Example
//!
//! ```
//! use oxistream_core::endian::Endian;
//!
//! let mut buf = [0u8; 4];
//! Endian::BIG.write_u32(&mut buf, 0x1234_5678);
//! assert_eq!(buf, [0x12, 0x34, 0x56, 0x78]);
//! assert_eq!(Endian::LITTLE.read_u32(&buf), 0x7856_3412);
//! ```
//!
//! No bounds checking beyond slice indexing is performed; callers must
//! guarantee the slice is large enough for the primitive width.

/// Byte order of multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl ByteOrder {
    /// The host's native byte order, determined at compile time.
    pub const NATIVE: ByteOrder = if cfg!(target_endian = "big") {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };

    /// True if this order matches the host's native order.
    pub const fn is_native(self) -> bool {
        matches!(
            (self, ByteOrder::NATIVE),
            (ByteOrder::Big, ByteOrder::Big) | (ByteOrder::Little, ByteOrder::Little)
        )
    }
}

/// An endianness tag bundling a [`ByteOrder`] with primitive
/// encode/decode operations.
///
/// `Endian` is a plain value; copying it is free and all methods are
/// pure transforms over caller-supplied memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endian {
    order: ByteOrder,
}

impl Default for Endian {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Copy the first `N` bytes of a slice into an array.
#[inline]
fn array<const N: usize>(buf: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[..N]);
    out
}

impl Endian {
    /// Big-endian (network order).
    pub const BIG: Endian = Endian {
        order: ByteOrder::Big,
    };

    /// Little-endian.
    pub const LITTLE: Endian = Endian {
        order: ByteOrder::Little,
    };

    /// The host's native order. Equal to either [`Endian::BIG`] or
    /// [`Endian::LITTLE`], fixed at compile time.
    pub const DEFAULT: Endian = Endian {
        order: ByteOrder::NATIVE,
    };

    /// Create a tag for the given order.
    pub const fn new(order: ByteOrder) -> Self {
        Self { order }
    }

    /// The configured byte order.
    pub const fn order(self) -> ByteOrder {
        self.order
    }

    /// Replace the configured byte order.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// True if the configured order is big-endian.
    pub const fn is_big(self) -> bool {
        matches!(self.order, ByteOrder::Big)
    }

    /// True if the configured order is little-endian.
    pub const fn is_little(self) -> bool {
        matches!(self.order, ByteOrder::Little)
    }

    /// True if the configured order matches the host.
    pub const fn is_native(self) -> bool {
        self.order.is_native()
    }

    /// Swap a 16-bit value iff the order differs from native.
    #[inline]
    pub const fn transform16(self, value: u16) -> u16 {
        if self.is_native() { value } else { value.swap_bytes() }
    }

    /// Swap a 32-bit value iff the order differs from native.
    #[inline]
    pub const fn transform32(self, value: u32) -> u32 {
        if self.is_native() { value } else { value.swap_bytes() }
    }

    /// Swap a 64-bit value iff the order differs from native.
    #[inline]
    pub const fn transform64(self, value: u64) -> u64 {
        if self.is_native() { value } else { value.swap_bytes() }
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(self, buf: &[u8]) -> i8 {
        buf[0] as i8
    }

    /// Read an unsigned byte.
    #[inline]
    pub fn read_u8(self, buf: &[u8]) -> u8 {
        buf[0]
    }

    /// Read a 16-bit signed integer in the configured order.
    #[inline]
    pub fn read_i16(self, buf: &[u8]) -> i16 {
        self.read_u16(buf) as i16
    }

    /// Read a 16-bit unsigned integer in the configured order.
    #[inline]
    pub fn read_u16(self, buf: &[u8]) -> u16 {
        self.transform16(u16::from_ne_bytes(array(buf)))
    }

    /// Read a 32-bit signed integer in the configured order.
    #[inline]
    pub fn read_i32(self, buf: &[u8]) -> i32 {
        self.read_u32(buf) as i32
    }

    /// Read a 32-bit unsigned integer in the configured order.
    #[inline]
    pub fn read_u32(self, buf: &[u8]) -> u32 {
        self.transform32(u32::from_ne_bytes(array(buf)))
    }

    /// Read a 64-bit signed integer in the configured order.
    #[inline]
    pub fn read_i64(self, buf: &[u8]) -> i64 {
        self.read_u64(buf) as i64
    }

    /// Read a 64-bit unsigned integer in the configured order.
    #[inline]
    pub fn read_u64(self, buf: &[u8]) -> u64 {
        self.transform64(u64::from_ne_bytes(array(buf)))
    }

    /// Read a 32-bit float. The bit pattern is copied verbatim; byte
    /// order never applies to floats.
    #[inline]
    pub fn read_f32(self, buf: &[u8]) -> f32 {
        f32::from_ne_bytes(array(buf))
    }

    /// Read a 64-bit float. The bit pattern is copied verbatim.
    #[inline]
    pub fn read_f64(self, buf: &[u8]) -> f64 {
        f64::from_ne_bytes(array(buf))
    }

    /// Write a signed byte.
    #[inline]
    pub fn write_i8(self, buf: &mut [u8], value: i8) {
        buf[0] = value as u8;
    }

    /// Write an unsigned byte.
    #[inline]
    pub fn write_u8(self, buf: &mut [u8], value: u8) {
        buf[0] = value;
    }

    /// Write a 16-bit signed integer in the configured order.
    #[inline]
    pub fn write_i16(self, buf: &mut [u8], value: i16) {
        self.write_u16(buf, value as u16);
    }

    /// Write a 16-bit unsigned integer in the configured order.
    #[inline]
    pub fn write_u16(self, buf: &mut [u8], value: u16) {
        buf[..2].copy_from_slice(&self.transform16(value).to_ne_bytes());
    }

    /// Write a 32-bit signed integer in the configured order.
    #[inline]
    pub fn write_i32(self, buf: &mut [u8], value: i32) {
        self.write_u32(buf, value as u32);
    }

    /// Write a 32-bit unsigned integer in the configured order.
    #[inline]
    pub fn write_u32(self, buf: &mut [u8], value: u32) {
        buf[..4].copy_from_slice(&self.transform32(value).to_ne_bytes());
    }

    /// Write a 64-bit signed integer in the configured order.
    #[inline]
    pub fn write_i64(self, buf: &mut [u8], value: i64) {
        self.write_u64(buf, value as u64);
    }

    /// Write a 64-bit unsigned integer in the configured order.
    #[inline]
    pub fn write_u64(self, buf: &mut [u8], value: u64) {
        buf[..8].copy_from_slice(&self.transform64(value).to_ne_bytes());
    }

    /// Write a 32-bit float bit-for-bit.
    #[inline]
    pub fn write_f32(self, buf: &mut [u8], value: f32) {
        buf[..4].copy_from_slice(&value.to_ne_bytes());
    }

    /// Write a 64-bit float bit-for-bit.
    #[inline]
    pub fn write_f64(self, buf: &mut [u8], value: f64) {
        buf[..8].copy_from_slice(&value.to_ne_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_matches_one_order() {
        assert!(Endian::DEFAULT.is_native());
        assert_eq!(Endian::DEFAULT.is_big(), cfg!(target_endian = "big"));
    }

    #[test]
    fn test_transform_native_is_identity() {
        assert_eq!(Endian::DEFAULT.transform16(0x1234), 0x1234);
        assert_eq!(Endian::DEFAULT.transform32(0x1234_5678), 0x1234_5678);
    }

    #[test]
    fn test_big_endian_layout() {
        let mut buf = [0u8; 8];
        Endian::BIG.write_u16(&mut buf, 0x1234);
        assert_eq!(&buf[..2], &[0x12, 0x34]);

        Endian::BIG.write_u32(&mut buf, 0x1234_5678);
        assert_eq!(&buf[..4], &[0x12, 0x34, 0x56, 0x78]);

        Endian::BIG.write_u64(&mut buf, 0x0102_0304_0506_0708);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut buf = [0u8; 4];
        Endian::LITTLE.write_u32(&mut buf, 0x1234_5678);
        assert_eq!(buf, [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_cross_order_read_is_byte_reversed() {
        let mut buf = [0u8; 4];
        Endian::BIG.write_u32(&mut buf, 0x1234_5678);
        assert_eq!(Endian::LITTLE.read_u32(&buf), 0x7856_3412);
    }

    #[test]
    fn test_roundtrip_all_widths() {
        let mut buf = [0u8; 8];
        for endian in [Endian::BIG, Endian::LITTLE, Endian::DEFAULT] {
            endian.write_i16(&mut buf, -1234);
            assert_eq!(endian.read_i16(&buf), -1234);
            endian.write_u32(&mut buf, 0xDEAD_BEEF);
            assert_eq!(endian.read_u32(&buf), 0xDEAD_BEEF);
            endian.write_i64(&mut buf, i64::MIN + 7);
            assert_eq!(endian.read_i64(&buf), i64::MIN + 7);
        }
    }

    #[test]
    fn test_floats_never_swapped() {
        let mut big = [0u8; 8];
        let mut little = [0u8; 8];

        Endian::BIG.write_f32(&mut big, 3.5);
        Endian::LITTLE.write_f32(&mut little, 3.5);
        assert_eq!(big[..4], little[..4]);

        // Reading the same bytes with either order yields the same value.
        assert_eq!(Endian::BIG.read_f32(&big), Endian::LITTLE.read_f32(&big));

        Endian::BIG.write_f64(&mut big, -0.125);
        assert_eq!(Endian::LITTLE.read_f64(&big), -0.125);
    }

    #[test]
    fn test_single_bytes_order_insensitive() {
        let buf = [0x9Au8];
        assert_eq!(Endian::BIG.read_u8(&buf), 0x9A);
        assert_eq!(Endian::LITTLE.read_u8(&buf), 0x9A);
        assert_eq!(Endian::BIG.read_i8(&buf), -102);
    }
}
