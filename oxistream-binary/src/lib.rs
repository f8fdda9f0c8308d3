//! # OxiStream Binary
//!
//! Endianness-aware binary codec for the OxiStream stream I/O library.
//!
//! This crate layers typed encoding and decoding on top of the
//! buffered engines from `oxistream-core`:
//!
//! - [`BinaryReader`]: primitive reads, lookahead peeks, 7-bit encoded
//!   integers, fixed-size strings
//! - [`BinaryWriter`]: the mirror image, encoding values in place into
//!   the writer's buffer
//! - [`hex`]: uppercase hex encoding and tolerant decoding
//!
//! ## Example
//!
//! ```rust
//! use oxistream_binary::{BinaryReader, BinaryWriter};
//! use oxistream_core::buffer::Buffer;
//! use oxistream_core::endian::Endian;
//!
//! let mut wire = Buffer::new();
//! {
//!     let mut writer = BinaryWriter::new(&mut wire, Endian::BIG);
//!     writer.write_u16(0xCAFE).unwrap();
//!     writer.write_var_u32(300).unwrap();
//! }
//!
//! let mut reader = BinaryReader::from_bytes(wire.as_slice(), Endian::BIG);
//! assert_eq!(reader.read_u16().unwrap(), 0xCAFE);
//! assert_eq!(reader.read_var_u32().unwrap(), 300);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod hex;
pub mod reader;
pub mod writer;

// Re-exports for convenience
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::hex;
    pub use crate::reader::BinaryReader;
    pub use crate::writer::BinaryWriter;
    pub use oxistream_core::endian::{ByteOrder, Endian};
    pub use oxistream_core::error::{OxiStreamError, Result};
}
