//! # OxiStream Core
//!
//! Core components for the OxiStream stream I/O library.
//!
//! This crate provides the foundation layer every higher protocol
//! builds on:
//!
//! - [`stream`]: The `Stream` capability trait all byte backends implement
//! - [`buffer`]: Growable byte buffer, also usable as an in-memory stream
//! - [`reader`]: Buffered pull engine with lookahead, mark/reset, and timeout bridging
//! - [`writer`]: Buffered push engine with auto-flush and deferred-error close
//! - [`endian`]: Byte order tags and the in-memory primitive codec
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! OxiStream is designed as a layered protocol stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Consumers                                           │
//! │     protocol parsers, file formats, text scanning      │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Typed codecs                                        │
//! │     BinaryReader/BinaryWriter, TextReader/TextWriter   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Buffering engines (this crate)                      │
//! │     Reader, Writer, Buffer, Endian                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ L0: Stream backends                                     │
//! │     memory, files, sockets, pipes (via the trait)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxistream_core::buffer::Buffer;
//! use oxistream_core::reader::Reader;
//! use oxistream_core::writer::Writer;
//!
//! // Accumulate data through a buffered writer.
//! let mut sink = Buffer::new();
//! {
//!     let mut writer = Writer::new(&mut sink);
//!     writer.write(b"hello stream").unwrap();
//! }
//!
//! // Pull it back through a buffered reader.
//! let mut reader = Reader::from_bytes(sink.as_slice());
//! let mut word = [0u8; 5];
//! reader.read_exact(&mut word).unwrap();
//! assert_eq!(&word, b"hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod endian;
pub mod error;
pub mod reader;
pub mod stream;
pub mod writer;

// Re-exports for convenience
pub use buffer::{Buffer, MemoryStream};
pub use endian::{ByteOrder, Endian};
pub use error::{OxiStreamError, Result};
pub use reader::{Acquired, Reader};
pub use stream::{ReadTimeoutGuard, SeekFrom, Stream};
pub use writer::Writer;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::buffer::{Buffer, MemoryStream};
    pub use crate::endian::{ByteOrder, Endian};
    pub use crate::error::{OxiStreamError, Result};
    pub use crate::reader::{Acquired, Reader};
    pub use crate::stream::{SeekFrom, Stream};
    pub use crate::writer::Writer;
}
