//! # OxiStream Text
//!
//! Text scanning and formatted output for the OxiStream stream I/O
//! library.
//!
//! This crate is a consumer of the core buffering engines:
//!
//! - [`TextReader`]: line, token, and delimiter-driven scanning with
//!   quoted-string support
//! - [`TextWriter`]: verbatim and `Display`-formatted push output
//!
//! ## Example
//!
//! ```rust
//! use oxistream_text::TextReader;
//!
//! let mut reader = TextReader::from_text("width = 1920\nheight = 1080\n");
//! // Stepping over a token consumes the separator after it too.
//! assert_eq!(reader.read_token(b"", true).unwrap(), "width");
//! assert_eq!(reader.token_as_u32(b"", true).unwrap(), 1920);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod reader;
pub mod writer;

// Re-exports for convenience
pub use reader::TextReader;
pub use writer::TextWriter;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::reader::TextReader;
    pub use crate::writer::TextWriter;
    pub use oxistream_core::error::{OxiStreamError, Result};
}
