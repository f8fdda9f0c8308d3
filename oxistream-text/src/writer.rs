//! Formatted text output over the buffered [`Writer`].

use oxistream_core::error::{OxiStreamError, Result};
use oxistream_core::stream::Stream;
use oxistream_core::writer::Writer;
use std::fmt::Display;

/// Line ending written by the `write_line` family.
const LINE_ENDING: &str = "\n";

/// Pushes text and formatted values through a buffered writer.
///
/// Anything implementing [`Display`] can be written directly; full
/// format-string control is available through [`TextWriter::write_fmt`]
/// and the standard `write!` macro.
#[derive(Debug)]
pub struct TextWriter<'a> {
    writer: Writer<'a>,
}

impl<'a> TextWriter<'a> {
    /// Write to `stream` with the default buffer capacity.
    pub fn new(stream: impl Stream + 'a) -> Self {
        Self {
            writer: Writer::new(stream),
        }
    }

    /// Write to `stream` with an explicit buffer capacity.
    pub fn with_capacity(stream: impl Stream + 'a, capacity: usize) -> Self {
        Self {
            writer: Writer::with_capacity(stream, capacity),
        }
    }

    /// Wrap an existing writer, keeping its buffered state.
    pub fn from_writer(writer: Writer<'a>) -> Self {
        Self { writer }
    }

    /// The underlying buffered writer.
    pub fn writer(&mut self) -> &mut Writer<'a> {
        &mut self.writer
    }

    /// Switch write-through mode on or off.
    pub fn set_auto_flush(&mut self, auto_flush: bool) -> Result<()> {
        self.writer.set_auto_flush(auto_flush)
    }

    /// Push everything buffered to the stream.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    /// Flush, release the buffer, and close an owned stream.
    pub fn close(&mut self) -> Result<()> {
        self.writer.close()
    }

    /// Write a string verbatim.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.writer.write(text.as_bytes())
    }

    /// Write a single character, UTF-8 encoded.
    pub fn write_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.writer.write(ch.encode_utf8(&mut buf).as_bytes())
    }

    /// Write any displayable value (numbers, booleans, paths...).
    pub fn write_value<T: Display>(&mut self, value: T) -> Result<()> {
        self.write_fmt(format_args!("{value}"))
    }

    /// Write preformatted arguments, as produced by `format_args!`.
    /// The standard `write!`/`writeln!` macros route through here.
    pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) -> Result<()> {
        struct Adapter<'w, 'a> {
            writer: &'w mut Writer<'a>,
            error: Option<OxiStreamError>,
        }

        impl std::fmt::Write for Adapter<'_, '_> {
            fn write_str(&mut self, s: &str) -> std::fmt::Result {
                match self.writer.write(s.as_bytes()) {
                    Ok(()) => Ok(()),
                    Err(err) => {
                        self.error = Some(err);
                        Err(std::fmt::Error)
                    }
                }
            }
        }

        let mut adapter = Adapter {
            writer: &mut self.writer,
            error: None,
        };
        match std::fmt::Write::write_fmt(&mut adapter, args) {
            Ok(()) => Ok(()),
            Err(_) => Err(adapter
                .error
                .take()
                .unwrap_or_else(|| OxiStreamError::format("value failed to format"))),
        }
    }

    /// Write a line ending.
    pub fn write_line_end(&mut self) -> Result<()> {
        self.writer.write(LINE_ENDING.as_bytes())
    }

    /// Write a string followed by a line ending.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_str(text)?;
        self.write_line_end()
    }

    /// Write a displayable value followed by a line ending.
    pub fn write_value_line<T: Display>(&mut self, value: T) -> Result<()> {
        self.write_value(value)?;
        self.write_line_end()
    }
}
