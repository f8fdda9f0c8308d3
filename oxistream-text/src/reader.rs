//! Text scanning over the buffered [`Reader`].
//!
//! [`TextReader`] layers line, token, and delimiter-driven scanning on
//! the core pull engine. Scanning is byte-oriented and ASCII-aware
//! (case folding, digit tests); accumulated text is returned as
//! `String` with invalid UTF-8 replaced rather than rejected.
//!
//! Delimiter searches (`read_to`, `read_to_first_of`, `read_quoted`)
//! lean on the reader's single-byte pushback, so a delimiter can be
//! left unconsumed for the next scanning step.

use oxistream_core::error::{OxiStreamError, Result};
use oxistream_core::reader::Reader;
use oxistream_core::stream::Stream;
use std::str::FromStr;

/// Spaces and tabs.
const BLANKS: &[u8] = b" \t";

/// All ASCII whitespace, line breaks included.
const WHITESPACE: &[u8] = b" \t\r\n\x0B\x0C";

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A text scanner over a stream or byte range.
#[derive(Debug)]
pub struct TextReader<'a> {
    reader: Reader<'a>,
}

impl<'a> TextReader<'a> {
    /// Scan `stream` with the default buffer capacity.
    pub fn new(stream: impl Stream + 'a) -> Self {
        Self {
            reader: Reader::new(stream),
        }
    }

    /// Scan `stream` with an explicit buffer capacity.
    pub fn with_capacity(stream: impl Stream + 'a, capacity: usize) -> Self {
        Self {
            reader: Reader::with_capacity(stream, capacity),
        }
    }

    /// Scan a fixed byte range, zero-copy.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::from_bytes(data),
        }
    }

    /// Scan an in-memory string.
    pub fn from_text(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Wrap an existing reader, keeping its buffered state.
    pub fn from_reader(reader: Reader<'a>) -> Self {
        Self { reader }
    }

    /// The underlying buffered reader.
    pub fn reader(&mut self) -> &mut Reader<'a> {
        &mut self.reader
    }

    /// True once all data has been consumed.
    pub fn eof(&mut self) -> Result<bool> {
        self.reader.eof()
    }

    /// Release the buffer and close an owned stream.
    pub fn close(&mut self) -> Result<()> {
        self.reader.close()
    }

    /// Read one line, accepting both LF and CRLF endings. The line
    /// terminator is consumed but not returned. `None` at
    /// end-of-stream.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        if self.reader.eof()? {
            return Ok(None);
        }

        let mut line = Vec::new();
        while let Some(byte) = self.reader.read_byte()? {
            match byte {
                b'\r' => {
                    if self.reader.peek()? == Some(b'\n') {
                        self.reader.read_byte()?;
                    }
                    break;
                }
                b'\n' => break,
                _ => line.push(byte),
            }
        }
        Ok(Some(lossy(line)))
    }

    /// Read everything remaining as one string.
    pub fn read_to_end(&mut self) -> Result<String> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let num = self.reader.read(&mut chunk)?;
            if num == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..num]);
        }
        Ok(lossy(out))
    }

    /// Skip spaces and tabs. Returns the number skipped.
    pub fn skip_blanks(&mut self) -> Result<usize> {
        self.skip_chars(BLANKS)
    }

    /// Skip all whitespace, line breaks included. Returns the number
    /// skipped.
    pub fn skip_whitespace(&mut self) -> Result<usize> {
        self.skip_chars(WHITESPACE)
    }

    /// Skip bytes while they belong to `set`, leaving the first
    /// non-member unconsumed. Returns the number skipped.
    pub fn skip_chars(&mut self, set: &[u8]) -> Result<usize> {
        let mut skipped = 0;
        while let Some(byte) = self.reader.read_byte()? {
            if set.contains(&byte) {
                skipped += 1;
            } else {
                self.reader.unread(byte)?;
                break;
            }
        }
        Ok(skipped)
    }

    /// True if the upcoming bytes spell `prefix`, without consuming
    /// anything. Case folding is ASCII-only.
    pub fn starts_with(&mut self, prefix: &str, case_sensitive: bool) -> Result<bool> {
        let needle = prefix.as_bytes();
        if needle.is_empty() {
            return Ok(true);
        }
        match self.reader.peek_bytes(needle.len()) {
            Ok(window) if case_sensitive => Ok(window == needle),
            Ok(window) => Ok(window.eq_ignore_ascii_case(needle)),
            Err(err) if err.is_end_of_stream() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Scan until `delimiter`, returning the text passed over, or
    /// `None` when the data ends first. With `step_over` the
    /// delimiter is consumed; otherwise it stays unread.
    pub fn read_to(&mut self, delimiter: u8, step_over: bool) -> Result<Option<String>> {
        let mut passed = Vec::new();
        while let Some(byte) = self.reader.read_byte()? {
            if byte == delimiter {
                if !step_over {
                    self.reader.unread(byte)?;
                }
                return Ok(Some(lossy(passed)));
            }
            passed.push(byte);
        }
        Ok(None)
    }

    /// Scan until the multi-byte `pattern`, returning the text passed
    /// over, or `None` when the data ends first. With `step_over` the
    /// pattern itself is consumed.
    pub fn read_to_str(&mut self, pattern: &str, step_over: bool) -> Result<Option<String>> {
        let needle = pattern.as_bytes();
        if needle.is_empty() {
            return Ok(None);
        }

        let mut passed = Vec::new();
        loop {
            match self.reader.peek_bytes(needle.len()) {
                Ok(window) if window == needle => {
                    if step_over {
                        self.reader.skip(needle.len())?;
                    }
                    return Ok(Some(lossy(passed)));
                }
                Ok(_) => {}
                Err(err) if err.is_end_of_stream() => return Ok(None),
                Err(err) => return Err(err),
            }
            if let Some(byte) = self.reader.read_byte()? {
                passed.push(byte);
            }
        }
    }

    /// Scan until any byte in `set`, returning the text passed over,
    /// or `None` when the data ends first.
    pub fn read_to_first_of(&mut self, set: &[u8], step_over: bool) -> Result<Option<String>> {
        let mut passed = Vec::new();
        while let Some(byte) = self.reader.read_byte()? {
            if set.contains(&byte) {
                if !step_over {
                    self.reader.unread(byte)?;
                }
                return Ok(Some(lossy(passed)));
            }
            passed.push(byte);
        }
        Ok(None)
    }

    /// Scan until an unescaped `delimiter`. Escape sequences are kept
    /// verbatim in the returned text (the consumer unescapes).
    pub fn read_escaped_to(
        &mut self,
        delimiter: u8,
        step_over: bool,
        escape: u8,
    ) -> Result<Option<String>> {
        let mut passed = Vec::new();
        loop {
            let Some(mut byte) = self.reader.read_byte()? else {
                return Ok(None);
            };

            if byte == delimiter {
                if !step_over {
                    self.reader.unread(byte)?;
                }
                return Ok(Some(lossy(passed)));
            }

            if byte == escape {
                passed.push(byte);
                match self.reader.read_byte()? {
                    Some(next) => byte = next,
                    None => return Ok(None),
                }
            }
            passed.push(byte);
        }
    }

    /// Scan forward to an opening quote and return the quoted content,
    /// consuming the closing quote.
    ///
    /// `marks` gives the opening mark and, optionally, a distinct
    /// closing mark (`"<>"` style); a single mark closes itself. A
    /// missing quote on either side is a [`OxiStreamError::Format`]
    /// error.
    pub fn read_quoted(&mut self, marks: &str, escape: u8) -> Result<String> {
        let mut bytes = marks.bytes();
        let open = bytes
            .next()
            .ok_or_else(|| OxiStreamError::invalid_operation("empty quote marks"))?;
        let close = bytes.next().unwrap_or(open);

        if self.read_to(open, true)?.is_none() {
            return Err(OxiStreamError::format("opening quote not found"));
        }
        self.read_escaped_to(close, true, escape)?
            .ok_or_else(|| OxiStreamError::format("closing quote not found"))
    }

    /// Read one token: a run of alphanumerics and underscores, plus
    /// sign or decimal-point characters when they lead a digit, plus
    /// anything in `extra`.
    ///
    /// Leading whitespace is skipped. With `step_over`, trailing
    /// blanks after the token are consumed too (but a line break or a
    /// following token stays unread); without it, the delimiter byte
    /// stays unread. An empty string means no token was available.
    pub fn read_token(&mut self, extra: &[u8], step_over: bool) -> Result<String> {
        self.skip_whitespace()?;

        let mut token = Vec::new();
        loop {
            let Some(byte) = self.reader.read_byte()? else {
                break;
            };

            if self.is_token_byte(byte, extra)? {
                token.push(byte);
                continue;
            }

            if step_over {
                let mut delimiter = Some(byte);
                if byte == b' ' || byte == b'\t' {
                    self.skip_blanks()?;
                    delimiter = self.reader.read_byte()?;
                }
                if let Some(next) = delimiter {
                    if matches!(next, b'\r' | b'\n') || self.is_token_byte(next, extra)? {
                        self.reader.unread(next)?;
                    }
                }
            } else {
                // Keep the delimiter unread for the caller.
                self.reader.unread(byte)?;
            }
            break;
        }

        Ok(lossy(token))
    }

    /// Read a token and parse it as `i32`.
    pub fn token_as_i32(&mut self, extra: &[u8], step_over: bool) -> Result<i32> {
        self.parse_token(extra, step_over)
    }

    /// Read a token and parse it as `u32`.
    pub fn token_as_u32(&mut self, extra: &[u8], step_over: bool) -> Result<u32> {
        self.parse_token(extra, step_over)
    }

    /// Read a token and parse it as `i64`.
    pub fn token_as_i64(&mut self, extra: &[u8], step_over: bool) -> Result<i64> {
        self.parse_token(extra, step_over)
    }

    /// Read a token and parse it as `f64`.
    pub fn token_as_f64(&mut self, extra: &[u8], step_over: bool) -> Result<f64> {
        self.parse_token(extra, step_over)
    }

    /// Read a token and interpret it as a boolean: `true`/`false`,
    /// `yes`/`no`, `on`/`off`, `1`/`0`, case-insensitive.
    pub fn token_as_bool(&mut self, extra: &[u8], step_over: bool) -> Result<bool> {
        let token = self.read_token(extra, step_over)?;
        match token.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(OxiStreamError::format(format!(
                "invalid boolean token {token:?}"
            ))),
        }
    }

    /// Consume input through the next `lines` line endings. Returns
    /// false when the data ends before that many lines passed.
    pub fn move_to_next_line(&mut self, lines: usize) -> Result<bool> {
        let mut remaining = lines;
        while remaining > 0 {
            let Some(byte) = self.reader.read_byte()? else {
                return Ok(false);
            };
            match byte {
                b'\r' => {
                    if self.reader.peek()? == Some(b'\n') {
                        self.reader.read_byte()?;
                    }
                    remaining -= 1;
                }
                b'\n' => remaining -= 1,
                _ => {}
            }
        }
        Ok(true)
    }

    /// Advance line by line until one starts (after leading blanks)
    /// with `line`. The matching prefix itself is left unconsumed.
    pub fn move_to_line(&mut self, line: &str) -> Result<bool> {
        loop {
            self.skip_blanks()?;
            if self.starts_with(line, true)? {
                return Ok(true);
            }
            if !self.move_to_next_line(1)? {
                return Ok(false);
            }
        }
    }

    fn parse_token<T: FromStr>(&mut self, extra: &[u8], step_over: bool) -> Result<T> {
        let token = self.read_token(extra, step_over)?;
        token
            .parse()
            .map_err(|_| OxiStreamError::format(format!("invalid numeric token {token:?}")))
    }

    fn is_token_byte(&mut self, byte: u8, extra: &[u8]) -> Result<bool> {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            return Ok(true);
        }
        // A sign or decimal point only starts a token when a digit
        // follows.
        if matches!(byte, b'+' | b'-' | b'.') {
            if let Some(next) = self.reader.peek()? {
                if next.is_ascii_digit() {
                    return Ok(true);
                }
            }
        }
        Ok(extra.contains(&byte))
    }
}
