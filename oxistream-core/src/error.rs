//! Error types for OxiStream operations.
//!
//! This module provides a comprehensive error type that covers all possible
//! error conditions in the stream layer: low-level I/O failures, exhausted
//! streams, buffer capacity violations, timeouts, and API misuse.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// The main error type for OxiStream operations.
#[derive(Debug, Error)]
pub enum OxiStreamError {
    /// I/O error from an underlying backend stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An exact-size read or peek could not be satisfied.
    #[error("Unexpected end of stream: expected {expected} more bytes")]
    EndOfStream {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// A single required extent exceeds the configured buffer capacity,
    /// even after compaction.
    #[error("Buffer overflow: need {needed} bytes, capacity is {capacity}")]
    BufferOverflow {
        /// Number of bytes the caller required at once.
        needed: usize,
        /// Configured buffer capacity.
        capacity: usize,
    },

    /// A timeout-bound wait expired before the operation completed.
    #[error("Timed out after {millis} ms")]
    Timeout {
        /// The timeout that expired, in milliseconds.
        millis: u64,
    },

    /// A structural limit of an encoding was violated (e.g. an overlong
    /// 7-bit encoded integer).
    #[error("Format error: {message}")]
    Format {
        /// Description of the format violation.
        message: String,
    },

    /// The operation is not valid in the current state (reset without a
    /// mark, mutating a read-only buffer, writing to a closed writer).
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of the misuse.
        message: String,
    },

    /// The bound stream does not support the requested capability.
    #[error("Not supported: {operation}")]
    NotSupported {
        /// Name of the unsupported operation.
        operation: String,
    },

    /// A position or index lies outside the valid data extent.
    #[error("Index out of range: {index} exceeds length {length}")]
    IndexOutOfRange {
        /// The offending position.
        index: usize,
        /// The valid data extent.
        length: usize,
    },
}

/// Result type alias for OxiStream operations.
pub type Result<T> = std::result::Result<T, OxiStreamError>;

impl OxiStreamError {
    /// Create an end-of-stream error.
    pub fn end_of_stream(expected: usize) -> Self {
        Self::EndOfStream { expected }
    }

    /// Create a buffer overflow error.
    pub fn buffer_overflow(needed: usize, capacity: usize) -> Self {
        Self::BufferOverflow { needed, capacity }
    }

    /// Create a timeout error from the duration that expired.
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout {
            millis: duration.as_millis() as u64,
        }
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create a not supported error.
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, length: usize) -> Self {
        Self::IndexOutOfRange { index, length }
    }

    /// True if this error is a timeout (from either a timed wait or a
    /// timeout-capable backend read).
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    /// True if this error signals the end of the underlying data.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiStreamError::end_of_stream(4);
        assert!(err.to_string().contains("expected 4 more bytes"));

        let err = OxiStreamError::buffer_overflow(9000, 8192);
        assert!(err.to_string().contains("9000"));
        assert!(err.to_string().contains("8192"));

        let err = OxiStreamError::not_supported("seek");
        assert!(err.to_string().contains("seek"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err: OxiStreamError = io_err.into();
        assert!(matches!(err, OxiStreamError::Io(_)));
    }

    #[test]
    fn test_predicates() {
        assert!(OxiStreamError::timeout(Duration::from_millis(50)).is_timeout());
        assert!(!OxiStreamError::end_of_stream(1).is_timeout());
        assert!(OxiStreamError::end_of_stream(1).is_end_of_stream());
    }
}
