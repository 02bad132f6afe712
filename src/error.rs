//! Error types for binary property list encoding and decoding.
//!
//! Every failure is terminal for the call that produced it: there is no
//! partial-result mode. Decoding failures carry the stream offset at which
//! they were detected so malformed files can be inspected with a hex dump.
//!
//! ## Error Categories
//!
//! - **Format**: bad magic, malformed trailer, out-of-bounds offsets or references
//! - **Unsupported type**: a tag byte with no decode rule (e.g. dates, sets)
//! - **Unsupported value**: an input shape the encoder cannot represent
//! - **Binding**: a decoded value has no destination in the target type
//!
//! ## Examples
//!
//! ```rust
//! use serde_bplist::{from_slice, Error, Value};
//!
//! let result: Result<Value, Error> = from_slice(b"not a plist at all, definitely not one");
//! assert!(matches!(result, Err(Error::Format { .. })));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding a bplist.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Structural problem with the binary layout
    #[error("Invalid bplist at offset {offset:#x}: {msg}")]
    Format { offset: u64, msg: String },

    /// Tag byte whose type code has no decode rule
    #[error(
        "Unsupported object type at offset {offset:#x}: marker {marker:#04x} (type {:#x}, size {:#x})",
        .marker >> 4,
        .marker & 0x0f
    )]
    UnsupportedType { marker: u8, offset: u64 },

    /// Input value the encoder cannot represent
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Decoded value cannot be bound into the requested type
    #[error("Binding error: {0}")]
    Binding(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a format error at the given stream offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bplist::Error;
    ///
    /// let err = Error::format(0, "invalid magic");
    /// assert!(err.to_string().contains("invalid magic"));
    /// ```
    pub fn format<T: fmt::Display>(offset: u64, msg: T) -> Self {
        Error::Format {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported type error for the raw marker byte found at `offset`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bplist::Error;
    ///
    /// let err = Error::unsupported_type(0x33, 8);
    /// assert!(err.to_string().contains("type 0x3"));
    /// ```
    pub fn unsupported_type(marker: u8, offset: u64) -> Self {
        Error::UnsupportedType { marker, offset }
    }

    /// Creates an unsupported value error for input the encoder cannot write.
    pub fn unsupported_value<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }

    /// Creates a binding error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bplist::Error;
    ///
    /// let err = Error::binding("no field matches key `Color`");
    /// assert!(err.to_string().contains("Color"));
    /// ```
    pub fn binding<T: fmt::Display>(msg: T) -> Self {
        Error::Binding(msg.to_string())
    }

    /// Creates an I/O error.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    /// Converts an I/O error raised while reading at `offset`.
    ///
    /// Truncation and out-of-range seeks mean the file is malformed, so they
    /// become [`Error::Format`]; anything else is a genuine I/O failure.
    pub(crate) fn from_read(err: io::Error, offset: u64) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidInput => {
                Error::format(offset, format!("read out of bounds ({})", err))
            }
            _ => Error::io(err),
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedValue(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Binding(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
