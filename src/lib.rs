//! # serde_bplist
//!
//! A Serde-compatible codec for Apple's binary property list format (`bplist00`).
//!
//! ## What is a binary plist?
//!
//! Binary property lists are the compact on-disk form of Apple property lists,
//! used for preferences, `Info.plist` bundles and `NSKeyedArchiver` archives.
//! A document is a flat table of tagged objects; containers refer to their
//! children by index, and a trailer at the end of the file locates everything.
//!
//! ## Key Features
//!
//! - **Serde Compatible**: decode straight into `#[derive(Deserialize)]` types,
//!   encode anything that implements `Serialize`
//! - **On-Demand Object Resolution**: the offset table is loaded once, then
//!   each object is read from any `Read + Seek` source when the target type
//!   asks for it; no intermediate tree is built unless you ask for [`Value`]
//! - **Strict Binding**: a dictionary key with no matching struct field is an
//!   error, never silently ignored
//! - **Hostile Input Safe**: every offset, reference and length is bounds
//!   checked, and reference cycles hit a depth limit instead of the stack
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_bplist = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Encoding and Decoding
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_bplist::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     active: true,
//! };
//!
//! let bytes = to_vec(&user).unwrap();
//! assert!(bytes.starts_with(b"bplist00"));
//!
//! let user_back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values with the plist! Macro
//!
//! ```rust
//! use serde_bplist::{from_slice, plist, to_vec, Value};
//!
//! let data = plist!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "serde"]
//! });
//!
//! let decoded: Value = from_slice(&to_vec(&data).unwrap()).unwrap();
//! assert_eq!(decoded, data);
//! ```
//!
//! ## Supported Objects
//!
//! Null, booleans, integers (up to 8 bytes), reals, data, ASCII and UTF-16
//! strings, UIDs, arrays and dictionaries. Dates and sets are rejected with
//! [`Error::UnsupportedType`]. See [`format`] for the byte layout and the
//! encoder's width policy.

pub mod de;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod value;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use map::Dictionary;
pub use options::{DecodeOptions, DuplicateKeys};
pub use ser::{Serializer, ValueSerializer};
pub use value::{Integer, Uid, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, Cursor};

/// Encode any `T: Serialize` as a binary plist.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::to_vec;
///
/// let bytes = to_vec(&vec![true, false]).unwrap();
/// assert_eq!(&bytes[..8], b"bplist00");
/// assert_eq!(&bytes[8..15], &[0xa2, 0x00, 0x01, 0x00, 0x02, 0x09, 0x08]);
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] if the value has a shape the format
/// cannot represent (non-string map keys, integers wider than 64 bits) or
/// exceeds the encoder's fixed widths.
///
/// Unit enum variants are written as strings; newtype, tuple and struct
/// variants as the single-key dictionary `{variant: payload}`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let value = to_value(value)?;
    Serializer::new(&value).finish()
}

/// Encode any `T: Serialize` as a binary plist into a writer.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert!(buffer.starts_with(b"bplist00"));
/// ```
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let bytes = to_vec(value)?;
    writer.write_all(&bytes).map_err(Error::io)?;
    Ok(())
}

/// Convert any `T: Serialize` into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_bplist::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_dictionary());
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] if the value has no plist representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Decode an instance of type `T` from a seekable binary plist source.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::{from_reader, to_vec};
/// use std::io::Cursor;
///
/// let bytes = to_vec(&("abc", 5)).unwrap();
/// let pair: (String, u8) = from_reader(Cursor::new(bytes)).unwrap();
/// assert_eq!(pair, ("abc".to_string(), 5));
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] or [`Error::UnsupportedType`] for malformed or
/// unsupported input, and [`Error::Binding`] if the data does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read + io::Seek,
    T: DeserializeOwned,
{
    from_reader_with_options(reader, DecodeOptions::default())
}

/// Decode an instance of type `T` from a seekable source with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::{from_reader_with_options, to_vec, DecodeOptions, Value};
/// use std::io::Cursor;
///
/// let bytes = to_vec(&vec![vec![vec![1]]]).unwrap();
/// let options = DecodeOptions::new().with_max_depth(2);
/// let result: Result<Value, _> = from_reader_with_options(Cursor::new(bytes), options);
/// assert!(result.is_err());
/// ```
///
/// # Errors
///
/// Same as [`from_reader`], plus [`Error::Format`] when nesting exceeds
/// [`DecodeOptions::max_depth`] or a duplicate key is rejected.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R, T>(reader: R, options: DecodeOptions) -> Result<T>
where
    R: io::Read + io::Seek,
    T: DeserializeOwned,
{
    let mut deserializer = Deserializer::with_options(reader, options)?;
    T::deserialize(&mut deserializer)
}

/// Decode an instance of type `T` from an in-memory binary plist.
///
/// # Examples
///
/// ```rust
/// use serde_bplist::{from_slice, to_vec};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = to_vec(&Point { x: 1, y: -2 }).unwrap();
/// let point: Point = from_slice(&bytes).unwrap();
/// assert_eq!(point, Point { x: 1, y: -2 });
/// ```
///
/// # Errors
///
/// Same as [`from_reader`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_reader(Cursor::new(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let bytes = to_vec(&point).unwrap();
        let point_back: Point = from_slice(&bytes).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Zoë".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let bytes = to_vec(&user).unwrap();
        let user_back: User = from_slice(&bytes).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_to_value() {
        let point = Point { x: 1, y: 2 };
        let value = to_value(&point).unwrap();

        match value {
            Value::Dictionary(dict) => {
                assert_eq!(dict.get("x"), Some(&Value::from(1)));
                assert_eq!(dict.get("y"), Some(&Value::from(2)));
            }
            _ => panic!("Expected dictionary"),
        }
    }

    #[test]
    fn test_maps_and_options() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Some(1u64));
        map.insert("b".to_string(), None);
        map.insert("c".to_string(), Some(u64::MAX));

        let bytes = to_vec(&map).unwrap();
        let map_back: BTreeMap<String, Option<u64>> = from_slice(&bytes).unwrap();
        assert_eq!(map, map_back);
    }

    #[test]
    fn test_to_writer_matches_to_vec() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Point { x: 7, y: 8 }).unwrap();
        assert_eq!(buffer, to_vec(&Point { x: 7, y: 8 }).unwrap());
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = to_vec(&true).unwrap();
        bytes[7] = b'1';
        assert!(matches!(
            from_slice::<bool>(&bytes),
            Err(Error::Format { offset: 0, .. })
        ));
    }
}
