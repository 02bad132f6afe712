//! Binary property list serialization.
//!
//! Encoding happens in two steps. Any `Serialize` type is first turned into a
//! [`Value`] tree by [`to_value`](crate::to_value), then the [`Serializer`]
//! flattens that tree into a `bplist00` document.
//!
//! ## Overview
//!
//! - **Breadth-first layout**: the root is object 0; every reference written
//!   for a container assigns the next free index and queues the child
//! - **String interning**: each distinct string is written once and shared by
//!   every key and value that uses it
//! - **Fixed widths**: 1- or 8-byte integers, 8-byte reals, 2-byte references
//!   and 4-byte offsets (see [`crate::format`])
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_bplist::to_vec;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let bytes = to_vec(&Data { x: 1, y: 2 }).unwrap();
//! assert!(bytes.starts_with(b"bplist00"));
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_bplist::{Serializer, Value};
//!
//! let value = Value::from(vec![Value::from(true), Value::from(5)]);
//! let bytes = Serializer::new(&value).finish().unwrap();
//!
//! // array of two refs, then `true`, then `5`
//! assert_eq!(&bytes[8..16], &[0xa2, 0x00, 0x01, 0x00, 0x02, 0x09, 0x10, 0x05]);
//! ```

use crate::format::{self, Trailer};
use crate::value::UID_TOKEN;
use crate::{Dictionary, Error, Integer, Result, Uid, Value};
use serde::{ser, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Largest object index a 2-byte reference can address.
const MAX_INDEX: usize = u16::MAX as usize;

/// Longest UID payload a marker nibble can describe.
const MAX_UID_LEN: usize = 16;

/// An object waiting in the work queue.
#[derive(Clone, Copy)]
enum Pending<'a> {
    Value(&'a Value),
    Key(&'a str),
}

/// The bplist encoder.
///
/// Walks a [`Value`] tree breadth-first and writes a complete document.
/// Created via [`Serializer::new`], consumed by [`Serializer::finish`].
pub struct Serializer<'a> {
    output: Vec<u8>,
    queue: VecDeque<Pending<'a>>,
    offsets: Vec<u64>,
    strings: HashMap<&'a str, u16>,
    assigned: usize,
}

impl<'a> Serializer<'a> {
    /// Creates an encoder whose top object is `root`.
    pub fn new(root: &'a Value) -> Self {
        let mut output = Vec::with_capacity(256);
        output.extend_from_slice(format::MAGIC);
        let mut strings = HashMap::new();
        if let Value::String(s) = root {
            strings.insert(s.as_str(), 0);
        }
        Serializer {
            output,
            queue: VecDeque::from([Pending::Value(root)]),
            offsets: Vec::new(),
            strings,
            assigned: 1,
        }
    }

    /// Writes every queued object, the offset table and the trailer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] if the document needs more objects
    /// than a 2-byte reference can address, an offset does not fit 4 bytes,
    /// or a UID has no valid length.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        while let Some(pending) = self.queue.pop_front() {
            self.offsets.push(self.output.len() as u64);
            match pending {
                Pending::Value(value) => self.write_value(value)?,
                Pending::Key(key) => self.write_string(key),
            }
        }

        let offset_table_start = self.output.len() as u64;
        for &offset in &self.offsets {
            if offset > u64::from(u32::MAX) {
                return Err(Error::unsupported_value(format!(
                    "object offset {:#x} does not fit a {}-byte offset table entry",
                    offset,
                    format::ENCODE_OFFSET_SIZE
                )));
            }
            format::write_sized_uint(&mut self.output, offset, format::ENCODE_OFFSET_SIZE)?;
        }

        let trailer = Trailer {
            offset_size: format::ENCODE_OFFSET_SIZE,
            ref_size: format::ENCODE_REF_SIZE,
            object_count: self.offsets.len() as u64,
            top_object: 0,
            offset_table_start,
        };
        trailer.write(&mut self.output);
        debug!(
            objects = trailer.object_count,
            strings = self.strings.len(),
            bytes = self.output.len(),
            "encoded bplist"
        );
        Ok(self.output)
    }

    /// Assigns `pending` an index (reusing an interned string's) and queues it.
    fn reference(&mut self, pending: Pending<'a>) -> Result<u16> {
        let string = match pending {
            Pending::Value(Value::String(s)) => Some(s.as_str()),
            Pending::Key(k) => Some(k),
            Pending::Value(_) => None,
        };
        if let Some(index) = string.and_then(|s| self.strings.get(s)) {
            return Ok(*index);
        }

        if self.assigned > MAX_INDEX {
            return Err(Error::unsupported_value(format!(
                "document needs more than {} objects for {}-byte references",
                MAX_INDEX + 1,
                format::ENCODE_REF_SIZE
            )));
        }
        let index = self.assigned as u16;
        self.assigned += 1;
        if let Some(s) = string {
            self.strings.insert(s, index);
        }
        self.queue.push_back(pending);
        Ok(index)
    }

    fn write_ref(&mut self, index: u16) -> Result<()> {
        format::write_sized_uint(&mut self.output, u64::from(index), format::ENCODE_REF_SIZE)
    }

    fn write_integer(&mut self, value: Integer) {
        let raw = value.as_unsigned();
        if raw < 256 {
            self.output.push(format::marker(format::TYPE_INTEGER, 0));
            self.output.push(raw as u8);
        } else {
            self.output.push(format::marker(format::TYPE_INTEGER, 3));
            self.output.extend_from_slice(&raw.to_be_bytes());
        }
    }

    /// Writes a marker whose size nibble is `count`, extended when it does not fit.
    fn write_sized_marker(&mut self, type_code: u8, count: usize) {
        if count < usize::from(format::EXTENDED_SIZE) {
            self.output.push(format::marker(type_code, count as u8));
        } else {
            self.output
                .push(format::marker(type_code, format::EXTENDED_SIZE));
            self.write_integer(Integer::from(count as u64));
        }
    }

    fn write_string(&mut self, s: &str) {
        if s.is_ascii() {
            self.write_sized_marker(format::TYPE_ASCII_STRING, s.len());
            self.output.extend_from_slice(s.as_bytes());
        } else {
            let units: Vec<u16> = s.encode_utf16().collect();
            self.write_sized_marker(format::TYPE_UTF16_STRING, units.len());
            for unit in units {
                self.output.extend_from_slice(&unit.to_be_bytes());
            }
        }
    }

    fn write_uid(&mut self, uid: &Uid) -> Result<()> {
        let bytes = uid.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_UID_LEN {
            return Err(Error::unsupported_value(format!(
                "UID of {} bytes, expected 1 to {}",
                bytes.len(),
                MAX_UID_LEN
            )));
        }
        self.output
            .push(format::marker(format::TYPE_UID, (bytes.len() - 1) as u8));
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn write_array(&mut self, items: &'a [Value]) -> Result<()> {
        self.write_sized_marker(format::TYPE_ARRAY, items.len());
        for item in items {
            let index = self.reference(Pending::Value(item))?;
            self.write_ref(index)?;
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &'a Dictionary) -> Result<()> {
        self.write_sized_marker(format::TYPE_DICTIONARY, dict.len());
        for key in dict.keys() {
            let index = self.reference(Pending::Key(key))?;
            self.write_ref(index)?;
        }
        for value in dict.values() {
            let index = self.reference(Pending::Value(value))?;
            self.write_ref(index)?;
        }
        Ok(())
    }

    fn write_value(&mut self, value: &'a Value) -> Result<()> {
        match value {
            Value::Null => self.output.push(format::NULL),
            Value::Bool(b) => self.output.push(if *b { format::TRUE } else { format::FALSE }),
            Value::Integer(i) => self.write_integer(*i),
            Value::Real(f) => {
                self.output.push(format::marker(format::TYPE_REAL, 3));
                self.output.extend_from_slice(&f.to_be_bytes());
            }
            Value::Data(bytes) => {
                self.write_sized_marker(format::TYPE_DATA, bytes.len());
                self.output.extend_from_slice(bytes);
            }
            Value::String(s) => self.write_string(s),
            Value::Uid(uid) => self.write_uid(uid)?,
            Value::Array(items) => self.write_array(items)?,
            Value::Dictionary(dict) => self.write_dictionary(dict)?,
        }
        Ok(())
    }
}

/// Converts `Serialize` types into a [`Value`] tree.
pub struct ValueSerializer;

pub struct SerializeArray {
    vec: Vec<Value>,
}

pub struct SerializeDictionary {
    map: Dictionary,
    current_key: Option<String>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: Dictionary,
}

/// Wraps a variant's payload in the single-key dictionary `{variant: value}`.
fn variant_dictionary(variant: &str, value: Value) -> Value {
    let mut map = Dictionary::with_capacity(1);
    map.insert(variant.to_string(), value);
    Value::Dictionary(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeDictionary;
    type SerializeStruct = SerializeDictionary;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(Integer::from(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        if let Ok(v) = i64::try_from(v) {
            self.serialize_i64(v)
        } else if let Ok(v) = u64::try_from(v) {
            self.serialize_u64(v)
        } else {
            Err(Error::unsupported_value(format!(
                "integer {} does not fit 64 bits",
                v
            )))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Integer(Integer::from(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        match u64::try_from(v) {
            Ok(v) => self.serialize_u64(v),
            Err(_) => Err(Error::unsupported_value(format!(
                "integer {} does not fit 64 bits",
                v
            ))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Real(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Real(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Data(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        if name != UID_TOKEN {
            return value.serialize(self);
        }
        match value.serialize(self)? {
            Value::Data(bytes) => Ok(Value::Uid(Uid::new(bytes))),
            other => Err(Error::unsupported_value(format!(
                "UID payload must be bytes, found {:?}",
                other
            ))),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(variant_dictionary(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray> {
        Ok(SerializeArray::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray> {
        Ok(SerializeArray::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeArray> {
        Ok(SerializeArray::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeDictionary> {
        Ok(SerializeDictionary::new(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeDictionary> {
        Ok(SerializeDictionary::new(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: Dictionary::with_capacity(len),
        })
    }
}

impl SerializeArray {
    fn new(capacity: usize) -> Self {
        SerializeArray {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeDictionary {
    fn new(capacity: usize) -> Self {
        SerializeDictionary {
            map: Dictionary::with_capacity(capacity),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeMap for SerializeDictionary {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::unsupported_value(format!(
                "dictionary keys must be strings, found {:?}",
                other
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.current_key.take().ok_or_else(|| {
            Error::unsupported_value("serialize_value called without serialize_key")
        })?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dictionary(self.map))
    }
}

impl ser::SerializeStruct for SerializeDictionary {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dictionary(self.map))
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(variant_dictionary(self.variant, Value::Array(self.vec)))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(variant_dictionary(self.variant, Value::Dictionary(self.map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plist;

    fn encode(value: &Value) -> Vec<u8> {
        Serializer::new(value).finish().unwrap()
    }

    /// Object table bytes between the magic and the offset table.
    fn objects(bytes: &[u8]) -> &[u8] {
        let start = bytes.len() - format::TRAILER_SIZE as usize;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[start + 24..]);
        &bytes[8..u64::from_be_bytes(raw) as usize]
    }

    #[test]
    fn test_scalars() {
        assert_eq!(objects(&encode(&Value::Null)), &[0x00]);
        assert_eq!(objects(&encode(&Value::from(true))), &[0x09]);
        assert_eq!(objects(&encode(&Value::from(false))), &[0x08]);
        assert_eq!(objects(&encode(&Value::from(5))), &[0x10, 0x05]);
        assert_eq!(
            objects(&encode(&Value::from(1000))),
            &[0x13, 0, 0, 0, 0, 0, 0, 0x03, 0xe8]
        );
        assert_eq!(
            objects(&encode(&Value::from(-1))),
            &[0x13, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        let mut real = vec![0x23];
        real.extend_from_slice(&1.5f64.to_be_bytes());
        assert_eq!(objects(&encode(&Value::from(1.5))), real.as_slice());
    }

    #[test]
    fn test_strings() {
        assert_eq!(objects(&encode(&Value::from("abc"))), &[0x53, b'a', b'b', b'c']);
        assert_eq!(
            objects(&encode(&Value::from("café"))),
            &[0x64, 0x00, 0x63, 0x00, 0x61, 0x00, 0x66, 0x00, 0xe9]
        );
    }

    #[test]
    fn test_extended_counts() {
        let data = Value::Data(vec![0xaa; 15]);
        let bytes = encode(&data);
        assert_eq!(&objects(&bytes)[..3], &[0x4f, 0x10, 15]);
        assert_eq!(objects(&bytes).len(), 18);

        let long = "y".repeat(300);
        let bytes = encode(&Value::from(long.as_str()));
        assert_eq!(
            &objects(&bytes)[..10],
            &[0x5f, 0x13, 0, 0, 0, 0, 0, 0, 0x01, 0x2c]
        );

        let array = Value::Array(vec![Value::Null; 14]);
        assert_eq!(objects(&encode(&array))[0], 0xae);
    }

    #[test]
    fn test_uid() {
        let uid = Value::Uid(Uid::new(vec![0x01, 0x02, 0x03]));
        assert_eq!(objects(&encode(&uid)), &[0x82, 0x01, 0x02, 0x03]);

        let empty = Value::Uid(Uid::new(Vec::new()));
        assert!(matches!(
            Serializer::new(&empty).finish(),
            Err(Error::UnsupportedValue(_))
        ));
        let long = Value::Uid(Uid::new(vec![0; 17]));
        assert!(Serializer::new(&long).finish().is_err());
    }

    #[test]
    fn test_strings_are_interned() {
        let value = plist!({ "a": "x", "b": "x", "x": "a" });
        let bytes = encode(&value);
        // dictionary, "a", "b", "x"
        assert_eq!(
            objects(&bytes),
            &[
                0xd3, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x03, 0x00, 0x03, 0x00, 0x01,
                0x51, b'a', 0x51, b'b', 0x51, b'x',
            ]
        );
    }

    #[test]
    fn test_offset_table_and_trailer() {
        let value = Value::Array(vec![Value::from(1), Value::from(2)]);
        let bytes = encode(&value);
        let tail = &bytes[bytes.len() - 44..];
        // offsets 8, 13, 15 as 4-byte entries
        assert_eq!(&tail[..12], &[0, 0, 0, 8, 0, 0, 0, 13, 0, 0, 0, 15]);
        assert_eq!(&tail[12..20], &[0, 0, 0, 0, 0, 0, 4, 2]);
        assert_eq!(&tail[20..28], &3u64.to_be_bytes());
        assert_eq!(&tail[28..36], &0u64.to_be_bytes());
        assert_eq!(&tail[36..44], &17u64.to_be_bytes());
    }

    #[test]
    fn test_reference_limit() {
        let value = Value::Array((0..=u16::MAX as i64).map(Value::from).collect());
        let err = Serializer::new(&value).finish().unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue(_)));

        let fits = Value::Array(vec![Value::Null; u16::MAX as usize]);
        assert!(Serializer::new(&fits).finish().is_ok());
    }

    #[test]
    fn test_value_serializer() {
        use serde::Serialize;

        #[derive(Serialize)]
        struct Point {
            x: i32,
            #[serde(rename = "Label")]
            label: Option<String>,
        }

        let value = Point { x: 3, label: None }.serialize(ValueSerializer).unwrap();
        assert_eq!(value, plist!({ "x": 3, "Label": null }));

        assert_eq!(
            u64::MAX.serialize(ValueSerializer).unwrap(),
            Value::Integer(Integer::from_bits(u64::MAX))
        );
        assert!(u128::MAX.serialize(ValueSerializer).is_err());
        assert_eq!(
            Uid::from(9u64).serialize(ValueSerializer).unwrap(),
            Value::Uid(Uid::new(vec![9]))
        );
    }

    #[test]
    fn test_value_serializer_rejects() {
        use serde::Serialize;
        use std::collections::BTreeMap;

        let mut map = BTreeMap::new();
        map.insert(1, "one");
        assert!(matches!(
            map.serialize(ValueSerializer),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_data_variants_become_single_key_dictionaries() {
        use serde::Serialize;

        #[derive(Serialize)]
        enum Shape {
            Circle(u8),
            Line(u8, u8),
            Rect { w: u8 },
        }

        assert_eq!(
            Shape::Circle(3).serialize(ValueSerializer).unwrap(),
            plist!({ "Circle": 3 })
        );
        assert_eq!(
            Shape::Line(1, 2).serialize(ValueSerializer).unwrap(),
            plist!({ "Line": [1, 2] })
        );
        assert_eq!(
            Shape::Rect { w: 4 }.serialize(ValueSerializer).unwrap(),
            plist!({ "Rect": { "w": 4 } })
        );
    }
}
