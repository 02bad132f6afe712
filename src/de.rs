//! Binary property list deserialization.
//!
//! This module provides the [`Deserializer`] implementation that reads a
//! `bplist00` document from any seekable source and binds it into Rust data
//! structures implementing `Deserialize`.
//!
//! ## Overview
//!
//! - **Trailer first**: the 32-byte trailer and the offset table are loaded
//!   once when the deserializer is created
//! - **Reference resolution**: every nested object is reached by saving the
//!   cursor, seeking to the object's offset, decoding it and seeking back
//! - **Direct binding**: containers are bound element by element into the
//!   target type; no intermediate [`Value`](crate::Value) tree is built unless
//!   `Value` is the requested type
//! - **Strict records**: a dictionary key that matches no field of the target
//!   struct is an error, never silently dropped
//!
//! ## Usage
//!
//! ```rust
//! use serde_bplist::{from_slice, to_vec};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Data { x: i32, y: i32 }
//!
//! let bytes = to_vec(&Data { x: 1, y: 2 }).unwrap();
//! let data: Data = from_slice(&bytes).unwrap();
//! assert_eq!(data, Data { x: 1, y: 2 });
//! ```
//!
//! ## Field matching
//!
//! Dictionary keys are matched against struct fields by exact name first
//! (`#[serde(rename = "...")]` names included), then case-insensitively:
//!
//! ```rust
//! use serde_bplist::{from_slice, plist, to_vec};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Bundle {
//!     #[serde(rename = "CFBundleName")]
//!     name: String,
//!     version: u32,
//! }
//!
//! let bytes = to_vec(&plist!({ "CFBundleName": "Demo", "Version": 3 })).unwrap();
//! let bundle: Bundle = from_slice(&bytes).unwrap();
//! assert_eq!(bundle, Bundle { name: "Demo".to_string(), version: 3 });
//! ```

use crate::format::{self, Trailer};
use crate::options::{DecodeOptions, DuplicateKeys};
use crate::value::UID_TOKEN;
use crate::{Error, Integer, Result};
use serde::de::value::{SeqDeserializer, StringDeserializer};
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;
use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, trace};

/// The bplist deserializer.
///
/// Reads the trailer and offset table on construction, then decodes the top
/// object (and everything it references) when driven by `Deserialize`.
/// Created via [`Deserializer::new`] or [`Deserializer::with_options`].
pub struct Deserializer<R> {
    reader: R,
    trailer: Trailer,
    offsets: Vec<u64>,
    options: DecodeOptions,
    depth: usize,
    next_ref: Option<u64>,
    peeked: Option<Object>,
}

/// One decoded entry of the object table.
///
/// Leaves are fully decoded; containers hold the references of their
/// children, which are resolved lazily as the target type asks for them.
#[derive(Debug)]
enum Object {
    Null,
    Bool(bool),
    /// Raw pattern and payload width in bytes.
    Integer(Integer, u8),
    Real(f64),
    Data(Vec<u8>),
    String(String),
    Uid(Vec<u8>),
    Array(Vec<u64>),
    Dictionary { keys: Vec<u64>, values: Vec<u64> },
}

impl<R: Read + Seek> Deserializer<R> {
    /// Reads the trailer and offset table using default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the magic, trailer or offset table is invalid.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, DecodeOptions::default())
    }

    /// Reads the trailer and offset table using custom options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the magic, trailer or offset table is invalid.
    pub fn with_options(mut reader: R, options: DecodeOptions) -> Result<Self> {
        let trailer = Trailer::read(&mut reader)?;
        debug!(
            objects = trailer.object_count,
            top = trailer.top_object,
            offset_size = trailer.offset_size,
            ref_size = trailer.ref_size,
            offset_table = trailer.offset_table_start,
            "read bplist trailer"
        );

        // Trailer::read validated that the table fits inside the stream.
        let mut offsets = Vec::with_capacity(trailer.object_count as usize);
        for i in 0..trailer.object_count {
            let at = trailer.offset_table_start + i * u64::from(trailer.offset_size);
            offsets.push(format::read_sized_uint(
                &mut reader,
                trailer.offset_size,
                at,
            )?);
        }
        Ok(Deserializer {
            reader,
            trailer,
            offsets,
            options,
            depth: 0,
            next_ref: Some(trailer.top_object),
            peeked: None,
        })
    }

    /// Returns the trailer read from the document.
    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    /// Consumes the deserializer, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn offset_of(&self, index: u64) -> Result<u64> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.offsets.get(i).copied())
            .ok_or_else(|| {
                Error::format(
                    self.trailer.offset_table_start,
                    format!(
                        "reference {} out of range for {} objects",
                        index, self.trailer.object_count
                    ),
                )
            })
    }

    fn position(&mut self) -> Result<u64> {
        self.reader
            .stream_position()
            .map_err(|e| Error::from_read(e, 0))
    }

    fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|e| Error::from_read(e, offset))
    }

    /// Decodes object `index`, restoring the cursor afterwards.
    fn resolve(&mut self, index: u64) -> Result<Object> {
        let offset = self.offset_of(index)?;
        trace!(index, offset, "resolving object");
        let saved = self.position()?;
        self.seek_to(offset)?;
        let object = self.read_object(offset)?;
        self.seek_to(saved)?;
        Ok(object)
    }

    fn resolve_key(&mut self, index: u64) -> Result<String> {
        match self.resolve(index)? {
            Object::String(s) => Ok(s),
            other => Err(Error::format(
                self.offset_of(index)?,
                format!("dictionary key is not a string: {:?}", other),
            )),
        }
    }

    /// Returns the object the next `deserialize_*` call should consume.
    fn take_object(&mut self) -> Result<Object> {
        if let Some(object) = self.peeked.take() {
            return Ok(object);
        }
        match self.next_ref.take() {
            Some(index) => self.resolve(index),
            None => Err(Error::binding("no pending object to deserialize")),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            let at = self.position().unwrap_or(0);
            return Err(Error::format(
                at,
                format!(
                    "nesting exceeds maximum depth of {} (reference cycle?)",
                    self.options.max_depth
                ),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn read_u8(&mut self, offset: u64) -> Result<u8> {
        let mut buf = [0u8; 1];
        format::read_exact(&mut self.reader, &mut buf, offset)?;
        Ok(buf[0])
    }

    /// Reads `len` payload bytes, refusing lengths that run into the offset table.
    fn read_bytes(&mut self, len: u64, offset: u64) -> Result<Vec<u8>> {
        let at = self.position()?;
        match at.checked_add(len) {
            Some(end) if end <= self.trailer.offset_table_start => {}
            _ => {
                return Err(Error::format(
                    offset,
                    format!("object declares {} bytes past the object table", len),
                ))
            }
        }
        let mut buf = vec![0u8; len as usize];
        format::read_exact(&mut self.reader, &mut buf, at)?;
        Ok(buf)
    }

    /// Resolves a size nibble, reading the following integer object when extended.
    fn read_size(&mut self, nibble: u8, offset: u64) -> Result<u64> {
        if nibble != format::EXTENDED_SIZE {
            return Ok(u64::from(nibble));
        }
        let at = self.position()?;
        let marker = self.read_u8(at)?;
        if marker >> 4 != format::TYPE_INTEGER || marker & 0x0f > 3 {
            return Err(Error::format(
                at,
                format!("extended size marker {:#04x} is not an integer", marker),
            ));
        }
        format::read_sized_uint(&mut self.reader, 1 << (marker & 0x0f), at + 1)
            .map_err(|_| Error::format(offset, "truncated extended size"))
    }

    fn read_refs(&mut self, count: u64, offset: u64) -> Result<Vec<u64>> {
        let ref_size = self.trailer.ref_size;
        let bytes = count
            .checked_mul(u64::from(ref_size))
            .ok_or_else(|| Error::format(offset, "reference count overflows"))?;
        let raw = self.read_bytes(bytes, offset)?;
        Ok(raw
            .chunks(ref_size as usize)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
            })
            .collect())
    }

    /// Decodes the tagged object at the current cursor, which sits at `offset`.
    fn read_object(&mut self, offset: u64) -> Result<Object> {
        let marker = self.read_u8(offset)?;
        let nibble = marker & 0x0f;
        match marker >> 4 {
            format::TYPE_SINGLETON => match marker {
                format::NULL => Ok(Object::Null),
                format::FALSE => Ok(Object::Bool(false)),
                format::TRUE => Ok(Object::Bool(true)),
                _ => Err(Error::unsupported_type(marker, offset)),
            },
            format::TYPE_INTEGER if nibble <= 3 => {
                let width = 1 << nibble;
                let raw = format::read_sized_uint(&mut self.reader, width, offset + 1)?;
                Ok(Object::Integer(Integer::from_bits(raw), width))
            }
            format::TYPE_REAL if nibble == 2 => {
                let raw = format::read_sized_uint(&mut self.reader, 4, offset + 1)?;
                Ok(Object::Real(f64::from(f32::from_bits(raw as u32))))
            }
            format::TYPE_REAL if nibble == 3 => {
                let raw = format::read_sized_uint(&mut self.reader, 8, offset + 1)?;
                Ok(Object::Real(f64::from_bits(raw)))
            }
            format::TYPE_DATA => {
                // the nibble is the byte count, as Apple writes it; not count + 1
                let len = self.read_size(nibble, offset)?;
                Ok(Object::Data(self.read_bytes(len, offset)?))
            }
            format::TYPE_ASCII_STRING => {
                let len = self.read_size(nibble, offset)?;
                let bytes = self.read_bytes(len, offset)?;
                // one byte per character; bytes >= 0x80 are read as Latin-1
                Ok(Object::String(bytes.iter().map(|&b| char::from(b)).collect()))
            }
            format::TYPE_UTF16_STRING => {
                let units = self.read_size(nibble, offset)?;
                let len = units
                    .checked_mul(2)
                    .ok_or_else(|| Error::format(offset, "string length overflows"))?;
                let bytes = self.read_bytes(len, offset)?;
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map(Object::String)
                    .map_err(|e| Error::format(offset, format!("invalid UTF-16 string: {}", e)))
            }
            format::TYPE_UID => Ok(Object::Uid(self.read_bytes(u64::from(nibble) + 1, offset)?)),
            format::TYPE_ARRAY => {
                let count = self.read_size(nibble, offset)?;
                Ok(Object::Array(self.read_refs(count, offset)?))
            }
            format::TYPE_DICTIONARY => {
                let count = self.read_size(nibble, offset)?;
                let keys = self.read_refs(count, offset)?;
                let values = self.read_refs(count, offset)?;
                Ok(Object::Dictionary { keys, values })
            }
            _ => Err(Error::unsupported_type(marker, offset)),
        }
    }

    fn visit_object<'de, V>(&mut self, object: Object, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match object {
            Object::Null => visitor.visit_unit(),
            Object::Bool(b) => visitor.visit_bool(b),
            Object::Integer(i, _) => visitor.visit_i64(i.as_signed()),
            Object::Real(f) => visitor.visit_f64(f),
            Object::Data(d) => visitor.visit_byte_buf(d),
            Object::String(s) => visitor.visit_string(s),
            Object::Uid(bytes) => visitor.visit_newtype_struct(ByteBufDeserializer(bytes)),
            Object::Array(refs) => self.visit_array(refs, visitor),
            Object::Dictionary { keys, values } => {
                self.visit_dictionary(keys, values, None, visitor)
            }
        }
    }

    fn deserialize_signed<'de, V>(&mut self, target: u8, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.take_object()? {
            Object::Integer(i, width) => visitor.visit_i64(signed_for_target(i, width, target)),
            other => self.visit_object(other, visitor),
        }
    }

    fn visit_array<'de, V>(&mut self, refs: Vec<u64>, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.enter()?;
        let mut access = ArrayAccess {
            de: self,
            refs: refs.into_iter(),
        };
        let value = visitor.visit_seq(&mut access)?;
        let remaining = access.refs.len();
        if remaining > 0 {
            return Err(Error::binding(format!(
                "array has {} more elements than the target accepts",
                remaining
            )));
        }
        self.leave();
        Ok(value)
    }

    fn visit_dictionary<'de, V>(
        &mut self,
        keys: Vec<u64>,
        values: Vec<u64>,
        record: Option<(&'static str, &'static [&'static str])>,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.enter()?;
        let value = visitor.visit_map(DictionaryAccess {
            de: self,
            keys: keys.into_iter(),
            values: values.into_iter(),
            record,
            seen: HashSet::new(),
        })?;
        self.leave();
        Ok(value)
    }
}

/// Reads an integer payload of `width` bytes for a signed target of `target` bytes.
///
/// Payloads at least as wide as the target are two's complement at their own
/// width; narrower payloads are zero-extended and always fit.
fn signed_for_target(value: Integer, width: u8, target: u8) -> i64 {
    if width < target {
        return value.as_signed();
    }
    let shift = 64 - 8 * u32::from(width.min(8));
    ((value.as_unsigned() << shift) as i64) >> shift
}

/// Finds the struct field a dictionary key binds to: exact match, then case-insensitive.
fn match_field(fields: &'static [&'static str], key: &str) -> Option<&'static str> {
    fields.iter().copied().find(|f| *f == key).or_else(|| {
        fields.iter().copied().find(|f| {
            f.chars()
                .flat_map(char::to_lowercase)
                .eq(key.chars().flat_map(char::to_lowercase))
        })
    })
}

impl<'de, R: Read + Seek> de::Deserializer<'de> for &mut Deserializer<R> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let object = self.take_object()?;
        self.visit_object(object, visitor)
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_signed(1, visitor)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_signed(2, visitor)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_signed(4, visitor)
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_signed(8, visitor)
    }

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_signed(8, visitor)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.take_object()? {
            Object::Integer(i, _) => visitor.visit_u64(i.as_unsigned()),
            other => self.visit_object(other, visitor),
        }
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_u64(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.take_object()? {
            Object::Null => visitor.visit_none(),
            other => {
                self.peeked = Some(other);
                visitor.visit_some(self)
            }
        }
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if name != UID_TOKEN {
            return visitor.visit_newtype_struct(self);
        }
        match self.take_object()? {
            Object::Uid(bytes) => visitor.visit_newtype_struct(ByteBufDeserializer(bytes)),
            Object::Integer(i, _) => visitor.visit_u64(i.as_unsigned()),
            other => self.visit_object(other, visitor),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.take_object()? {
            Object::Data(bytes) => {
                visitor.visit_seq(SeqDeserializer::<_, Error>::new(bytes.into_iter()))
            }
            other => self.visit_object(other, visitor),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.take_object()? {
            Object::Dictionary { keys, values } => {
                self.visit_dictionary(keys, values, Some((name, fields)), visitor)
            }
            other => self.visit_object(other, visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.take_object()? {
            Object::String(s) => {
                let variant: StringDeserializer<Error> = s.into_deserializer();
                visitor.visit_enum(variant)
            }
            Object::Dictionary { keys, values } if keys.len() == 1 => {
                let variant = self.resolve_key(keys[0])?;
                self.enter()?;
                let value = visitor.visit_enum(VariantAccess {
                    de: &mut *self,
                    variant,
                    value: values[0],
                })?;
                self.leave();
                Ok(value)
            }
            other => Err(Error::binding(format!(
                "expected enum `{}` as a string or single-key dictionary, found {:?}",
                name, other
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool f32 f64 char str string
        bytes byte_buf unit unit_struct map identifier ignored_any
    }
}

struct ArrayAccess<'a, R> {
    de: &'a mut Deserializer<R>,
    refs: std::vec::IntoIter<u64>,
}

impl<'de, R: Read + Seek> de::SeqAccess<'de> for ArrayAccess<'_, R> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.refs.next() {
            Some(index) => {
                self.de.next_ref = Some(index);
                seed.deserialize(&mut *self.de).map(Some)
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.refs.len())
    }
}

struct DictionaryAccess<'a, R> {
    de: &'a mut Deserializer<R>,
    keys: std::vec::IntoIter<u64>,
    values: std::vec::IntoIter<u64>,
    /// Struct name and field table when binding into a record.
    record: Option<(&'static str, &'static [&'static str])>,
    seen: HashSet<String>,
}

impl<'de, R: Read + Seek> de::MapAccess<'de> for DictionaryAccess<'_, R> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let index = match self.keys.next() {
            Some(index) => index,
            None => return Ok(None),
        };
        let key = self.de.resolve_key(index)?;

        if !self.seen.insert(key.clone()) && self.de.options.duplicate_keys == DuplicateKeys::Reject
        {
            return Err(Error::format(
                self.de.offset_of(index)?,
                format!("duplicate dictionary key `{}`", key),
            ));
        }

        let key = match self.record {
            Some((name, fields)) => match match_field(fields, &key) {
                Some(field) => field.to_string(),
                None => {
                    return Err(Error::binding(format!(
                        "no field of `{}` matches key `{}`",
                        name, key
                    )))
                }
            },
            None => key,
        };

        let key: StringDeserializer<Error> = key.into_deserializer();
        seed.deserialize(key).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.values.next() {
            Some(index) => {
                self.de.next_ref = Some(index);
                seed.deserialize(&mut *self.de)
            }
            None => Err(Error::binding("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.keys.len())
    }
}

struct VariantAccess<'a, R> {
    de: &'a mut Deserializer<R>,
    variant: String,
    value: u64,
}

impl<'de, R: Read + Seek> de::EnumAccess<'de> for VariantAccess<'_, R> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant: StringDeserializer<Error> = self.variant.clone().into_deserializer();
        let variant = seed.deserialize(variant)?;
        Ok((variant, self))
    }
}

impl<'de, R: Read + Seek> de::VariantAccess<'de> for VariantAccess<'_, R> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        self.de.next_ref = Some(self.value);
        de::Deserialize::deserialize(&mut *self.de)
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        self.de.next_ref = Some(self.value);
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.de.next_ref = Some(self.value);
        de::Deserializer::deserialize_tuple(&mut *self.de, len, visitor)
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.de.next_ref = Some(self.value);
        de::Deserializer::deserialize_struct(&mut *self.de, "", fields, visitor)
    }
}

/// Hands the raw bytes of a UID to a newtype visitor.
struct ByteBufDeserializer(Vec<u8>);

impl<'de> de::Deserializer<'de> for ByteBufDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_byte_buf(self.0)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dictionary, Uid, Value};
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::io::Cursor;

    /// Assembles a document from pre-encoded objects with 1-byte offsets and refs.
    fn document(objects: &[&[u8]]) -> Vec<u8> {
        let mut out = format::MAGIC.to_vec();
        let mut offsets = Vec::new();
        for object in objects {
            offsets.push(out.len() as u8);
            out.extend_from_slice(object);
        }
        let offset_table_start = out.len() as u64;
        out.extend_from_slice(&offsets);
        Trailer {
            offset_size: 1,
            ref_size: 1,
            object_count: objects.len() as u64,
            top_object: 0,
            offset_table_start,
        }
        .write(&mut out);
        out
    }

    fn decode<T: for<'de> Deserialize<'de>>(bytes: Vec<u8>) -> Result<T> {
        let mut de = Deserializer::new(Cursor::new(bytes))?;
        T::deserialize(&mut de)
    }

    #[test]
    fn test_singletons() {
        assert_eq!(decode::<Value>(document(&[&[0x00]])).unwrap(), Value::Null);
        assert!(!decode::<bool>(document(&[&[0x08]])).unwrap());
        assert!(decode::<bool>(document(&[&[0x09]])).unwrap());
    }

    #[test]
    fn test_integer_widths() {
        assert_eq!(decode::<u8>(document(&[&[0x10, 0xff]])).unwrap(), 255);
        assert_eq!(decode::<u16>(document(&[&[0x11, 0x01, 0x00]])).unwrap(), 256);
        assert_eq!(
            decode::<u32>(document(&[&[0x12, 0x00, 0x01, 0x00, 0x00]])).unwrap(),
            65536
        );
        let minus_one = [0x13, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(decode::<i64>(document(&[&minus_one])).unwrap(), -1);
        assert_eq!(decode::<u64>(document(&[&minus_one])).unwrap(), u64::MAX);
        assert_eq!(decode::<Value>(document(&[&minus_one])).unwrap(), Value::from(-1));
    }

    #[test]
    fn test_signed_targets_sign_extend_from_payload_width() {
        assert_eq!(decode::<i8>(document(&[&[0x10, 0xff]])).unwrap(), -1);
        assert_eq!(decode::<i16>(document(&[&[0x11, 0xff, 0xfe]])).unwrap(), -2);
        assert_eq!(
            decode::<i32>(document(&[&[0x12, 0xff, 0xff, 0xff, 0xfe]])).unwrap(),
            -2
        );
        assert_eq!(decode::<i8>(document(&[&[0x10, 0x7f]])).unwrap(), 127);

        // narrower payloads are zero-extended into wider signed targets
        assert_eq!(decode::<i16>(document(&[&[0x10, 0xc8]])).unwrap(), 200);
        assert_eq!(decode::<i64>(document(&[&[0x11, 0xff, 0xfe]])).unwrap(), 65534);
        assert_eq!(decode::<Value>(document(&[&[0x10, 0xff]])).unwrap(), Value::from(255));

        let err = decode::<i8>(document(&[&[0x11, 0x01, 0x00]])).unwrap_err();
        assert!(matches!(err, Error::Binding(_)));
    }

    #[test]
    fn test_128_bit_targets() {
        let max = [0x13, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(decode::<u128>(document(&[&max])).unwrap(), u128::from(u64::MAX));
        assert_eq!(decode::<i128>(document(&[&max])).unwrap(), -1);
        assert_eq!(decode::<u128>(document(&[&[0x10, 0x07]])).unwrap(), 7);

        let bytes = crate::to_vec(&u64::MAX).unwrap();
        assert_eq!(decode::<u128>(bytes).unwrap(), u128::from(u64::MAX));
    }

    #[test]
    fn test_integer_out_of_range_for_target() {
        let err = decode::<u8>(document(&[&[0x11, 0x01, 0x00]])).unwrap_err();
        assert!(matches!(err, Error::Binding(_)));
    }

    #[test]
    fn test_reals() {
        let single = [0x22, 0x3f, 0xc0, 0x00, 0x00];
        assert_eq!(decode::<f64>(document(&[&single])).unwrap(), 1.5);
        let mut double = vec![0x23];
        double.extend_from_slice(&2.25f64.to_be_bytes());
        assert_eq!(decode::<f64>(document(&[&double])).unwrap(), 2.25);
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            decode::<String>(document(&[&[0x53, b'a', b'b', b'c']])).unwrap(),
            "abc"
        );
        // Latin-1 byte in an ASCII string object
        assert_eq!(decode::<String>(document(&[&[0x51, 0xe9]])).unwrap(), "é");
        assert_eq!(
            decode::<String>(document(&[&[0x62, 0x00, 0x63, 0x00, 0xe9]])).unwrap(),
            "cé"
        );
        let lone_surrogate = [0x61, 0xd8, 0x00];
        assert!(matches!(
            decode::<String>(document(&[&lone_surrogate])),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_data_and_uid() {
        assert_eq!(
            decode::<Value>(document(&[&[0x42, 0xde, 0xad]])).unwrap(),
            Value::Data(vec![0xde, 0xad])
        );
        assert_eq!(
            decode::<Vec<u8>>(document(&[&[0x42, 0xde, 0xad]])).unwrap(),
            vec![0xde, 0xad]
        );
        assert_eq!(
            decode::<Value>(document(&[&[0x81, 0x01, 0x02]])).unwrap(),
            Value::Uid(Uid::new(vec![0x01, 0x02]))
        );
        assert_eq!(
            decode::<Uid>(document(&[&[0x80, 0x07]])).unwrap().value(),
            7
        );
    }

    #[test]
    fn test_extended_sizes() {
        let mut string = vec![0x5f, 0x10, 20];
        string.extend_from_slice(&[b'x'; 20]);
        assert_eq!(decode::<String>(document(&[&string])).unwrap(), "x".repeat(20));

        // array of 16 references to object 1
        let mut array = vec![0xaf, 0x10, 16];
        array.extend_from_slice(&[1u8; 16]);
        let items: Vec<u8> = decode(document(&[&array, &[0x10, 0x07]])).unwrap();
        assert_eq!(items, vec![7; 16]);

        // dictionary with 15 distinct keys
        let mut dict = vec![0xdf, 0x10, 15];
        dict.extend(1..=15u8);
        dict.extend(std::iter::repeat(16u8).take(15));
        let keys: Vec<Vec<u8>> = (0..15u8).map(|i| vec![0x51, b'a' + i]).collect();
        let mut objects: Vec<&[u8]> = vec![dict.as_slice()];
        objects.extend(keys.iter().map(Vec::as_slice));
        objects.push(&[0x09]);
        let map: HashMap<String, bool> = decode(document(&objects)).unwrap();
        assert_eq!(map.len(), 15);
        assert!(map.values().all(|v| *v));
    }

    #[test]
    fn test_extended_size_must_be_integer() {
        let bad = [0x5f, 0x53, b'a', b'b', b'c'];
        assert!(matches!(
            decode::<String>(document(&[&bad])),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_dictionary_preserves_file_order() {
        let dict = [0xd2, 1, 2, 3, 3];
        let value: Value =
            decode(document(&[&dict, &[0x51, b'z'], &[0x51, b'a'], &[0x10, 0x01]])).unwrap();
        let keys: Vec<_> = value
            .as_dictionary()
            .map(|d| d.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_non_string_key() {
        let dict = [0xd1, 1, 1];
        let err = decode::<Value>(document(&[&dict, &[0x10, 0x01]])).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_duplicate_keys() {
        let dict = [0xd2, 1, 1, 2, 3];
        let objects: [&[u8]; 4] = [&dict, &[0x51, b'k'], &[0x10, 0x01], &[0x10, 0x02]];

        let err = decode::<Value>(document(&objects)).unwrap_err();
        assert!(err.to_string().contains("duplicate dictionary key `k`"));

        let options = DecodeOptions::new().with_duplicate_keys(DuplicateKeys::LastWins);
        let mut de = Deserializer::with_options(Cursor::new(document(&objects)), options).unwrap();
        let value = Value::deserialize(&mut de).unwrap();
        let mut expected = Dictionary::new();
        expected.insert("k".to_string(), Value::from(2));
        assert_eq!(value, Value::Dictionary(expected));
    }

    #[test]
    fn test_reference_out_of_range() {
        let array = [0xa1, 9];
        let err = decode::<Value>(document(&[&array])).unwrap_err();
        assert!(err.to_string().contains("reference 9 out of range"));
    }

    #[test]
    fn test_reference_cycle_hits_depth_limit() {
        // array whose only element is itself
        let array = [0xa1, 0];
        let err = decode::<Value>(document(&[&array])).unwrap_err();
        assert!(err.to_string().contains("maximum depth"));
    }

    #[test]
    fn test_unsupported_types() {
        let mut date = vec![0x33];
        date.extend_from_slice(&0f64.to_be_bytes());
        assert!(matches!(
            decode::<Value>(document(&[&date])),
            Err(Error::UnsupportedType { marker: 0x33, offset: 8 })
        ));
        assert!(matches!(
            decode::<Value>(document(&[&[0xc0]])),
            Err(Error::UnsupportedType { marker: 0xc0, .. })
        ));
        assert!(matches!(
            decode::<Value>(document(&[&[0x0f]])),
            Err(Error::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let data = [0x4e, 0x00];
        assert!(matches!(
            decode::<Value>(document(&[&data])),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_record_field_matching() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Window {
            #[serde(rename = "NSTitle")]
            title: String,
            width: u32,
        }

        let dict = [0xd2, 1, 2, 3, 4];
        let objects: [&[u8]; 5] = [
            &dict,
            &[0x57, b'N', b'S', b'T', b'i', b't', b'l', b'e'],
            &[0x55, b'W', b'I', b'D', b'T', b'H'],
            &[0x52, b'h', b'i'],
            &[0x10, 80],
        ];
        let window: Window = decode(document(&objects)).unwrap();
        assert_eq!(
            window,
            Window {
                title: "hi".to_string(),
                width: 80
            }
        );
    }

    #[test]
    fn test_record_unknown_key() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Point {
            x: i32,
        }

        let dict = [0xd2, 1, 2, 3, 3];
        let objects: [&[u8]; 4] = [&dict, &[0x51, b'x'], &[0x51, b'z'], &[0x10, 1]];
        let err = decode::<Point>(document(&objects)).unwrap_err();
        assert!(matches!(err, Error::Binding(_)));
        assert!(err.to_string().contains("`z`"));
    }

    #[test]
    fn test_enum_forms() {
        #[derive(Deserialize, Debug, PartialEq)]
        enum Shape {
            Empty,
            Circle(u8),
            Rect { w: u8, h: u8 },
        }

        assert_eq!(
            decode::<Shape>(document(&[&[0x55, b'E', b'm', b'p', b't', b'y']])).unwrap(),
            Shape::Empty
        );

        let circle: [&[u8]; 3] = [&[0xd1, 1, 2], b"\x56Circle", &[0x10, 3]];
        assert_eq!(decode::<Shape>(document(&circle)).unwrap(), Shape::Circle(3));

        let rect: [&[u8]; 6] = [
            &[0xd1, 1, 2],
            b"\x54Rect",
            &[0xd2, 3, 4, 5, 5],
            b"\x51w",
            b"\x51h",
            &[0x10, 2],
        ];
        assert_eq!(
            decode::<Shape>(document(&rect)).unwrap(),
            Shape::Rect { w: 2, h: 2 }
        );
    }

    #[test]
    fn test_tuple_length_mismatch() {
        let array = [0xa3, 1, 1, 1];
        let err = decode::<(u8, u8)>(document(&[&array, &[0x10, 1]])).unwrap_err();
        assert!(matches!(err, Error::Binding(_)));
    }

    #[test]
    fn test_match_field() {
        const FIELDS: &[&str] = &["name", "Name", "size"];
        assert_eq!(match_field(FIELDS, "Name"), Some("Name"));
        assert_eq!(match_field(FIELDS, "NAME"), Some("name"));
        assert_eq!(match_field(FIELDS, "SİZE"), None);
        assert_eq!(match_field(FIELDS, "Size"), Some("size"));
        assert_eq!(match_field(FIELDS, "colour"), None);
    }
}
