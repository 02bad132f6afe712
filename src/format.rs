//! Binary property list layout.
//!
//! This module documents the `bplist00` layout as implemented by this library
//! and holds the constants and low-level helpers shared by the decoder and
//! the encoder.
//!
//! # Document layout
//!
//! ```text
//! offset 0    : 8 bytes   magic "bplist00"
//! offset 8    : object table (tagged, variable-length entries)
//! offset N    : offset table: object_count entries, offset_size bytes each, big-endian
//! offset N+k  : trailer (32 bytes)
//!                 6 bytes  reserved (zero)
//!                 1 byte   offset_size
//!                 1 byte   ref_size
//!                 8 bytes  object_count        (big-endian)
//!                 8 bytes  top_object_index    (big-endian)
//!                 8 bytes  offset_table_start  (big-endian)
//! ```
//!
//! # Object encoding
//!
//! Every object starts with a marker byte. The high nibble is the type code,
//! the low nibble a size parameter.
//!
//! | Marker | Object |
//! |--------|--------|
//! | `0x00` | null |
//! | `0x08` / `0x09` | false / true |
//! | `0x1n` | integer, `2^n` bytes |
//! | `0x22` / `0x23` | 4-byte / 8-byte real |
//! | `0x4n` | data, `n` bytes |
//! | `0x5n` | ASCII string, `n` bytes |
//! | `0x6n` | UTF-16BE string, `n` code units |
//! | `0x8n` | UID, `n+1` bytes |
//! | `0xAn` | array, `n` references |
//! | `0xDn` | dictionary, `n` key references then `n` value references |
//!
//! For data, strings, arrays and dictionaries a size nibble of `0xF` means the
//! real size follows as an integer object.
//!
//! Dates (`0x3`) and sets (`0xB`, `0xC`) are part of the format but are not
//! decoded by this library.
//!
//! # Encoder width policy
//!
//! The encoder favours simplicity over size: integers are written with a
//! 1-byte payload when they fit, otherwise 8 bytes; reals are always 8 bytes;
//! object references are always [`ENCODE_REF_SIZE`] bytes and offset table
//! entries [`ENCODE_OFFSET_SIZE`] bytes. Documents needing more than
//! `u16::MAX + 1` objects are rejected rather than silently truncated.

use crate::{Error, Result};
use std::io::{Read, Seek, SeekFrom};

/// The `bplist00` magic number.
pub const MAGIC: &[u8; 8] = b"bplist00";

/// Size of the trailer at the end of every document.
pub const TRAILER_SIZE: u64 = 32;

/// Reference width written by the encoder.
pub const ENCODE_REF_SIZE: u8 = 2;

/// Offset table entry width written by the encoder.
pub const ENCODE_OFFSET_SIZE: u8 = 4;

/// Size nibble announcing that the real size follows as an integer object.
pub const EXTENDED_SIZE: u8 = 0x0f;

pub const TYPE_SINGLETON: u8 = 0x0;
pub const TYPE_INTEGER: u8 = 0x1;
pub const TYPE_REAL: u8 = 0x2;
pub const TYPE_DATA: u8 = 0x4;
pub const TYPE_ASCII_STRING: u8 = 0x5;
pub const TYPE_UTF16_STRING: u8 = 0x6;
pub const TYPE_UID: u8 = 0x8;
pub const TYPE_ARRAY: u8 = 0xa;
pub const TYPE_DICTIONARY: u8 = 0xd;

pub const NULL: u8 = 0x00;
pub const FALSE: u8 = 0x08;
pub const TRUE: u8 = 0x09;

/// Builds a marker byte from a type code and a size nibble.
#[inline]
pub const fn marker(type_code: u8, size: u8) -> u8 {
    (type_code << 4) | (size & 0x0f)
}

/// The fixed-width trailer found in the last 32 bytes of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trailer {
    pub offset_size: u8,
    pub ref_size: u8,
    pub object_count: u64,
    pub top_object: u64,
    pub offset_table_start: u64,
}

impl Trailer {
    /// Reads and validates the trailer, checking the magic first.
    ///
    /// On success the reader is left positioned at the start of the offset table.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Trailer> {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| Error::from_read(e, 0))?;
        let mut magic = [0u8; 8];
        read_exact(reader, &mut magic, 0)?;
        if &magic != MAGIC {
            return Err(Error::format(0, "invalid magic, expected `bplist00`"));
        }

        let len = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| Error::from_read(e, 0))?;
        if len < MAGIC.len() as u64 + TRAILER_SIZE {
            return Err(Error::format(len, "stream too short to hold a trailer"));
        }

        let start = len - TRAILER_SIZE;
        reader
            .seek(SeekFrom::Start(start))
            .map_err(|e| Error::from_read(e, start))?;
        let mut raw = [0u8; TRAILER_SIZE as usize];
        read_exact(reader, &mut raw, start)?;

        let trailer = Trailer {
            offset_size: raw[6],
            ref_size: raw[7],
            object_count: be_u64(&raw[8..16]),
            top_object: be_u64(&raw[16..24]),
            offset_table_start: be_u64(&raw[24..32]),
        };
        trailer.validate(start)?;

        reader
            .seek(SeekFrom::Start(trailer.offset_table_start))
            .map_err(|e| Error::from_read(e, trailer.offset_table_start))?;
        Ok(trailer)
    }

    /// Checks the trailer fields against the position of the trailer itself.
    fn validate(&self, trailer_start: u64) -> Result<()> {
        if !(1..=8).contains(&self.offset_size) {
            return Err(Error::format(
                trailer_start + 6,
                format!("invalid offset size {}", self.offset_size),
            ));
        }
        if !(1..=8).contains(&self.ref_size) {
            return Err(Error::format(
                trailer_start + 7,
                format!("invalid reference size {}", self.ref_size),
            ));
        }
        if self.top_object >= self.object_count {
            return Err(Error::format(
                trailer_start + 16,
                format!(
                    "top object {} out of range for {} objects",
                    self.top_object, self.object_count
                ),
            ));
        }
        let table_len = self
            .object_count
            .checked_mul(u64::from(self.offset_size))
            .ok_or_else(|| Error::format(trailer_start + 8, "object count overflows"))?;
        let table_end = self
            .offset_table_start
            .checked_add(table_len)
            .ok_or_else(|| Error::format(trailer_start + 24, "offset table overflows"))?;
        if self.offset_table_start < MAGIC.len() as u64 || table_end > trailer_start {
            return Err(Error::format(
                trailer_start + 24,
                format!(
                    "offset table at {:#x}..{:#x} does not fit before the trailer",
                    self.offset_table_start, table_end
                ),
            ));
        }
        Ok(())
    }

    /// Appends the 32-byte trailer to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0u8; 6]);
        out.push(self.offset_size);
        out.push(self.ref_size);
        out.extend_from_slice(&self.object_count.to_be_bytes());
        out.extend_from_slice(&self.top_object.to_be_bytes());
        out.extend_from_slice(&self.offset_table_start.to_be_bytes());
    }
}

/// Fills `buf` from the reader, reporting truncation as a format error at `offset`.
pub fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8], offset: u64) -> Result<()> {
    reader
        .read_exact(buf)
        .map_err(|e| Error::from_read(e, offset))
}

/// Reads a big-endian unsigned integer of `width` bytes (1..=8).
pub fn read_sized_uint<R: Read>(reader: &mut R, width: u8, offset: u64) -> Result<u64> {
    if !(1..=8).contains(&width) {
        return Err(Error::format(offset, format!("invalid integer width {}", width)));
    }
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf[8 - width as usize..], offset)?;
    Ok(u64::from_be_bytes(buf))
}

/// Appends the low `width` bytes (1..=8) of `value` in big-endian order.
pub fn write_sized_uint(out: &mut Vec<u8>, value: u64, width: u8) -> Result<()> {
    if !(1..=8).contains(&width) {
        return Err(Error::unsupported_value(format!(
            "invalid integer width {}",
            width
        )));
    }
    let bytes = value.to_be_bytes();
    out.extend_from_slice(&bytes[8 - width as usize..]);
    Ok(())
}

fn be_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_be_bytes(buf)
}
