//! Binary Canonical Serialization (BCS).
//!
//! Hand-rolled encoder and decoder for the subset of BCS used by transaction
//! and authenticator payloads:
//!
//! ```text
//! bool            1 byte, 0x00 | 0x01
//! u8..u128        fixed width, little-endian
//! u256            32 bytes, little-endian
//! [u8; N]         N raw bytes, no prefix
//! Vec<T>          uleb128(len) || T * len
//! String          uleb128(len) || utf-8 bytes
//! Option<T>       0x00 | 0x01 || T
//! enum            uleb128(variant index) || fields
//! struct          fields in declaration order, no framing
//! ```
//!
//! Every value has exactly one encoding, so hashes over BCS bytes are stable
//! across implementations.

use crate::error::CodecError;
use crate::varint::{decode_uleb128, encode_uleb128};

/// Largest sequence length BCS permits (2^31 - 1).
pub const MAX_SEQUENCE_LENGTH: u64 = (1 << 31) - 1;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A type with a canonical BCS encoding.
pub trait BcsEncode {
    /// Append the encoding of `self` to `writer`.
    fn encode_to(&self, writer: &mut BcsWriter);

    /// Encode `self` into a fresh buffer.
    fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut writer = BcsWriter::new();
        self.encode_to(&mut writer);
        writer.into_bytes()
    }
}

/// A type that can be read back from its BCS encoding.
pub trait BcsDecode: Sized {
    /// Read one value from the front of `reader`.
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError>;

    /// Decode a complete buffer, rejecting trailing bytes.
    fn from_bcs_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = BcsReader::new(bytes);
        let value = Self::decode_from(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Append-only BCS output buffer.
#[derive(Debug, Default, Clone)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u128(&mut self, value: u128) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Raw bytes with no length prefix, for fixed-size arrays.
    pub fn write_fixed_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// A sequence length or enum variant index.
    pub fn write_uleb128(&mut self, value: u64) {
        self.buf.extend_from_slice(&encode_uleb128(value));
    }

    /// Length-prefixed byte vector.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.write_uleb128(bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_str(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    pub fn write_variant(&mut self, index: u32) {
        self.write_uleb128(index as u64);
    }

    pub fn write_seq<T: BcsEncode>(&mut self, items: &[T]) {
        self.write_uleb128(items.len() as u64);
        for item in items {
            item.encode_to(self);
        }
    }

    pub fn write_option<T: BcsEncode>(&mut self, value: Option<&T>) {
        match value {
            Some(inner) => {
                self.write_bool(true);
                inner.encode_to(self);
            }
            None => self.write_bool(false),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Cursor over a BCS buffer.
#[derive(Debug, Clone)]
pub struct BcsReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BcsReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(&self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::Encoding(format!("invalid bool byte {other:#04x}"))),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_u128(&mut self) -> Result<u128, CodecError> {
        Ok(u128::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_uleb128(&mut self) -> Result<u64, CodecError> {
        let (value, used) = decode_uleb128(&self.data[self.pos..])?;
        self.pos += used;
        Ok(value)
    }

    /// A sequence length, bounded by [`MAX_SEQUENCE_LENGTH`].
    pub fn read_length(&mut self) -> Result<usize, CodecError> {
        let len = self.read_uleb128()?;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(CodecError::Encoding(format!(
                "sequence length {len} exceeds maximum"
            )));
        }
        Ok(len as usize)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.read_length()?;
        Ok(self.take(len)?.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|e| CodecError::Encoding(format!("invalid utf-8: {e}")))
    }

    pub fn read_variant(&mut self) -> Result<u32, CodecError> {
        let index = self.read_uleb128()?;
        u32::try_from(index)
            .map_err(|_| CodecError::Encoding(format!("variant index {index} out of range")))
    }

    pub fn read_seq<T: BcsDecode>(&mut self) -> Result<Vec<T>, CodecError> {
        let len = self.read_length()?;
        // Cap the pre-allocation: a hostile length must not allocate up front.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(T::decode_from(self)?);
        }
        Ok(items)
    }

    pub fn read_option<T: BcsDecode>(&mut self) -> Result<Option<T>, CodecError> {
        if self.read_bool()? {
            Ok(Some(T::decode_from(self)?))
        } else {
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Primitive impls
// ---------------------------------------------------------------------------

macro_rules! impl_bcs_int {
    ($($ty:ty => $write:ident, $read:ident;)*) => {
        $(
            impl BcsEncode for $ty {
                fn encode_to(&self, writer: &mut BcsWriter) {
                    writer.$write(*self);
                }
            }

            impl BcsDecode for $ty {
                fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
                    reader.$read()
                }
            }
        )*
    };
}

impl_bcs_int! {
    bool => write_bool, read_bool;
    u8 => write_u8, read_u8;
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
    u64 => write_u64, read_u64;
    u128 => write_u128, read_u128;
}

impl BcsEncode for String {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_str(self);
    }
}

impl BcsDecode for String {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        reader.read_string()
    }
}

impl<T: BcsEncode> BcsEncode for Vec<T> {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_seq(self);
    }
}

impl<T: BcsDecode> BcsDecode for Vec<T> {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        reader.read_seq()
    }
}

impl<T: BcsEncode> BcsEncode for Option<T> {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_option(self.as_ref());
    }
}

impl<T: BcsDecode> BcsDecode for Option<T> {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        reader.read_option()
    }
}
