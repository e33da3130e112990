//! The chain-native account address.
//!
//! A `RoochAddress` is 32 opaque bytes. It has two string forms:
//!
//! - hex literal: `0x` followed by exactly 64 lowercase hex digits. Parsing
//!   also accepts shortened literals such as `0x2`, left-padded with zeros.
//! - bech32m under the HRP `rooch`, used by `Display`.

use std::fmt;
use std::str::FromStr;

use codec_utils::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use codec_utils::bech32::{self, Variant};
use codec_utils::hash::blake2b_256;
use codec_utils::CodecError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypesError;

/// Human-readable part of native bech32m addresses.
pub const ROOCH_HRP: &str = "rooch";

/// Address length in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte chain-native account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RoochAddress([u8; ADDRESS_LENGTH]);

impl RoochAddress {
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build from a slice that must be exactly 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypesError> {
        let array: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            TypesError::InvalidAddress(format!(
                "expected {ADDRESS_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// The address whose bytes are BLAKE2b-256 of `preimage`.
    pub fn hash_of(preimage: &[u8]) -> Self {
        Self(blake2b_256(preimage))
    }

    /// Derive the address of a native key: BLAKE2b-256(`flag || public_key`).
    pub fn from_flagged_public_key(flag: u8, public_key: &[u8]) -> Self {
        let mut preimage = Vec::with_capacity(1 + public_key.len());
        preimage.push(flag);
        preimage.extend_from_slice(public_key);
        Self::hash_of(&preimage)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// 64 hex digits, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `0x` + 64 hex digits.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    /// Parse a `0x`-prefixed hex literal of 1 to 64 digits.
    pub fn from_hex_literal(literal: &str) -> Result<Self, TypesError> {
        let digits = literal.strip_prefix("0x").ok_or_else(|| {
            TypesError::InvalidAddress(format!("{literal:?}: missing 0x prefix"))
        })?;
        Self::from_hex_digits(literal, digits)
    }

    /// Parse exactly 64 hex digits, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != ADDRESS_LENGTH * 2 {
            return Err(TypesError::InvalidAddress(format!(
                "{s:?}: expected {} hex digits, got {}",
                ADDRESS_LENGTH * 2,
                digits.len()
            )));
        }
        Self::from_hex_digits(s, digits)
    }

    fn from_hex_digits(original: &str, digits: &str) -> Result<Self, TypesError> {
        if digits.is_empty() || digits.len() > ADDRESS_LENGTH * 2 {
            return Err(TypesError::InvalidAddress(format!(
                "{original:?}: expected 1 to {} hex digits, got {}",
                ADDRESS_LENGTH * 2,
                digits.len()
            )));
        }

        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| TypesError::InvalidAddress(format!("{original:?}: {e}")))?;
        Ok(Self(bytes))
    }

    /// Bech32m string under [`ROOCH_HRP`].
    pub fn to_bech32(&self) -> Result<String, TypesError> {
        Ok(bech32::encode_bytes(ROOCH_HRP, &self.0, Variant::Bech32m)?)
    }

    /// Parse a bech32m `rooch1...` string.
    pub fn from_bech32(s: &str) -> Result<Self, TypesError> {
        let (hrp, bytes, variant) = bech32::decode_bytes(s)?;
        if hrp != ROOCH_HRP {
            return Err(TypesError::InvalidAddress(format!(
                "{s:?}: expected hrp {ROOCH_HRP:?}, got {hrp:?}"
            )));
        }
        if variant != Variant::Bech32m {
            return Err(TypesError::InvalidAddress(format!(
                "{s:?}: expected bech32m checksum"
            )));
        }
        Self::from_bytes(&bytes)
    }
}

impl FromStr for RoochAddress {
    type Err = TypesError;

    /// Accepts a hex literal (`0x...`) or a bech32m `rooch1...` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            Self::from_hex_literal(s)
        } else {
            Self::from_bech32(s)
        }
    }
}

impl fmt::Display for RoochAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_bech32().map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl fmt::Debug for RoochAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoochAddress({})", self.to_hex_literal())
    }
}

impl fmt::LowerHex for RoochAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; ADDRESS_LENGTH]> for RoochAddress {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for RoochAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl BcsEncode for RoochAddress {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_fixed_bytes(&self.0);
    }
}

impl BcsDecode for RoochAddress {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        Ok(Self(reader.read_fixed()?))
    }
}

// JSON carries the full hex literal; either string form is accepted back.
impl Serialize for RoochAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_literal())
    }
}

impl<'de> Deserialize<'de> for RoochAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
