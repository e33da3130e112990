//! Bech32 and Bech32m string codec (BIP-173 / BIP-350).
//!
//! Thin layer over the `bech32` crate that works in plain `u8` groups and
//! maps failures into [`CodecError`]. The checksum variant is always explicit
//! on encode and reported on decode. Only the SegWit helpers infer it from
//! the witness version.

use ::bech32::u5;

use crate::error::CodecError;

/// Highest witness version a SegWit address may carry.
pub const MAX_WITNESS_VERSION: u8 = 16;

/// Checksum constant selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Original BIP-173 checksum.
    Bech32,
    /// BIP-350 checksum, used for witness v1+ and native addresses.
    Bech32m,
}

impl Variant {
    fn to_lib(self) -> ::bech32::Variant {
        match self {
            Variant::Bech32 => ::bech32::Variant::Bech32,
            Variant::Bech32m => ::bech32::Variant::Bech32m,
        }
    }

    fn from_lib(variant: ::bech32::Variant) -> Self {
        match variant {
            ::bech32::Variant::Bech32 => Variant::Bech32,
            ::bech32::Variant::Bech32m => Variant::Bech32m,
        }
    }

    /// The variant BIP-350 assigns to a witness version.
    pub fn for_witness_version(version: u8) -> Self {
        if version == 0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        }
    }
}

// ---------------------------------------------------------------------------
// 5-bit payloads
// ---------------------------------------------------------------------------

/// Encode 5-bit groups under `hrp` with the given checksum variant.
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String, CodecError> {
    let groups = data
        .iter()
        .map(|&b| u5::try_from_u8(b))
        .collect::<Result<Vec<u5>, _>>()
        .map_err(|e| CodecError::Encoding(format!("invalid 5-bit group: {e}")))?;

    ::bech32::encode(hrp, groups, variant.to_lib())
        .map_err(|e| CodecError::Bech32(format!("encode under hrp {hrp:?} failed: {e}")))
}

/// Decode a bech32/bech32m string into `(hrp, 5-bit groups, variant)`.
///
/// The HRP is returned lowercase. Fails on checksum mismatch, characters
/// outside the charset, mixed case, or a missing separator.
pub fn decode(s: &str) -> Result<(String, Vec<u8>, Variant), CodecError> {
    let (hrp, groups, variant) =
        ::bech32::decode(s).map_err(|e| CodecError::Bech32(format!("{s:?}: {e}")))?;
    let data = groups.iter().map(|g| g.to_u8()).collect();
    Ok((hrp, data, Variant::from_lib(variant)))
}

/// Regroup `data` from `from`-bit to `to`-bit words.
///
/// With `pad = false`, leftover input bits must be zero and fewer than
/// `from`; otherwise the call fails with an encoding error.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, CodecError> {
    if !(1..=8).contains(&from) || !(1..=8).contains(&to) {
        return Err(CodecError::Encoding(format!(
            "unsupported bit widths {from} -> {to}"
        )));
    }
    ::bech32::convert_bits(data, from, to, pad)
        .map_err(|e| CodecError::Encoding(format!("convert_bits {from} -> {to}: {e}")))
}

// ---------------------------------------------------------------------------
// Byte payloads
// ---------------------------------------------------------------------------

/// Encode whole bytes: regroup 8 -> 5 bits with padding, then [`encode`].
pub fn encode_bytes(hrp: &str, bytes: &[u8], variant: Variant) -> Result<String, CodecError> {
    let groups = convert_bits(bytes, 8, 5, true)?;
    encode(hrp, &groups, variant)
}

/// Decode a string produced by [`encode_bytes`].
pub fn decode_bytes(s: &str) -> Result<(String, Vec<u8>, Variant), CodecError> {
    let (hrp, groups, variant) = decode(s)?;
    let bytes = convert_bits(&groups, 5, 8, false)?;
    Ok((hrp, bytes, variant))
}

// ---------------------------------------------------------------------------
// SegWit
// ---------------------------------------------------------------------------

/// Encode a witness program as a SegWit address.
pub fn encode_segwit(hrp: &str, version: u8, program: &[u8]) -> Result<String, CodecError> {
    check_witness_program(version, program)?;

    let mut groups = Vec::with_capacity(1 + (program.len() * 8).div_ceil(5));
    groups.push(version);
    groups.extend(convert_bits(program, 8, 5, true)?);
    encode(hrp, &groups, Variant::for_witness_version(version))
}

/// Decode a SegWit address into `(hrp, witness version, program)`.
///
/// Witness version 0 must carry a bech32 checksum and version 1+ bech32m.
pub fn decode_segwit(s: &str) -> Result<(String, u8, Vec<u8>), CodecError> {
    let (hrp, groups, variant) = decode(s)?;

    let (&version, rest) = groups
        .split_first()
        .ok_or_else(|| CodecError::Encoding(format!("{s:?}: empty witness data")))?;

    if variant != Variant::for_witness_version(version) {
        return Err(CodecError::Encoding(format!(
            "{s:?}: witness version {version} cannot use {variant:?} checksum"
        )));
    }

    let program = convert_bits(rest, 5, 8, false)?;
    check_witness_program(version, &program)?;
    Ok((hrp, version, program))
}

fn check_witness_program(version: u8, program: &[u8]) -> Result<(), CodecError> {
    if version > MAX_WITNESS_VERSION {
        return Err(CodecError::Encoding(format!(
            "witness version {version} out of range"
        )));
    }
    if !(2..=40).contains(&program.len()) {
        return Err(CodecError::Encoding(format!(
            "witness program length {} out of range",
            program.len()
        )));
    }
    if version == 0 && program.len() != 20 && program.len() != 32 {
        return Err(CodecError::Encoding(format!(
            "v0 witness program must be 20 or 32 bytes, got {}",
            program.len()
        )));
    }
    Ok(())
}
