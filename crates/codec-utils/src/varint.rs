//! Variable-length integer prefixes.
//!
//! Two encodings are in use:
//!
//! ```text
//! CompactSize (Bitcoin)               ULEB128 (BCS)
//!   0x00..=0xfc        1 byte           7 bits per byte, low group first,
//!   0xfd + u16 LE      3 bytes          high bit set on every byte but the last
//!   0xfe + u32 LE      5 bytes
//!   0xff + u64 LE      9 bytes
//! ```

use crate::error::CodecError;

// ---------------------------------------------------------------------------
// CompactSize
// ---------------------------------------------------------------------------

/// Encode `value` as a Bitcoin CompactSize integer.
pub fn encode_compact_size(value: u64) -> Vec<u8> {
    match value {
        0..=0xfc => vec![value as u8],
        0xfd..=0xffff => {
            let mut out = vec![0xfd];
            out.extend_from_slice(&(value as u16).to_le_bytes());
            out
        }
        0x1_0000..=0xffff_ffff => {
            let mut out = vec![0xfe];
            out.extend_from_slice(&(value as u32).to_le_bytes());
            out
        }
        _ => {
            let mut out = vec![0xff];
            out.extend_from_slice(&value.to_le_bytes());
            out
        }
    }
}

/// Decode a CompactSize integer from the front of `data`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode_compact_size(data: &[u8]) -> Result<(u64, usize), CodecError> {
    let first = *data.first().ok_or(CodecError::UnexpectedEof {
        needed: 1,
        remaining: 0,
    })?;

    let width = match first {
        0xfd => 2,
        0xfe => 4,
        0xff => 8,
        _ => return Ok((first as u64, 1)),
    };

    let body = data.get(1..1 + width).ok_or(CodecError::UnexpectedEof {
        needed: width,
        remaining: data.len() - 1,
    })?;
    let mut buf = [0u8; 8];
    buf[..width].copy_from_slice(body);
    Ok((u64::from_le_bytes(buf), 1 + width))
}

/// Prefix `data` with its CompactSize length.
pub fn compact_size_prefixed(data: &[u8]) -> Vec<u8> {
    let mut out = encode_compact_size(data.len() as u64);
    out.extend_from_slice(data);
    out
}

// ---------------------------------------------------------------------------
// ULEB128
// ---------------------------------------------------------------------------

/// Encode `value` as unsigned LEB128.
pub fn encode_uleb128(value: u64) -> Vec<u8> {
    let mut val = value;
    let mut out = Vec::with_capacity(10);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode an unsigned LEB128 integer from the front of `data`.
///
/// Rejects overlong encodings (a trailing zero group) and values that do
/// not fit in a `u64`. Returns the value and the number of bytes consumed.
pub fn decode_uleb128(data: &[u8]) -> Result<(u64, usize), CodecError> {
    let mut value: u64 = 0;

    for (i, &byte) in data.iter().enumerate() {
        let shift = 7 * i as u32;
        let group = (byte & 0x7f) as u64;

        if shift >= 64 || (shift == 63 && group > 1) {
            return Err(CodecError::Encoding("uleb128 overflows u64".into()));
        }
        value |= group << shift;

        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(CodecError::Encoding("non-canonical uleb128".into()));
            }
            return Ok((value, i + 1));
        }
    }

    Err(CodecError::UnexpectedEof {
        needed: data.len() + 1,
        remaining: data.len(),
    })
}

// ---------------------------------------------------------------------------
// Concatenation
// ---------------------------------------------------------------------------

/// Concatenate byte slices into one buffer.
pub fn concat(parts: &[&[u8]]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.len()).sum();
    let mut out = Vec::with_capacity(total);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_size_boundaries() {
        assert_eq!(encode_compact_size(0), vec![0x00]);
        assert_eq!(encode_compact_size(0x18), vec![0x18]);
        assert_eq!(encode_compact_size(0xfc), vec![0xfc]);
        assert_eq!(encode_compact_size(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(encode_compact_size(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(
            encode_compact_size(0x1_0000),
            vec![0xfe, 0x00, 0x00, 0x01, 0x00]
        );
        assert_eq!(encode_compact_size(u64::MAX).len(), 9);
    }

    #[test]
    fn compact_size_decodes_what_it_encodes() {
        for value in [0u64, 1, 0xfc, 0xfd, 0x1234, 0xffff, 0x1_0000, 0xdead_beef, u64::MAX] {
            let encoded = encode_compact_size(value);
            assert_eq!(decode_compact_size(&encoded).unwrap(), (value, encoded.len()));
        }
    }

    #[test]
    fn compact_size_truncated_fails() {
        assert!(decode_compact_size(&[]).is_err());
        assert!(decode_compact_size(&[0xfd, 0x01]).is_err());
    }

    #[test]
    fn compact_size_prefix_of_message_prefix() {
        let prefixed = compact_size_prefixed(b"Bitcoin Signed Message:\n");
        assert_eq!(prefixed[0], 0x18);
        assert_eq!(prefixed.len(), 25);
    }

    #[test]
    fn uleb128_single_byte() {
        assert_eq!(encode_uleb128(0), vec![0x00]);
        assert_eq!(encode_uleb128(1), vec![0x01]);
        assert_eq!(encode_uleb128(127), vec![0x7f]);
    }

    #[test]
    fn uleb128_multi_byte() {
        assert_eq!(encode_uleb128(128), vec![0x80, 0x01]);
        assert_eq!(encode_uleb128(300), vec![0xac, 0x02]);
        assert_eq!(encode_uleb128(16384), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_uleb128(u64::MAX).len(), 10);
    }

    #[test]
    fn uleb128_decode() {
        assert_eq!(decode_uleb128(&[0xac, 0x02, 0xff]).unwrap(), (300, 2));
        assert_eq!(
            decode_uleb128(&encode_uleb128(u64::MAX)).unwrap(),
            (u64::MAX, 10)
        );
    }

    #[test]
    fn uleb128_rejects_overlong() {
        assert!(decode_uleb128(&[0x80, 0x00]).is_err());
    }

    #[test]
    fn uleb128_rejects_truncated() {
        assert!(decode_uleb128(&[0x80]).is_err());
        assert!(decode_uleb128(&[]).is_err());
    }

    #[test]
    fn uleb128_rejects_overflow() {
        let too_big = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02];
        assert!(decode_uleb128(&too_big).is_err());
    }

    #[test]
    fn concat_joins_in_order() {
        assert_eq!(concat(&[&[1, 2], &[], &[3]]), vec![1, 2, 3]);
        assert!(concat(&[]).is_empty());
    }
}
