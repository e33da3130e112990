//! Base58Check: `base58(version || payload || sha256d(version || payload)[..4])`.

use crate::error::CodecError;

/// Encode `payload` behind a one-byte `version` with a Base58Check checksum.
pub fn encode_check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    bs58::encode(data).with_check().into_string()
}

/// Decode a Base58Check string into `(version, payload)`.
pub fn decode_check(s: &str) -> Result<(u8, Vec<u8>), CodecError> {
    let data = bs58::decode(s)
        .with_check(None)
        .into_vec()
        .map_err(|e| CodecError::Base58(format!("{s:?}: {e}")))?;

    match data.split_first() {
        Some((&version, payload)) => Ok((version, payload.to_vec())),
        None => Err(CodecError::Base58(format!("{s:?}: missing version byte"))),
    }
}
