//! Validator 0: a plain signature over the transaction hash.
//!
//! ```text
//! +------+-----------------------+---------------------------+
//! | flag | signature             | public key                |
//! | 1 B  | scheme signature len  | scheme public key len     |
//! +------+-----------------------+---------------------------+
//! ```

use rooch_types::{RoochAddress, TxHash};

use super::{Authenticator, NATIVE_AUTH_VALIDATOR_ID};
use crate::error::AuthError;
use crate::keys::{public_key_from_bytes, KeyScheme};
use crate::signer::Signer;

/// Sign the raw hash bytes and pack `flag || signature || public_key`.
pub fn build(signer: &dyn Signer, tx_hash: &TxHash) -> Result<Authenticator, AuthError> {
    let scheme = signer.key_scheme();
    let signature = signer.sign(tx_hash.as_bytes())?;
    let public_key = signer.public_key_bytes();

    if signature.len() != scheme.signature_length() {
        return Err(AuthError::Signing(format!(
            "{scheme} signer returned {} signature bytes, expected {}",
            signature.len(),
            scheme.signature_length()
        )));
    }
    if public_key.len() != scheme.public_key_length() {
        return Err(AuthError::InvalidKey(format!(
            "{scheme} signer returned {} public key bytes, expected {}",
            public_key.len(),
            scheme.public_key_length()
        )));
    }

    let mut payload = Vec::with_capacity(1 + signature.len() + public_key.len());
    payload.push(scheme.flag());
    payload.extend_from_slice(&signature);
    payload.extend_from_slice(&public_key);
    Ok(Authenticator::new(NATIVE_AUTH_VALIDATOR_ID, payload))
}

/// Split a payload into `(scheme, signature, public_key)`.
pub fn split_payload(payload: &[u8]) -> Result<(KeyScheme, &[u8], &[u8]), AuthError> {
    let (&flag, rest) = payload
        .split_first()
        .ok_or_else(|| AuthError::InvalidSignature("empty native payload".into()))?;
    let scheme = KeyScheme::from_flag(flag)?;

    let sig_len = scheme.signature_length();
    let expected = sig_len + scheme.public_key_length();
    if rest.len() != expected {
        return Err(AuthError::InvalidSignature(format!(
            "{scheme} payload must be {} bytes, got {}",
            expected + 1,
            payload.len()
        )));
    }
    let (signature, public_key) = rest.split_at(sig_len);
    Ok((scheme, signature, public_key))
}

/// The embedded key must own `sender` and sign `tx_hash`.
pub fn verify(payload: &[u8], tx_hash: &TxHash, sender: &RoochAddress) -> Result<(), AuthError> {
    let (scheme, signature, public_key) = split_payload(payload)?;
    let public_key = public_key_from_bytes(scheme, public_key)?;

    let derived = public_key.to_address()?;
    if derived != *sender {
        return Err(AuthError::AddressMismatch {
            expected: sender.to_hex_literal(),
            actual: derived.to_hex_literal(),
        });
    }

    public_key.verify(tx_hash.as_bytes(), signature)
}
