//! Key-scheme registry and per-curve public keys.
//!
//! | scheme    | flag | public key | signature |
//! |-----------|------|------------|-----------|
//! | Ed25519   | 0    | 32 bytes   | 64 bytes  |
//! | Secp256k1 | 1    | 33 bytes   | 64 bytes  |
//!
//! Ed25519 keys map to a native address as `BLAKE2b-256(flag || pk)`.
//! Secp256k1 keys map through their BIP-86 Taproot address.

use std::fmt;

use chain_btc::{BitcoinAddress, BtcNetwork};
use ed25519_dalek::Verifier as _;
use rooch_types::RoochAddress;

use crate::error::AuthError;

/// Signature algorithm identified by a one-byte flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyScheme {
    Ed25519,
    Secp256k1,
}

/// One row of the scheme registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySchemeInfo {
    pub scheme: KeyScheme,
    pub flag: u8,
    pub public_key_length: usize,
    pub signature_length: usize,
}

/// Every registered scheme, indexed by flag.
pub const KEY_SCHEMES: [KeySchemeInfo; 2] = [
    KeySchemeInfo {
        scheme: KeyScheme::Ed25519,
        flag: 0,
        public_key_length: 32,
        signature_length: 64,
    },
    KeySchemeInfo {
        scheme: KeyScheme::Secp256k1,
        flag: 1,
        public_key_length: 33,
        signature_length: 64,
    },
];

impl KeyScheme {
    pub fn info(self) -> &'static KeySchemeInfo {
        match self {
            KeyScheme::Ed25519 => &KEY_SCHEMES[0],
            KeyScheme::Secp256k1 => &KEY_SCHEMES[1],
        }
    }

    pub fn flag(self) -> u8 {
        self.info().flag
    }

    pub fn public_key_length(self) -> usize {
        self.info().public_key_length
    }

    pub fn signature_length(self) -> usize {
        self.info().signature_length
    }

    /// Look a flag up in the registry.
    pub fn from_flag(flag: u8) -> Result<Self, AuthError> {
        KEY_SCHEMES
            .iter()
            .find(|info| info.flag == flag)
            .map(|info| info.scheme)
            .ok_or_else(|| AuthError::SchemeMismatch(format!("unregistered scheme flag {flag}")))
    }
}

impl fmt::Display for KeyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyScheme::Ed25519 => write!(f, "ed25519"),
            KeyScheme::Secp256k1 => write!(f, "secp256k1"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public keys
// ---------------------------------------------------------------------------

/// A public key of a registered scheme.
pub trait PublicKey: fmt::Debug {
    fn scheme(&self) -> KeyScheme;

    fn flag(&self) -> u8 {
        self.scheme().flag()
    }

    /// Wire bytes, exactly `scheme().public_key_length()` long.
    fn to_bytes(&self) -> Vec<u8>;

    /// Check `signature` over `message`.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), AuthError>;

    /// The native address controlled by this key.
    fn to_address(&self) -> Result<RoochAddress, AuthError>;
}

/// Parse wire bytes for `scheme`.
pub fn public_key_from_bytes(
    scheme: KeyScheme,
    bytes: &[u8],
) -> Result<Box<dyn PublicKey>, AuthError> {
    Ok(match scheme {
        KeyScheme::Ed25519 => Box::new(Ed25519PublicKey::from_bytes(bytes)?),
        KeyScheme::Secp256k1 => Box::new(Secp256k1PublicKey::from_bytes(bytes)?),
    })
}

/// Which wire field a length check is about; picks the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyField {
    PublicKey,
    Signature,
}

impl KeyField {
    fn expected_length(self, scheme: KeyScheme) -> usize {
        match self {
            KeyField::PublicKey => scheme.public_key_length(),
            KeyField::Signature => scheme.signature_length(),
        }
    }

    fn error(self, msg: String) -> AuthError {
        match self {
            KeyField::PublicKey => AuthError::InvalidKey(msg),
            KeyField::Signature => AuthError::InvalidSignature(msg),
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyField::PublicKey => write!(f, "public key"),
            KeyField::Signature => write!(f, "signature"),
        }
    }
}

fn check_length(scheme: KeyScheme, field: KeyField, bytes: &[u8]) -> Result<(), AuthError> {
    let expected = field.expected_length(scheme);
    if bytes.len() == expected {
        return Ok(());
    }
    Err(field.error(format!(
        "{scheme} {field} must be {expected} bytes, got {}",
        bytes.len()
    )))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ed25519PublicKey(ed25519_dalek::VerifyingKey);

impl Ed25519PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        check_length(KeyScheme::Ed25519, KeyField::PublicKey, bytes)?;
        let mut array = [0u8; 32];
        array.copy_from_slice(bytes);
        ed25519_dalek::VerifyingKey::from_bytes(&array)
            .map(Self)
            .map_err(|e| AuthError::InvalidKey(format!("ed25519 public key: {e}")))
    }
}

impl PublicKey for Ed25519PublicKey {
    fn scheme(&self) -> KeyScheme {
        KeyScheme::Ed25519
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), AuthError> {
        check_length(KeyScheme::Ed25519, KeyField::Signature, signature)?;
        let signature = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|e| AuthError::InvalidSignature(format!("ed25519 signature: {e}")))?;
        self.0
            .verify(message, &signature)
            .map_err(|e| AuthError::InvalidSignature(format!("ed25519 verification failed: {e}")))
    }

    fn to_address(&self) -> Result<RoochAddress, AuthError> {
        Ok(RoochAddress::from_flagged_public_key(
            self.flag(),
            self.0.as_bytes(),
        ))
    }
}

/// Compressed SEC1 secp256k1 key. Signatures are 64-byte `r || s` ECDSA
/// over SHA-256 of the message, low-S only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey(k256::ecdsa::VerifyingKey);

impl Secp256k1PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AuthError> {
        check_length(KeyScheme::Secp256k1, KeyField::PublicKey, bytes)?;
        k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|e| AuthError::InvalidKey(format!("secp256k1 public key: {e}")))
    }

    /// The key-path Taproot address on `network`.
    pub fn to_bitcoin_address(&self, network: BtcNetwork) -> Result<BitcoinAddress, AuthError> {
        Ok(BitcoinAddress::from_public_key(&self.to_bytes(), network)?)
    }
}

impl PublicKey for Secp256k1PublicKey {
    fn scheme(&self) -> KeyScheme {
        KeyScheme::Secp256k1
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), AuthError> {
        use k256::ecdsa::signature::Verifier;

        check_length(KeyScheme::Secp256k1, KeyField::Signature, signature)?;
        let signature = k256::ecdsa::Signature::from_slice(signature)
            .map_err(|e| AuthError::InvalidSignature(format!("secp256k1 signature: {e}")))?;
        self.0
            .verify(message, &signature)
            .map_err(|e| AuthError::InvalidSignature(format!("secp256k1 verification failed: {e}")))
    }

    fn to_address(&self) -> Result<RoochAddress, AuthError> {
        // The native address does not depend on the Bitcoin network.
        Ok(self.to_bitcoin_address(BtcNetwork::Mainnet)?.to_rooch_address())
    }
}
