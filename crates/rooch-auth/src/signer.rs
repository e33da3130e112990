//! The signing capability consumed by authenticator builders, plus local
//! in-memory implementations for both key schemes.
//!
//! A [`Signer`] may be backed by anything (hardware wallet, remote key
//! service); the builders only call it synchronously and never retry.

use std::fmt;

use ed25519_dalek::Signer as _;
use rand::rngs::OsRng;
use rooch_types::RoochAddress;
use zeroize::Zeroize;

use crate::error::AuthError;
use crate::keys::{public_key_from_bytes, KeyScheme};

/// Something that can sign bytes with a key of a registered scheme.
pub trait Signer {
    /// Sign `message`. Ed25519 signs the bytes as-is; secp256k1 signs
    /// their SHA-256 digest.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError>;

    /// Wire bytes of the public key.
    fn public_key_bytes(&self) -> Vec<u8>;

    fn key_scheme(&self) -> KeyScheme;

    /// Native address of the signing key.
    fn rooch_address(&self) -> Result<RoochAddress, AuthError> {
        public_key_from_bytes(self.key_scheme(), &self.public_key_bytes())?.to_address()
    }
}

fn secret_array(secret: &[u8]) -> Result<[u8; 32], AuthError> {
    secret.try_into().map_err(|_| {
        AuthError::InvalidKey(format!("secret key must be 32 bytes, got {}", secret.len()))
    })
}

// ---------------------------------------------------------------------------
// Ed25519
// ---------------------------------------------------------------------------

/// Ed25519 key held in memory. The key is zeroized on drop.
pub struct Ed25519Signer {
    key: ed25519_dalek::SigningKey,
}

impl Ed25519Signer {
    /// Build from a 32-byte seed.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, AuthError> {
        let mut seed = secret_array(secret)?;
        let key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        Ok(Self { key })
    }

    pub fn generate() -> Self {
        Self {
            key: ed25519_dalek::SigningKey::generate(&mut OsRng),
        }
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        let signature = self
            .key
            .try_sign(message)
            .map_err(|e| AuthError::Signing(format!("ed25519: {e}")))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.key.verifying_key().to_bytes().to_vec()
    }

    fn key_scheme(&self) -> KeyScheme {
        KeyScheme::Ed25519
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Secp256k1
// ---------------------------------------------------------------------------

/// Secp256k1 key held in memory. Produces low-S `r || s` ECDSA signatures.
pub struct Secp256k1Signer {
    key: k256::ecdsa::SigningKey,
}

impl Secp256k1Signer {
    /// Build from a 32-byte scalar. Zero and values at or above the curve
    /// order are rejected.
    pub fn from_bytes(secret: &[u8]) -> Result<Self, AuthError> {
        let mut scalar = secret_array(secret)?;
        let key = k256::ecdsa::SigningKey::from_slice(&scalar)
            .map_err(|e| AuthError::InvalidKey(format!("secp256k1 secret key: {e}")));
        scalar.zeroize();
        Ok(Self { key: key? })
    }

    pub fn generate() -> Self {
        Self {
            key: k256::ecdsa::SigningKey::random(&mut OsRng),
        }
    }
}

impl Signer for Secp256k1Signer {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        use k256::ecdsa::signature::Signer as _;

        let signature: k256::ecdsa::Signature = self
            .key
            .try_sign(message)
            .map_err(|e| AuthError::Signing(format!("secp256k1: {e}")))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    fn key_scheme(&self) -> KeyScheme {
        KeyScheme::Secp256k1
    }
}

impl fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Signer")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PublicKey;

    #[test]
    fn secp256k1_reference_key() {
        let signer = Secp256k1Signer::from_bytes(&[0xcd; 32]).unwrap();
        assert_eq!(
            hex::encode(signer.public_key_bytes()),
            "02b98a7fb8cc007048625b6446ad49a1b3a722df8c1ca975b87160023e14d19097"
        );
        assert_eq!(signer.key_scheme(), KeyScheme::Secp256k1);
    }

    #[test]
    fn secp256k1_signatures_are_deterministic_and_verify() {
        let signer = Secp256k1Signer::from_bytes(&[0xcd; 32]).unwrap();
        let a = signer.sign(b"payload").unwrap();
        let b = signer.sign(b"payload").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let pk = public_key_from_bytes(KeyScheme::Secp256k1, &signer.public_key_bytes()).unwrap();
        pk.verify(b"payload", &a).unwrap();
    }

    #[test]
    fn ed25519_signs_and_verifies() {
        let signer = Ed25519Signer::from_bytes(&[0xcd; 32]).unwrap();
        let sig = signer.sign(b"payload").unwrap();
        assert_eq!(sig.len(), 64);
        assert_eq!(signer.public_key_bytes().len(), 32);
        let pk = public_key_from_bytes(KeyScheme::Ed25519, &signer.public_key_bytes()).unwrap();
        pk.verify(b"payload", &sig).unwrap();
    }

    #[test]
    fn rooch_address_matches_public_key_address() {
        let signer = Ed25519Signer::generate();
        let pk = public_key_from_bytes(KeyScheme::Ed25519, &signer.public_key_bytes()).unwrap();
        assert_eq!(signer.rooch_address().unwrap(), pk.to_address().unwrap());

        let signer = Secp256k1Signer::generate();
        let pk = public_key_from_bytes(KeyScheme::Secp256k1, &signer.public_key_bytes()).unwrap();
        assert_eq!(signer.rooch_address().unwrap(), pk.to_address().unwrap());
    }

    #[test]
    fn rejects_bad_secrets() {
        assert!(matches!(
            Ed25519Signer::from_bytes(&[1u8; 31]),
            Err(AuthError::InvalidKey(_))
        ));
        assert!(matches!(
            Secp256k1Signer::from_bytes(&[0u8; 32]),
            Err(AuthError::InvalidKey(_))
        ));
        assert!(Secp256k1Signer::from_bytes(&[0xff; 32]).is_err());
    }

    #[test]
    fn debug_does_not_print_secret() {
        let signer = Secp256k1Signer::from_bytes(&[0xcd; 32]).unwrap();
        let debug = format!("{signer:?}");
        assert!(!debug.contains(&"cd".repeat(32)));
        assert!(debug.contains("02b98a7f"));
    }
}
