//! Validator 2: several Bitcoin signatures over one shared envelope.
//!
//! Every co-signer signs the same `message_prefix` and `message_info` (see
//! [`super::bitcoin`]), so the payload carries them once next to the
//! per-signer fields:
//!
//! ```text
//! MultisignAuthPayload {
//!     signatures:     vector<vector<u8>>,
//!     message_prefix: vector<u8>,
//!     message_info:   vector<u8>,
//!     public_keys:    vector<vector<u8>>,   // signatures[i] is by public_keys[i]
//! }
//! ```
//!
//! Threshold and membership live in the multisign account on chain, so
//! verification here stops at the signatures.

use std::collections::HashSet;

use codec_utils::{BcsDecode, BcsEncode, BcsReader, BcsWriter, CodecError};
use rooch_types::{RoochAddress, TxHash};

use super::bitcoin::{utf8, verify_envelope, AuthPayload, BitcoinSignMessage};
use super::{Authenticator, BITCOIN_AUTH_VALIDATOR_ID, BITCOIN_MULTISIGN_AUTH_VALIDATOR_ID};
use crate::error::AuthError;
use crate::keys::{PublicKey, Secp256k1PublicKey};

/// Fewest co-signers a multisign payload may carry.
pub const MIN_SIGNERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisignAuthPayload {
    pub signatures: Vec<Vec<u8>>,
    pub message_prefix: Vec<u8>,
    pub message_info: Vec<u8>,
    pub public_keys: Vec<Vec<u8>>,
}

impl MultisignAuthPayload {
    /// Merge single-signer payloads that signed the same envelope.
    pub fn from_payloads(payloads: Vec<AuthPayload>) -> Result<Self, AuthError> {
        if payloads.len() < MIN_SIGNERS {
            return Err(AuthError::Validation(format!(
                "multisign needs at least {MIN_SIGNERS} signatures, got {}",
                payloads.len()
            )));
        }

        let mut payloads = payloads.into_iter();
        let Some(first) = payloads.next() else {
            return Err(AuthError::Validation("no signatures".into()));
        };
        let mut merged = Self {
            signatures: vec![first.signature],
            message_prefix: first.message_prefix,
            message_info: first.message_info,
            public_keys: vec![first.public_key],
        };

        for payload in payloads {
            if payload.message_prefix != merged.message_prefix {
                return Err(AuthError::Validation(
                    "all signatures must share one message prefix".into(),
                ));
            }
            if payload.message_info != merged.message_info {
                return Err(AuthError::Validation(
                    "all signatures must share one message info".into(),
                ));
            }
            merged.signatures.push(payload.signature);
            merged.public_keys.push(payload.public_key);
        }
        Ok(merged)
    }

    /// Check every signature against the shared envelope over `tx_hash`
    /// and return the native address of each signer, in payload order.
    pub fn verify(&self, tx_hash: &TxHash) -> Result<Vec<RoochAddress>, AuthError> {
        if self.signatures.len() != self.public_keys.len() {
            return Err(AuthError::InvalidSignature(format!(
                "{} signatures for {} public keys",
                self.signatures.len(),
                self.public_keys.len()
            )));
        }
        if self.public_keys.len() < MIN_SIGNERS {
            return Err(AuthError::InvalidSignature(format!(
                "multisign needs at least {MIN_SIGNERS} signatures, got {}",
                self.public_keys.len()
            )));
        }

        let message = BitcoinSignMessage::from_parts(
            utf8(&self.message_prefix, "message_prefix")?,
            utf8(&self.message_info, "message_info")?,
            tx_hash.as_bytes(),
        );

        let mut seen = HashSet::with_capacity(self.public_keys.len());
        let mut signers = Vec::with_capacity(self.public_keys.len());
        for (index, (signature, key_bytes)) in
            self.signatures.iter().zip(&self.public_keys).enumerate()
        {
            if !seen.insert(key_bytes.as_slice()) {
                return Err(AuthError::InvalidSignature(format!(
                    "public key {index} appears more than once"
                )));
            }
            let public_key = Secp256k1PublicKey::from_bytes(key_bytes)?;
            verify_envelope(&public_key, &message, signature).map_err(|e| {
                AuthError::InvalidSignature(format!("signer {index}: {e}"))
            })?;
            signers.push(public_key.to_address()?);
        }
        Ok(signers)
    }
}

impl BcsEncode for MultisignAuthPayload {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_seq(&self.signatures);
        writer.write_bytes(&self.message_prefix);
        writer.write_bytes(&self.message_info);
        writer.write_seq(&self.public_keys);
    }
}

impl BcsDecode for MultisignAuthPayload {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            signatures: reader.read_seq()?,
            message_prefix: reader.read_bytes()?,
            message_info: reader.read_bytes()?,
            public_keys: reader.read_seq()?,
        })
    }
}

/// Combine Bitcoin authenticators over the same transaction into one
/// multisign authenticator.
pub fn build(authenticators: &[Authenticator]) -> Result<Authenticator, AuthError> {
    let payloads = authenticators
        .iter()
        .map(|auth| {
            if auth.auth_validator_id != BITCOIN_AUTH_VALIDATOR_ID {
                return Err(AuthError::SchemeMismatch(format!(
                    "multisign combines bitcoin authenticators, got validator {}",
                    auth.auth_validator_id
                )));
            }
            Ok(AuthPayload::from_bcs_bytes(&auth.payload)?)
        })
        .collect::<Result<Vec<_>, AuthError>>()?;

    let merged = MultisignAuthPayload::from_payloads(payloads)?;
    Ok(Authenticator::new(
        BITCOIN_MULTISIGN_AUTH_VALIDATOR_ID,
        merged.to_bcs_bytes(),
    ))
}

/// Signature check only: whether the signers control `_sender` is decided
/// by the multisign account's on-chain threshold and member list.
pub fn verify(payload: &[u8], tx_hash: &TxHash, _sender: &RoochAddress) -> Result<(), AuthError> {
    MultisignAuthPayload::from_bcs_bytes(payload)?
        .verify(tx_hash)
        .map(|_| ())
}
