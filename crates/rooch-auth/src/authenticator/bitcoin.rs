//! Validator 1: a Bitcoin signed-message over the transaction hash.
//!
//! The signed text is `message_info || hex(tx_hash)`, where `message_info`
//! starts with `"Rooch Transaction:\n"` and ends with a newline. Wallets
//! wrap it in the usual signed-message envelope:
//!
//! ```text
//! +------+----------------------------+--------------+----------------------+
//! | 0x18 | "Bitcoin Signed Message:\n"| compact(len) | message_info || hex  |
//! +------+----------------------------+--------------+----------------------+
//! ```
//!
//! In [`SignMode::Hash`] the signer receives `SHA-256(envelope)`; in
//! [`SignMode::Raw`] it receives the signed text itself. The payload
//! carried by the authenticator is the BCS struct
//!
//! ```text
//! AuthPayload {
//!     signature:      vector<u8>,
//!     message_prefix: vector<u8>,   // without the 0x18 length byte
//!     message_info:   vector<u8>,   // without the hex hash
//!     public_key:     vector<u8>,   // compressed secp256k1
//!     from_address:   vector<u8>,   // utf-8 Taproot address string
//! }
//! ```

use std::str::FromStr;

use chain_btc::BitcoinAddress;
use codec_utils::hash::sha256;
use codec_utils::varint::compact_size_prefixed;
use codec_utils::{BcsDecode, BcsEncode, BcsReader, BcsWriter, CodecError};
use rooch_types::{RoochAddress, TxHash};

use super::{Authenticator, BitcoinAuthOptions, BITCOIN_AUTH_VALIDATOR_ID};
use crate::error::AuthError;
use crate::keys::{KeyScheme, PublicKey, Secp256k1PublicKey};
use crate::signer::Signer;

/// Leading line of every message info.
pub const MESSAGE_INFO_PREFIX: &str = "Rooch Transaction:\n";
/// Bitcoin signed-message magic, without its length byte.
pub const BITCOIN_MESSAGE_PREFIX: &str = "Bitcoin Signed Message:\n";

/// What the signer is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignMode {
    /// The UTF-8 signed text.
    Raw,
    /// SHA-256 of the signed-message envelope.
    #[default]
    Hash,
}

// ---------------------------------------------------------------------------
// Signed message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinSignMessage {
    message_prefix: String,
    message_info: String,
    tx_hash_hex: String,
}

impl BitcoinSignMessage {
    /// Normalise `message_info` and bind it to `tx_hash`.
    pub fn new(tx_hash: &[u8], message_info: &str) -> Self {
        let mut info = if message_info.starts_with(MESSAGE_INFO_PREFIX) {
            message_info.to_string()
        } else {
            format!("{MESSAGE_INFO_PREFIX}{message_info}")
        };
        if !info.ends_with('\n') {
            info.push('\n');
        }
        Self::from_parts(BITCOIN_MESSAGE_PREFIX, &info, tx_hash)
    }

    /// Rebuild a message from payload fields without normalising them.
    pub fn from_parts(message_prefix: &str, message_info: &str, tx_hash: &[u8]) -> Self {
        Self {
            message_prefix: message_prefix.to_string(),
            message_info: message_info.to_string(),
            tx_hash_hex: hex::encode(tx_hash),
        }
    }

    pub fn message_prefix(&self) -> &str {
        &self.message_prefix
    }

    /// The message info, without the hex hash.
    pub fn message_info(&self) -> &str {
        &self.message_info
    }

    /// The signed text: message info followed by the hex hash.
    pub fn raw(&self) -> String {
        format!("{}{}", self.message_info, self.tx_hash_hex)
    }

    /// The length-prefixed signed-message envelope.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = compact_size_prefixed(self.message_prefix.as_bytes());
        out.extend(compact_size_prefixed(self.raw().as_bytes()));
        out
    }

    /// SHA-256 of [`encode`](Self::encode).
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.encode())
    }

    /// Bytes handed to the signer in `mode`.
    pub fn signing_bytes(&self, mode: SignMode) -> Vec<u8> {
        match mode {
            SignMode::Raw => self.raw().into_bytes(),
            SignMode::Hash => self.hash().to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub signature: Vec<u8>,
    pub message_prefix: Vec<u8>,
    pub message_info: Vec<u8>,
    pub public_key: Vec<u8>,
    pub from_address: Vec<u8>,
}

pub(super) fn utf8<'a>(bytes: &'a [u8], field: &str) -> Result<&'a str, AuthError> {
    std::str::from_utf8(bytes)
        .map_err(|e| AuthError::Encoding(format!("{field} is not utf-8: {e}")))
}

/// Check `signature` over `message` in Hash mode, then in Raw mode.
///
/// When both fail the error names both failures.
pub(super) fn verify_envelope(
    public_key: &Secp256k1PublicKey,
    message: &BitcoinSignMessage,
    signature: &[u8],
) -> Result<(), AuthError> {
    let hash_err = match public_key.verify(&message.signing_bytes(SignMode::Hash), signature) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(error = %hash_err, "hash-mode check failed, trying raw text");

    public_key
        .verify(&message.signing_bytes(SignMode::Raw), signature)
        .map_err(|raw_err| {
            AuthError::InvalidSignature(format!("hash mode: {hash_err}; raw mode: {raw_err}"))
        })
}

impl AuthPayload {
    pub fn from_address(&self) -> Result<&str, AuthError> {
        utf8(&self.from_address, "from_address")
    }

    pub fn bitcoin_address(&self) -> Result<BitcoinAddress, AuthError> {
        Ok(BitcoinAddress::from_str(self.from_address()?)?)
    }

    /// Check the signature over `tx_hash`, that `from_address` is the
    /// Taproot address of the embedded key, and that it maps to `sender`.
    ///
    /// The envelope hash is tried first, then the raw text.
    pub fn verify(&self, tx_hash: &TxHash, sender: &RoochAddress) -> Result<(), AuthError> {
        let public_key = Secp256k1PublicKey::from_bytes(&self.public_key)?;
        let message = BitcoinSignMessage::from_parts(
            utf8(&self.message_prefix, "message_prefix")?,
            utf8(&self.message_info, "message_info")?,
            tx_hash.as_bytes(),
        );

        verify_envelope(&public_key, &message, &self.signature)?;

        let from = self.bitcoin_address()?;
        let derived = public_key.to_bitcoin_address(from.network())?;
        if derived != from {
            return Err(AuthError::AddressMismatch {
                expected: derived.format()?,
                actual: from.format()?,
            });
        }

        let native = from.to_rooch_address();
        if native != *sender {
            return Err(AuthError::AddressMismatch {
                expected: sender.to_hex_literal(),
                actual: native.to_hex_literal(),
            });
        }
        Ok(())
    }
}

impl BcsEncode for AuthPayload {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_bytes(&self.signature);
        writer.write_bytes(&self.message_prefix);
        writer.write_bytes(&self.message_info);
        writer.write_bytes(&self.public_key);
        writer.write_bytes(&self.from_address);
    }
}

impl BcsDecode for AuthPayload {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            signature: reader.read_bytes()?,
            message_prefix: reader.read_bytes()?,
            message_info: reader.read_bytes()?,
            public_key: reader.read_bytes()?,
            from_address: reader.read_bytes()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Build / verify
// ---------------------------------------------------------------------------

pub fn build(
    options: &BitcoinAuthOptions,
    signer: &dyn Signer,
    tx_hash: &TxHash,
) -> Result<Authenticator, AuthError> {
    let scheme = signer.key_scheme();
    if scheme != KeyScheme::Secp256k1 {
        return Err(AuthError::SchemeMismatch(format!(
            "bitcoin authenticator needs a secp256k1 signer, got {scheme}"
        )));
    }

    let message = BitcoinSignMessage::new(tx_hash.as_bytes(), &options.message_info);
    let signature = signer.sign(&message.signing_bytes(options.sign_mode))?;
    let public_key = signer.public_key_bytes();
    let from_address = BitcoinAddress::from_public_key(&public_key, options.network)?.format()?;

    let payload = AuthPayload {
        signature,
        message_prefix: message.message_prefix().as_bytes().to_vec(),
        message_info: message.message_info().as_bytes().to_vec(),
        public_key,
        from_address: from_address.into_bytes(),
    };
    Ok(Authenticator::new(
        BITCOIN_AUTH_VALIDATOR_ID,
        payload.to_bcs_bytes(),
    ))
}

pub fn verify(payload: &[u8], tx_hash: &TxHash, sender: &RoochAddress) -> Result<(), AuthError> {
    AuthPayload::from_bcs_bytes(payload)?.verify(tx_hash, sender)
}
