//! Authenticators: the signature blob attached to a transaction.
//!
//! ```text
//! Authenticator (BCS)
//! +-------------------+----------------------------+
//! | auth_validator_id | payload                    |
//! | u64 LE            | uleb128(len) || bytes      |
//! +-------------------+----------------------------+
//!
//! validator 0 (native):     flag || signature || public_key
//! validator 1 (bitcoin):    BCS AuthPayload, see [`bitcoin`]
//! validator 2 (multisign):  BCS MultisignAuthPayload, see [`multisign`]
//! ```
//!
//! As a string an authenticator is the `0x`-prefixed hex of its BCS bytes.

pub mod bitcoin;
pub mod multisign;
pub mod native;

use std::fmt;
use std::str::FromStr;

use chain_btc::BtcNetwork;
use codec_utils::{BcsDecode, BcsEncode, BcsReader, BcsWriter, CodecError};
use rooch_types::{RoochAddress, TxHash};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::signer::Signer;

pub use self::bitcoin::{AuthPayload, BitcoinSignMessage, SignMode};
pub use self::multisign::MultisignAuthPayload;

pub const NATIVE_AUTH_VALIDATOR_ID: u64 = 0;
pub const BITCOIN_AUTH_VALIDATOR_ID: u64 = 1;
pub const BITCOIN_MULTISIGN_AUTH_VALIDATOR_ID: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticator {
    pub auth_validator_id: u64,
    #[serde(with = "hex_payload")]
    pub payload: Vec<u8>,
}

impl Authenticator {
    pub fn new(auth_validator_id: u64, payload: Vec<u8>) -> Self {
        Self {
            auth_validator_id,
            payload,
        }
    }

    /// Merge Bitcoin authenticators from several co-signers of one
    /// transaction. See [`multisign::build`].
    pub fn bitcoin_multisign(authenticators: &[Authenticator]) -> Result<Self, AuthError> {
        multisign::build(authenticators)
    }
}

impl fmt::Display for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bcs_bytes()))
    }
}

impl FromStr for Authenticator {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|e| AuthError::Parse(format!("authenticator hex: {e}")))?;
        Ok(Self::from_bcs_bytes(&bytes)?)
    }
}

impl BcsEncode for Authenticator {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_u64(self.auth_validator_id);
        writer.write_bytes(&self.payload);
    }
}

impl BcsDecode for Authenticator {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            auth_validator_id: reader.read_u64()?,
            payload: reader.read_bytes()?,
        })
    }
}

mod hex_payload {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Schemes
// ---------------------------------------------------------------------------

/// How to authenticate a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// Validator 0: sign the transaction hash directly.
    Native,
    /// Validator 1: sign a Bitcoin signed-message envelope around the hash.
    Bitcoin(BitcoinAuthOptions),
}

impl AuthScheme {
    pub fn auth_validator_id(&self) -> u64 {
        match self {
            AuthScheme::Native => NATIVE_AUTH_VALIDATOR_ID,
            AuthScheme::Bitcoin(_) => BITCOIN_AUTH_VALIDATOR_ID,
        }
    }
}

/// Caller context for the Bitcoin scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinAuthOptions {
    /// Human-readable context placed before the hash. The
    /// `"Rooch Transaction:\n"` prefix and trailing newline are added when
    /// missing.
    pub message_info: String,
    /// Must match what the signer actually signs.
    pub sign_mode: SignMode,
    /// Network the `from_address` is formatted for.
    pub network: BtcNetwork,
}

impl Default for BitcoinAuthOptions {
    fn default() -> Self {
        Self {
            message_info: String::new(),
            sign_mode: SignMode::Hash,
            network: BtcNetwork::Mainnet,
        }
    }
}

/// Sign `tx_hash` with `signer` under `scheme`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        skip(signer),
        fields(validator = scheme.auth_validator_id(), key = %signer.key_scheme())
    )
)]
pub fn build_authenticator(
    scheme: &AuthScheme,
    signer: &dyn Signer,
    tx_hash: &TxHash,
) -> Result<Authenticator, AuthError> {
    match scheme {
        AuthScheme::Native => native::build(signer, tx_hash),
        AuthScheme::Bitcoin(options) => bitcoin::build(options, signer, tx_hash),
    }
}

/// Check that `authenticator` carries a valid signature over `tx_hash` by
/// the key that controls `sender`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(authenticator)))]
pub fn verify_authenticator(
    authenticator: &Authenticator,
    tx_hash: &TxHash,
    sender: &RoochAddress,
) -> Result<(), AuthError> {
    let result = match authenticator.auth_validator_id {
        NATIVE_AUTH_VALIDATOR_ID => native::verify(&authenticator.payload, tx_hash, sender),
        BITCOIN_AUTH_VALIDATOR_ID => bitcoin::verify(&authenticator.payload, tx_hash, sender),
        BITCOIN_MULTISIGN_AUTH_VALIDATOR_ID => {
            multisign::verify(&authenticator.payload, tx_hash, sender)
        }
        other => Err(AuthError::SchemeMismatch(format!(
            "unknown auth validator {other}"
        ))),
    };

    #[cfg(feature = "tracing")]
    let result = result.inspect_err(|e| tracing::debug!(error = %e, "authenticator rejected"));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Ed25519Signer;

    #[test]
    fn bcs_layout() {
        let auth = Authenticator::new(1, vec![0xaa, 0xbb]);
        assert_eq!(
            auth.to_bcs_bytes(),
            vec![1, 0, 0, 0, 0, 0, 0, 0, 2, 0xaa, 0xbb]
        );
        assert_eq!(Authenticator::from_bcs_bytes(&auth.to_bcs_bytes()).unwrap(), auth);
    }

    #[test]
    fn json_uses_hex_payload() {
        let auth = Authenticator::new(0, vec![0x01, 0xff]);
        let json = serde_json::to_string(&auth).unwrap();
        assert_eq!(json, r#"{"auth_validator_id":0,"payload":"0x01ff"}"#);
        let back: Authenticator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, auth);
    }

    #[test]
    fn string_form_is_hex_of_bcs() {
        let auth = Authenticator::new(1, vec![0xaa, 0xbb]);
        let text = auth.to_string();
        assert_eq!(text, "0x010000000000000002aabb");
        assert_eq!(text.parse::<Authenticator>().unwrap(), auth);
        assert_eq!(
            "010000000000000002aabb".parse::<Authenticator>().unwrap(),
            auth
        );
    }

    #[test]
    fn bad_strings_are_rejected() {
        assert!(matches!(
            "0xzz".parse::<Authenticator>(),
            Err(AuthError::Parse(_))
        ));
        // Valid hex, but the payload length prefix runs past the end.
        assert!(matches!(
            "0x010000000000000005aa".parse::<Authenticator>(),
            Err(AuthError::Encoding(_))
        ));
        // Trailing byte after a complete authenticator.
        assert!(matches!(
            "0x0100000000000000000000".parse::<Authenticator>(),
            Err(AuthError::Encoding(_))
        ));
    }

    #[test]
    fn multisign_dispatch_and_string_round_trip() {
        use crate::signer::Secp256k1Signer;

        let hash = TxHash::new([9u8; 32]);
        let scheme = AuthScheme::Bitcoin(BitcoinAuthOptions::default());
        let auths: Vec<_> = [[0x21u8; 32], [0x22u8; 32]]
            .iter()
            .map(|secret| {
                let signer = Secp256k1Signer::from_bytes(secret).unwrap();
                build_authenticator(&scheme, &signer, &hash).unwrap()
            })
            .collect();

        let multi = Authenticator::bitcoin_multisign(&auths).unwrap();
        assert_eq!(multi.auth_validator_id, BITCOIN_MULTISIGN_AUTH_VALIDATOR_ID);
        let reparsed: Authenticator = multi.to_string().parse().unwrap();
        assert_eq!(reparsed, multi);
        verify_authenticator(&reparsed, &hash, &RoochAddress::ZERO).unwrap();
        let other_hash = TxHash::new([8u8; 32]);
        assert!(verify_authenticator(&reparsed, &other_hash, &RoochAddress::ZERO).is_err());
    }

    #[test]
    fn unknown_validator_is_rejected() {
        let auth = Authenticator::new(9, vec![]);
        let err = verify_authenticator(&auth, &TxHash::new([0; 32]), &RoochAddress::ZERO)
            .unwrap_err();
        assert!(matches!(err, AuthError::SchemeMismatch(_)));
    }

    #[test]
    fn scheme_ids() {
        assert_eq!(AuthScheme::Native.auth_validator_id(), 0);
        assert_eq!(
            AuthScheme::Bitcoin(BitcoinAuthOptions::default()).auth_validator_id(),
            1
        );
    }

    #[test]
    fn builder_dispatches_on_scheme() {
        let signer = Ed25519Signer::from_bytes(&[3u8; 32]).unwrap();
        let hash = TxHash::new([9u8; 32]);
        let auth = build_authenticator(&AuthScheme::Native, &signer, &hash).unwrap();
        assert_eq!(auth.auth_validator_id, NATIVE_AUTH_VALIDATOR_ID);
        // Ed25519 keys cannot produce Bitcoin signatures.
        let err = build_authenticator(
            &AuthScheme::Bitcoin(BitcoinAuthOptions::default()),
            &signer,
            &hash,
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::SchemeMismatch(_)));
    }
}
