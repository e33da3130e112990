//! BIP-86 Taproot output keys.
//!
//! A key-path-only output commits to no script tree, so the output key is
//! the internal x-only key tweaked by `tagged_hash("TapTweak", P)`:
//!
//! ```text
//! Q = P + int(SHA256(SHA256("TapTweak") || SHA256("TapTweak") || x(P))) * G
//! ```
//!
//! The curve arithmetic is delegated to `bitcoin::key::TapTweak`.

use bitcoin::key::TapTweak;
use bitcoin::secp256k1::{PublicKey, Secp256k1, XOnlyPublicKey};

use crate::error::BtcError;

/// Length of a compressed SEC1 public key.
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;
/// Length of an x-only (BIP-340) public key.
pub const X_ONLY_PUBLIC_KEY_LENGTH: usize = 32;

/// Parse a compressed (33-byte) or x-only (32-byte) secp256k1 key into its
/// x-only form. The point must lie on the curve.
pub fn x_only_public_key(public_key: &[u8]) -> Result<XOnlyPublicKey, BtcError> {
    match public_key.len() {
        COMPRESSED_PUBLIC_KEY_LENGTH => {
            let key = PublicKey::from_slice(public_key).map_err(|e| {
                BtcError::InvalidPublicKey(format!("failed to parse compressed public key: {e}"))
            })?;
            Ok(key.x_only_public_key().0)
        }
        X_ONLY_PUBLIC_KEY_LENGTH => XOnlyPublicKey::from_slice(public_key).map_err(|e| {
            BtcError::InvalidPublicKey(format!("failed to parse x-only public key: {e}"))
        }),
        other => Err(BtcError::InvalidPublicKey(format!(
            "expected {COMPRESSED_PUBLIC_KEY_LENGTH} or {X_ONLY_PUBLIC_KEY_LENGTH} bytes, \
             got {other}"
        ))),
    }
}

/// Tweak an internal key with an empty script tree.
pub fn tweak_internal_key(internal: XOnlyPublicKey) -> [u8; 32] {
    let secp = Secp256k1::verification_only();
    let (tweaked, _parity) = internal.tap_tweak(&secp, None);
    tweaked.to_inner().serialize()
}

/// The 32-byte witness v1 program for `public_key`.
pub fn output_key(public_key: &[u8]) -> Result<[u8; 32], BtcError> {
    Ok(tweak_internal_key(x_only_public_key(public_key)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::SecretKey;

    #[test]
    fn bip86_first_receive_address_vector() {
        // BIP-86, m/86'/0'/0'/0/0.
        let internal =
            hex::decode("cc8a4bc64d897bddc5fbc2f670f7a8ba0b386779106cf1223c6fc5d7cd6fc115")
                .unwrap();
        assert_eq!(
            hex::encode(output_key(&internal).unwrap()),
            "a60869f0dbcf1dc659c9cecbaf8050135ea9e8cdc487053f1dc6880949dc684c"
        );
    }

    #[test]
    fn compressed_and_x_only_inputs_agree() {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[0xcd; 32]).unwrap();
        let compressed = PublicKey::from_secret_key(&secp, &secret).serialize();

        let from_compressed = output_key(&compressed).unwrap();
        let from_x_only = output_key(&compressed[1..]).unwrap();
        assert_eq!(from_compressed, from_x_only);
        assert_eq!(
            hex::encode(from_compressed),
            "cc09f9512db9acbc4ff1aaca3287f97f67d581d7eceeb85e3180839b82e85f50"
        );
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(x_only_public_key(&[2u8; 31]).is_err());
        assert!(x_only_public_key(&[2u8; 65]).is_err());
    }

    #[test]
    fn rejects_points_off_the_curve() {
        let err = x_only_public_key(&[0u8; 33]).unwrap_err();
        assert!(matches!(err, BtcError::InvalidPublicKey(_)));
        assert!(x_only_public_key(&[0xff; 32]).is_err());
    }
}
