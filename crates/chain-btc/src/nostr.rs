//! Nostr public keys (NIP-19 `npub`).
//!
//! A Nostr identity is an x-only secp256k1 key, the same key space as
//! Taproot. Its native address is the one of the key-path P2TR address
//! derived from that key.

use std::fmt;
use std::str::FromStr;

use codec_utils::bech32::{self, Variant};
use rooch_types::multichain::{MultiChainAddress, MultiChainId};
use rooch_types::RoochAddress;

use crate::address::BitcoinAddress;
use crate::error::BtcError;
use crate::network::BtcNetwork;
use crate::taproot;

/// Human-readable part of an encoded Nostr public key.
pub const NOSTR_HRP: &str = "npub";

/// An x-only public key, validated to lie on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NostrAddress([u8; 32]);

impl NostrAddress {
    /// Accepts a 32-byte x-only key or a 33-byte compressed key.
    pub fn from_public_key(public_key: &[u8]) -> Result<Self, BtcError> {
        let x_only = taproot::x_only_public_key(public_key)?;
        Ok(Self(x_only.serialize()))
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_bech32(&self) -> Result<String, BtcError> {
        Ok(bech32::encode_bytes(NOSTR_HRP, &self.0, Variant::Bech32)?)
    }

    pub fn from_bech32(s: &str) -> Result<Self, BtcError> {
        let (hrp, bytes, variant) = bech32::decode_bytes(s)?;
        if hrp != NOSTR_HRP {
            return Err(BtcError::InvalidAddress(format!(
                "expected hrp {NOSTR_HRP:?}, got {hrp:?}"
            )));
        }
        if variant != Variant::Bech32 {
            return Err(BtcError::InvalidAddress(
                "npub keys use the bech32 checksum".into(),
            ));
        }
        if bytes.len() != taproot::X_ONLY_PUBLIC_KEY_LENGTH {
            return Err(BtcError::InvalidAddress(format!(
                "npub payload must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        Self::from_public_key(&bytes)
    }

    /// The BIP-86 Taproot address for this key.
    pub fn to_bitcoin_address(&self, network: BtcNetwork) -> Result<BitcoinAddress, BtcError> {
        BitcoinAddress::from_public_key(&self.0, network)
    }

    /// Same as the native address of [`to_bitcoin_address`](Self::to_bitcoin_address);
    /// the network does not affect it.
    pub fn to_rooch_address(&self) -> Result<RoochAddress, BtcError> {
        Ok(self.to_bitcoin_address(BtcNetwork::Mainnet)?.to_rooch_address())
    }

    /// Multi-chain form: the raw 32-byte key under the Nostr chain id.
    pub fn to_multichain_address(&self) -> MultiChainAddress {
        MultiChainAddress::new(MultiChainId::Nostr, self.0.to_vec())
    }

    pub fn from_multichain_address(address: &MultiChainAddress) -> Result<Self, BtcError> {
        if address.multichain_id != MultiChainId::Nostr {
            return Err(BtcError::InvalidAddress(format!(
                "expected a nostr address, got {}",
                address.multichain_id
            )));
        }
        if address.raw_address.len() != taproot::X_ONLY_PUBLIC_KEY_LENGTH {
            return Err(BtcError::InvalidAddress(format!(
                "nostr raw address must be 32 bytes, got {}",
                address.raw_address.len()
            )));
        }
        Self::from_public_key(&address.raw_address)
    }
}

impl FromStr for NostrAddress {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

impl fmt::Display for NostrAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.to_bech32().map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NPUB: &str = "npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg";
    const KEY_HEX: &str = "7e7e9c42a91bfef19fa929e5fda1b72e0ebc1a4c1141673e2794234d86addf4e";

    fn key() -> Vec<u8> {
        hex::decode(KEY_HEX).unwrap()
    }

    #[test]
    fn npub_vector() {
        let address = NostrAddress::from_public_key(&key()).unwrap();
        assert_eq!(address.to_string(), NPUB);
        let parsed: NostrAddress = NPUB.parse().unwrap();
        assert_eq!(parsed, address);
        assert_eq!(hex::encode(parsed.public_key()), KEY_HEX);
    }

    #[test]
    fn derives_taproot_and_native_address() {
        let address: NostrAddress = NPUB.parse().unwrap();
        let btc = address.to_bitcoin_address(BtcNetwork::Mainnet).unwrap();
        assert_eq!(
            btc.to_string(),
            "bc1pvvymzaajnverlq90cqupmtwep2txzarvvwqfs4p8jfvkepqaws5scnww04"
        );
        let rooch = address.to_rooch_address().unwrap();
        assert_eq!(
            rooch.to_hex_literal(),
            "0x7c68c347304d3a643e9ee64cfa69118319c8b7799be79df12f4f2754933cb958"
        );
        assert_eq!(
            rooch.to_bech32().unwrap(),
            "rooch1035vx3esf5axg057uex056g3svvu3dmen0nemuf0fun4fyeuh9vqvn4y0f"
        );
        assert_eq!(rooch, btc.to_rooch_address());
    }

    #[test]
    fn multichain_round_trip() {
        let address: NostrAddress = NPUB.parse().unwrap();
        let multi = address.to_multichain_address();
        assert_eq!(multi.multichain_id, MultiChainId::Nostr);
        assert_eq!(multi.raw_address, key());
        assert_eq!(NostrAddress::from_multichain_address(&multi).unwrap(), address);

        let wrong = MultiChainAddress::new(MultiChainId::Bitcoin, key());
        assert!(NostrAddress::from_multichain_address(&wrong).is_err());
    }

    #[test]
    fn rejects_other_hrps_and_variants() {
        let nsec = bech32::encode_bytes("nsec", &key(), Variant::Bech32).unwrap();
        assert!(nsec.parse::<NostrAddress>().is_err());
        let m = bech32::encode_bytes(NOSTR_HRP, &key(), Variant::Bech32m).unwrap();
        assert!(m.parse::<NostrAddress>().is_err());
        let short = bech32::encode_bytes(NOSTR_HRP, &key()[..20], Variant::Bech32).unwrap();
        assert!(short.parse::<NostrAddress>().is_err());
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut bad = NPUB.to_string();
        bad.pop();
        bad.push('q');
        assert!(bad.parse::<NostrAddress>().is_err());
    }

    #[test]
    fn compressed_key_maps_to_x_only() {
        let mut compressed = vec![0x02];
        compressed.extend(key());
        let from_compressed = NostrAddress::from_public_key(&compressed).unwrap();
        assert_eq!(from_compressed.to_string(), NPUB);
    }
}
