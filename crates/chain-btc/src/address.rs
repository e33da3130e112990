//! Bitcoin addresses and their native-address mapping.
//!
//! Internally an address is its payload type plus payload, serialized as:
//!
//! ```text
//! PubkeyHash      0x00 || hash160                 (21 bytes)
//! ScriptHash      0x01 || hash160                 (21 bytes)
//! WitnessProgram  0x02 || version || program      (4..=42 bytes)
//! ```
//!
//! These bytes are the `raw_address` of the Bitcoin multi-chain address,
//! and BLAKE2b-256 over them is the native address.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use codec_utils::hash::hash160;
use codec_utils::{base58, bech32};
use rooch_types::multichain::{MultiChainAddress, MultiChainId};
use rooch_types::RoochAddress;

use crate::error::BtcError;
use crate::network::BtcNetwork;
use crate::taproot;

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Leading byte of the serialized payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PayloadType {
    PubkeyHash = 0,
    ScriptHash = 1,
    WitnessProgram = 2,
}

impl PayloadType {
    pub fn from_byte(byte: u8) -> Result<Self, BtcError> {
        match byte {
            0 => Ok(PayloadType::PubkeyHash),
            1 => Ok(PayloadType::ScriptHash),
            2 => Ok(PayloadType::WitnessProgram),
            other => Err(BtcError::InvalidAddress(format!(
                "unknown payload type {other}"
            ))),
        }
    }
}

/// Standard output script classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
    P2tr,
    /// A witness version or length with no standard meaning yet.
    UnknownWitness,
}

/// What a Bitcoin address pays to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BitcoinPayload {
    PubkeyHash([u8; 20]),
    ScriptHash([u8; 20]),
    WitnessProgram { version: u8, program: Vec<u8> },
}

impl BitcoinPayload {
    pub fn payload_type(&self) -> PayloadType {
        match self {
            BitcoinPayload::PubkeyHash(_) => PayloadType::PubkeyHash,
            BitcoinPayload::ScriptHash(_) => PayloadType::ScriptHash,
            BitcoinPayload::WitnessProgram { .. } => PayloadType::WitnessProgram,
        }
    }

    /// Serialize as `type || (version) || data`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.payload_type() as u8];
        match self {
            BitcoinPayload::PubkeyHash(hash) | BitcoinPayload::ScriptHash(hash) => {
                out.extend_from_slice(hash);
            }
            BitcoinPayload::WitnessProgram { version, program } => {
                out.push(*version);
                out.extend_from_slice(program);
            }
        }
        out
    }

    /// Parse the output of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BtcError> {
        let (&type_byte, rest) = bytes
            .split_first()
            .ok_or_else(|| BtcError::InvalidAddress("empty address bytes".into()))?;
        Self::from_typed(PayloadType::from_byte(type_byte)?, rest)
    }

    /// Build a payload from its type and the bytes that follow the type
    /// byte: a 20-byte hash, or `version || program` for witness programs.
    pub fn from_typed(payload_type: PayloadType, data: &[u8]) -> Result<Self, BtcError> {
        let payload = match payload_type {
            PayloadType::PubkeyHash => BitcoinPayload::PubkeyHash(hash20(data)?),
            PayloadType::ScriptHash => BitcoinPayload::ScriptHash(hash20(data)?),
            PayloadType::WitnessProgram => {
                let (&version, program) = data.split_first().ok_or_else(|| {
                    BtcError::InvalidAddress("witness payload missing version".into())
                })?;
                BitcoinPayload::WitnessProgram {
                    version,
                    program: program.to_vec(),
                }
            }
        };
        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> Result<(), BtcError> {
        if let BitcoinPayload::WitnessProgram { version, program } = self {
            // Reuse the SegWit encoder's version and length rules.
            bech32::encode_segwit("bc", *version, program)
                .map_err(|e| BtcError::InvalidAddress(format!("invalid witness program: {e}")))?;
        }
        Ok(())
    }

    pub fn address_type(&self) -> AddressType {
        match self {
            BitcoinPayload::PubkeyHash(_) => AddressType::P2pkh,
            BitcoinPayload::ScriptHash(_) => AddressType::P2sh,
            BitcoinPayload::WitnessProgram { version, program } => match (version, program.len()) {
                (0, 20) => AddressType::P2wpkh,
                (0, 32) => AddressType::P2wsh,
                (1, 32) => AddressType::P2tr,
                _ => AddressType::UnknownWitness,
            },
        }
    }
}

fn hash20(data: &[u8]) -> Result<[u8; 20], BtcError> {
    data.try_into().map_err(|_| {
        BtcError::InvalidAddress(format!("expected a 20-byte hash, got {} bytes", data.len()))
    })
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A Bitcoin address on a specific network.
///
/// The derived native address is computed on first use and kept in
/// `rooch_address`; equality and hashing ignore that slot.
#[derive(Debug, Clone)]
pub struct BitcoinAddress {
    network: BtcNetwork,
    payload: BitcoinPayload,
    rooch_address: OnceLock<RoochAddress>,
}

impl BitcoinAddress {
    fn from_parts(network: BtcNetwork, payload: BitcoinPayload) -> Self {
        Self {
            network,
            payload,
            rooch_address: OnceLock::new(),
        }
    }

    pub fn p2pkh(pubkey_hash: [u8; 20], network: BtcNetwork) -> Self {
        Self::from_parts(network, BitcoinPayload::PubkeyHash(pubkey_hash))
    }

    pub fn p2sh(script_hash: [u8; 20], network: BtcNetwork) -> Self {
        Self::from_parts(network, BitcoinPayload::ScriptHash(script_hash))
    }

    /// A SegWit address. Fails on out-of-range versions or program lengths.
    pub fn witness(version: u8, program: &[u8], network: BtcNetwork) -> Result<Self, BtcError> {
        let payload = BitcoinPayload::WitnessProgram {
            version,
            program: program.to_vec(),
        };
        payload.validate()?;
        Ok(Self::from_parts(network, payload))
    }

    /// Key-path-only Taproot (P2TR) address for a compressed or x-only key.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(public_key)))]
    pub fn from_public_key(public_key: &[u8], network: BtcNetwork) -> Result<Self, BtcError> {
        let output_key = taproot::output_key(public_key)?;
        Self::witness(1, &output_key, network)
    }

    /// Native SegWit P2WPKH address for a compressed public key.
    pub fn p2wpkh_from_public_key(
        public_key: &[u8; 33],
        network: BtcNetwork,
    ) -> Result<Self, BtcError> {
        // Rejects keys that are not valid curve points.
        taproot::x_only_public_key(public_key)?;
        Self::witness(0, &hash160(public_key), network)
    }

    /// Build from hex payload data and an explicit payload type.
    ///
    /// `data_hex` is the 20-byte hash for [`PayloadType::PubkeyHash`] and
    /// [`PayloadType::ScriptHash`], or `version || program` for
    /// [`PayloadType::WitnessProgram`].
    pub fn from_payload_hex(
        data_hex: &str,
        payload_type: PayloadType,
        network: BtcNetwork,
    ) -> Result<Self, BtcError> {
        let data = hex::decode(data_hex.strip_prefix("0x").unwrap_or(data_hex))
            .map_err(|e| BtcError::InvalidAddress(format!("invalid payload hex: {e}")))?;
        let payload = BitcoinPayload::from_typed(payload_type, &data)?;
        Ok(Self::from_parts(network, payload))
    }

    /// Build from serialized `type || payload` bytes.
    pub fn from_bytes(bytes: &[u8], network: BtcNetwork) -> Result<Self, BtcError> {
        Ok(Self::from_parts(network, BitcoinPayload::from_bytes(bytes)?))
    }

    /// Decode an address string that must belong to `network`.
    ///
    /// Testnet, signet and regtest share Base58 version bytes, and testnet
    /// and signet share the `tb` HRP, so those combinations are accepted.
    #[cfg_attr(feature = "tracing", tracing::instrument)]
    pub fn parse(s: &str, network: BtcNetwork) -> Result<Self, BtcError> {
        let decoded = Self::from_str(s)?;

        let matches = if is_segwit_string(s) {
            decoded.network.bech32_hrp() == network.bech32_hrp()
        } else {
            decoded.network.shares_base58_versions(network)
        };
        if !matches {
            return Err(BtcError::InvalidAddress(format!(
                "{s:?} is a {} address, expected {network}",
                decoded.network
            )));
        }
        Ok(Self::from_parts(network, decoded.payload))
    }

    pub fn network(&self) -> BtcNetwork {
        self.network
    }

    pub fn payload(&self) -> &BitcoinPayload {
        &self.payload
    }

    pub fn payload_type(&self) -> PayloadType {
        self.payload.payload_type()
    }

    pub fn address_type(&self) -> AddressType {
        self.payload.address_type()
    }

    /// Serialized `type || payload` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.payload.to_bytes()
    }

    /// Encode for this address's network.
    pub fn format(&self) -> Result<String, BtcError> {
        self.format_for(self.network)
    }

    /// Encode the same payload for another network.
    pub fn format_for(&self, network: BtcNetwork) -> Result<String, BtcError> {
        match &self.payload {
            BitcoinPayload::PubkeyHash(hash) => {
                Ok(base58::encode_check(network.p2pkh_version(), hash))
            }
            BitcoinPayload::ScriptHash(hash) => {
                Ok(base58::encode_check(network.p2sh_version(), hash))
            }
            BitcoinPayload::WitnessProgram { version, program } => Ok(bech32::encode_segwit(
                network.bech32_hrp(),
                *version,
                program,
            )?),
        }
    }

    /// The native address: BLAKE2b-256 over [`to_bytes`](Self::to_bytes).
    /// Computed once per value.
    pub fn to_rooch_address(&self) -> RoochAddress {
        *self
            .rooch_address
            .get_or_init(|| RoochAddress::hash_of(&self.payload.to_bytes()))
    }

    pub fn to_multichain_address(&self) -> MultiChainAddress {
        MultiChainAddress::new(MultiChainId::Bitcoin, self.to_bytes())
    }

    /// Read back a Bitcoin multi-chain address.
    pub fn from_multichain_address(
        address: &MultiChainAddress,
        network: BtcNetwork,
    ) -> Result<Self, BtcError> {
        if address.multichain_id != MultiChainId::Bitcoin {
            return Err(BtcError::InvalidAddress(format!(
                "expected a bitcoin address, got {}",
                address.multichain_id
            )));
        }
        Self::from_bytes(&address.raw_address, network)
    }

    /// Convert to the `bitcoin` crate's address type.
    pub fn to_bitcoin_address(&self) -> Result<bitcoin::Address, BtcError> {
        let encoded = self.format()?;
        encoded
            .parse::<bitcoin::Address<bitcoin::address::NetworkUnchecked>>()
            .map_err(|e| BtcError::InvalidAddress(format!("failed to parse address: {e}")))?
            .require_network(self.network.to_bitcoin_network())
            .map_err(|e| BtcError::InvalidAddress(format!("network mismatch: {e}")))
    }
}

fn is_segwit_string(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    ["bc1", "tb1", "bcrt1"].iter().any(|p| lower.starts_with(p))
}

impl FromStr for BitcoinAddress {
    type Err = BtcError;

    /// Decode an address string, inferring the network from its HRP or
    /// version byte. `tb` and the test version bytes map to testnet.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_segwit_string(s) {
            let (hrp, version, program) = bech32::decode_segwit(s)?;
            let network = BtcNetwork::from_bech32_hrp(&hrp).ok_or_else(|| {
                BtcError::InvalidAddress(format!("{s:?}: unknown hrp {hrp:?}"))
            })?;
            return Self::witness(version, &program, network);
        }

        let (version, payload) = base58::decode_check(s)?;
        let hash = hash20(&payload)?;
        match version {
            0x00 => Ok(Self::p2pkh(hash, BtcNetwork::Mainnet)),
            0x05 => Ok(Self::p2sh(hash, BtcNetwork::Mainnet)),
            0x6f => Ok(Self::p2pkh(hash, BtcNetwork::Testnet)),
            0xc4 => Ok(Self::p2sh(hash, BtcNetwork::Testnet)),
            other => Err(BtcError::InvalidAddress(format!(
                "{s:?}: unknown version byte {other:#04x}"
            ))),
        }
    }
}

impl fmt::Display for BitcoinAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = self.format().map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl PartialEq for BitcoinAddress {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network && self.payload == other.payload
    }
}

impl Eq for BitcoinAddress {}

impl Hash for BitcoinAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.network.hash(state);
        self.payload.hash(state);
    }
}
