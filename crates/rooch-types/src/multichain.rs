//! Chain-tagged raw addresses.
//!
//! ```text
//! MultiChainAddress (BCS):
//!   multichain_id   u64 (SLIP-44 style coin id)
//!   raw_address     vector<u8>
//! ```

use std::fmt;
use std::str::FromStr;

use codec_utils::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use codec_utils::CodecError;

use crate::address::RoochAddress;
use crate::error::TypesError;

pub const BITCOIN_MULTICHAIN_ID: u64 = 0;
pub const NOSTR_MULTICHAIN_ID: u64 = 1237;
pub const ROOCH_MULTICHAIN_ID: u64 = 20230101;

/// Address families this crate can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiChainId {
    Bitcoin,
    Nostr,
    Rooch,
}

impl MultiChainId {
    pub const fn id(self) -> u64 {
        match self {
            MultiChainId::Bitcoin => BITCOIN_MULTICHAIN_ID,
            MultiChainId::Nostr => NOSTR_MULTICHAIN_ID,
            MultiChainId::Rooch => ROOCH_MULTICHAIN_ID,
        }
    }

    pub fn from_id(id: u64) -> Result<Self, TypesError> {
        match id {
            BITCOIN_MULTICHAIN_ID => Ok(MultiChainId::Bitcoin),
            NOSTR_MULTICHAIN_ID => Ok(MultiChainId::Nostr),
            ROOCH_MULTICHAIN_ID => Ok(MultiChainId::Rooch),
            other => Err(TypesError::InvalidAddress(format!(
                "unsupported multichain id {other}"
            ))),
        }
    }
}

impl fmt::Display for MultiChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiChainId::Bitcoin => write!(f, "bitcoin"),
            MultiChainId::Nostr => write!(f, "nostr"),
            MultiChainId::Rooch => write!(f, "rooch"),
        }
    }
}

impl FromStr for MultiChainId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bitcoin" => Ok(MultiChainId::Bitcoin),
            "nostr" => Ok(MultiChainId::Nostr),
            "rooch" => Ok(MultiChainId::Rooch),
            other => Err(TypesError::InvalidAddress(format!(
                "unsupported chain {other:?}"
            ))),
        }
    }
}

/// A raw address tagged with the chain it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiChainAddress {
    pub multichain_id: MultiChainId,
    pub raw_address: Vec<u8>,
}

impl MultiChainAddress {
    pub fn new(multichain_id: MultiChainId, raw_address: Vec<u8>) -> Self {
        Self {
            multichain_id,
            raw_address,
        }
    }

    pub fn is_rooch_address(&self) -> bool {
        self.multichain_id == MultiChainId::Rooch
    }

    /// The native address, if this is one.
    pub fn to_rooch_address(&self) -> Result<RoochAddress, TypesError> {
        if !self.is_rooch_address() {
            return Err(TypesError::InvalidAddress(format!(
                "{} address is not a native address",
                self.multichain_id
            )));
        }
        RoochAddress::from_bytes(&self.raw_address)
    }
}

impl From<RoochAddress> for MultiChainAddress {
    fn from(address: RoochAddress) -> Self {
        Self::new(MultiChainId::Rooch, address.to_vec())
    }
}

impl BcsEncode for MultiChainAddress {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_u64(self.multichain_id.id());
        writer.write_bytes(&self.raw_address);
    }
}

impl BcsDecode for MultiChainAddress {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        let id = reader.read_u64()?;
        let multichain_id =
            MultiChainId::from_id(id).map_err(|e| CodecError::Encoding(e.to_string()))?;
        let raw_address = reader.read_bytes()?;
        Ok(Self::new(multichain_id, raw_address))
    }
}
