use std::fmt;
use std::str::FromStr;

use bitcoin::Network;

use crate::error::BtcError;

/// Base58 version byte of mainnet P2PKH addresses.
pub const MAINNET_P2PKH_VERSION: u8 = 0x00;
/// Base58 version byte of mainnet P2SH addresses.
pub const MAINNET_P2SH_VERSION: u8 = 0x05;
/// Base58 version byte of P2PKH addresses on every test network.
pub const TESTNET_P2PKH_VERSION: u8 = 0x6f;
/// Base58 version byte of P2SH addresses on every test network.
pub const TESTNET_P2SH_VERSION: u8 = 0xc4;

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BtcNetwork {
    #[default]
    Mainnet,
    Testnet,
    Signet,
    Regtest,
}

impl BtcNetwork {
    /// Convert to the `bitcoin` crate's `Network` type.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            BtcNetwork::Mainnet => Network::Bitcoin,
            BtcNetwork::Testnet => Network::Testnet,
            BtcNetwork::Signet => Network::Signet,
            BtcNetwork::Regtest => Network::Regtest,
        }
    }

    /// SegWit human-readable part.
    pub fn bech32_hrp(self) -> &'static str {
        match self {
            BtcNetwork::Mainnet => "bc",
            BtcNetwork::Testnet | BtcNetwork::Signet => "tb",
            BtcNetwork::Regtest => "bcrt",
        }
    }

    /// The network a SegWit HRP belongs to. `tb` maps to testnet.
    pub fn from_bech32_hrp(hrp: &str) -> Option<Self> {
        match hrp {
            "bc" => Some(BtcNetwork::Mainnet),
            "tb" => Some(BtcNetwork::Testnet),
            "bcrt" => Some(BtcNetwork::Regtest),
            _ => None,
        }
    }

    pub fn p2pkh_version(self) -> u8 {
        if self.is_mainnet() {
            MAINNET_P2PKH_VERSION
        } else {
            TESTNET_P2PKH_VERSION
        }
    }

    pub fn p2sh_version(self) -> u8 {
        if self.is_mainnet() {
            MAINNET_P2SH_VERSION
        } else {
            TESTNET_P2SH_VERSION
        }
    }

    pub fn is_mainnet(self) -> bool {
        self == BtcNetwork::Mainnet
    }

    /// Whether an address encoded for `other` reads the same on `self`.
    ///
    /// Testnet, signet and regtest share Base58 version bytes, and testnet
    /// and signet share the `tb` HRP.
    pub fn shares_base58_versions(self, other: BtcNetwork) -> bool {
        self.is_mainnet() == other.is_mainnet()
    }
}

impl fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
            BtcNetwork::Signet => write!(f, "signet"),
            BtcNetwork::Regtest => write!(f, "regtest"),
        }
    }
}

impl FromStr for BtcNetwork {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(BtcNetwork::Mainnet),
            "testnet" => Ok(BtcNetwork::Testnet),
            "signet" => Ok(BtcNetwork::Signet),
            "regtest" => Ok(BtcNetwork::Regtest),
            other => Err(BtcError::InvalidNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_bitcoin_network() {
        assert_eq!(BtcNetwork::Mainnet.to_bitcoin_network(), Network::Bitcoin);
        assert_eq!(BtcNetwork::Testnet.to_bitcoin_network(), Network::Testnet);
        assert_eq!(BtcNetwork::Signet.to_bitcoin_network(), Network::Signet);
        assert_eq!(BtcNetwork::Regtest.to_bitcoin_network(), Network::Regtest);
    }

    #[test]
    fn hrps() {
        assert_eq!(BtcNetwork::Mainnet.bech32_hrp(), "bc");
        assert_eq!(BtcNetwork::Testnet.bech32_hrp(), "tb");
        assert_eq!(BtcNetwork::Signet.bech32_hrp(), "tb");
        assert_eq!(BtcNetwork::Regtest.bech32_hrp(), "bcrt");
        assert_eq!(BtcNetwork::from_bech32_hrp("tb"), Some(BtcNetwork::Testnet));
        assert_eq!(BtcNetwork::from_bech32_hrp("ltc"), None);
    }

    #[test]
    fn version_bytes() {
        assert_eq!(BtcNetwork::Mainnet.p2pkh_version(), 0x00);
        assert_eq!(BtcNetwork::Mainnet.p2sh_version(), 0x05);
        for net in [BtcNetwork::Testnet, BtcNetwork::Signet, BtcNetwork::Regtest] {
            assert_eq!(net.p2pkh_version(), 0x6f);
            assert_eq!(net.p2sh_version(), 0xc4);
        }
    }

    #[test]
    fn shared_base58_versions() {
        assert!(BtcNetwork::Testnet.shares_base58_versions(BtcNetwork::Regtest));
        assert!(!BtcNetwork::Mainnet.shares_base58_versions(BtcNetwork::Signet));
    }

    #[test]
    fn display_and_parse() {
        for net in [
            BtcNetwork::Mainnet,
            BtcNetwork::Testnet,
            BtcNetwork::Signet,
            BtcNetwork::Regtest,
        ] {
            assert_eq!(net.to_string().parse::<BtcNetwork>().unwrap(), net);
        }
        assert_eq!("bitcoin".parse::<BtcNetwork>().unwrap(), BtcNetwork::Mainnet);
        assert!("liquid".parse::<BtcNetwork>().is_err());
    }

    #[test]
    fn clone_and_copy() {
        let net = BtcNetwork::Mainnet;
        let net2 = net;
        assert_eq!(net, net2);
    }
}
