//! Any supported address string, classified.

use std::fmt;
use std::str::FromStr;

use chain_btc::nostr::NOSTR_HRP;
use chain_btc::{BitcoinAddress, NostrAddress};
use rooch_types::address::ROOCH_HRP;
use rooch_types::multichain::MultiChainAddress;
use rooch_types::RoochAddress;

use crate::error::AuthError;

/// An address in one of the three supported families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAddress {
    Rooch(RoochAddress),
    Bitcoin(BitcoinAddress),
    Nostr(NostrAddress),
}

impl ParsedAddress {
    /// Classify `s` by its shape:
    ///
    /// - `0x…` hex or `rooch1…` bech32m: native
    /// - `npub1…`: Nostr
    /// - anything else: a Bitcoin address string (network auto-detected)
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        if s.starts_with("0x") {
            return Ok(Self::Rooch(RoochAddress::from_hex_literal(s)?));
        }
        if s.starts_with(&format!("{ROOCH_HRP}1")) {
            return Ok(Self::Rooch(RoochAddress::from_bech32(s)?));
        }
        if s.starts_with(&format!("{NOSTR_HRP}1")) {
            return Ok(Self::Nostr(NostrAddress::from_bech32(s)?));
        }
        BitcoinAddress::from_str(s)
            .map(Self::Bitcoin)
            .map_err(|e| AuthError::InvalidAddress(format!("unrecognised address {s:?}: {e}")))
    }

    pub fn to_rooch_address(&self) -> Result<RoochAddress, AuthError> {
        match self {
            Self::Rooch(address) => Ok(*address),
            Self::Bitcoin(address) => Ok(address.to_rooch_address()),
            Self::Nostr(address) => Ok(address.to_rooch_address()?),
        }
    }

    pub fn to_multichain_address(&self) -> MultiChainAddress {
        match self {
            Self::Rooch(address) => MultiChainAddress::from(*address),
            Self::Bitcoin(address) => address.to_multichain_address(),
            Self::Nostr(address) => address.to_multichain_address(),
        }
    }
}

impl FromStr for ParsedAddress {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ParsedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rooch(address) => write!(f, "{address}"),
            Self::Bitcoin(address) => write!(f, "{address}"),
            Self::Nostr(address) => write!(f, "{address}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooch_types::multichain::MultiChainId;

    const TAPROOT_NATIVE: &str =
        "0x0c9fae081aec16249e3c9c94e09170eb7222767e0b2db04e9c7144d6e5a4e804";

    #[test]
    fn hex_literal_is_native() {
        let parsed: ParsedAddress = "0x2".parse().unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 2;
        assert_eq!(parsed, ParsedAddress::Rooch(RoochAddress::new(expected)));
    }

    #[test]
    fn bech32_is_native() {
        let parsed: ParsedAddress =
            "rooch1pj06uzq6astzf83unj2wpytsadezyan7pvkmqn5uw9zddedyaqzq4090g0"
                .parse()
                .unwrap();
        assert_eq!(
            parsed.to_rooch_address().unwrap().to_hex_literal(),
            TAPROOT_NATIVE
        );
        assert_eq!(parsed.to_multichain_address().multichain_id, MultiChainId::Rooch);
    }

    #[test]
    fn bitcoin_strings() {
        let parsed: ParsedAddress = "bc1pesylj5fdhxktcnl34t9r9ple0anatqwhanhtsh33szpehqhgtagqcj0rk5"
            .parse()
            .unwrap();
        assert!(matches!(parsed, ParsedAddress::Bitcoin(_)));
        assert_eq!(
            parsed.to_rooch_address().unwrap().to_hex_literal(),
            TAPROOT_NATIVE
        );

        let legacy: ParsedAddress = "18cBEMRxXHqzWWCxZNtU91F5sbUNKhL5PX".parse().unwrap();
        assert_eq!(
            legacy.to_rooch_address().unwrap().to_hex_literal(),
            "0x419791e7f82060465cf8c16c8f45ab9930b3a944b18e1df2278807c12ea32c65"
        );
    }

    #[test]
    fn npub_is_nostr() {
        let s = "npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg";
        let parsed: ParsedAddress = s.parse().unwrap();
        assert!(matches!(parsed, ParsedAddress::Nostr(_)));
        assert_eq!(parsed.to_string(), s);
        assert_eq!(
            parsed.to_rooch_address().unwrap().to_hex_literal(),
            "0x7c68c347304d3a643e9ee64cfa69118319c8b7799be79df12f4f2754933cb958"
        );
        assert_eq!(parsed.to_multichain_address().multichain_id, MultiChainId::Nostr);
    }

    #[test]
    fn garbage_is_invalid_address() {
        let err = "definitely not an address".parse::<ParsedAddress>().unwrap_err();
        assert!(matches!(err, AuthError::InvalidAddress(_)));
        assert!("0xzz".parse::<ParsedAddress>().is_err());
    }
}
