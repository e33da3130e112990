//! Bitcoin and Nostr address support.
//!
//! Parses and formats legacy (Base58Check) and SegWit (bech32/bech32m)
//! Bitcoin addresses, derives BIP-86 Taproot addresses from public keys,
//! encodes Nostr `npub` keys, and maps all of them onto native addresses.

pub mod address;
pub mod error;
pub mod network;
pub mod nostr;
pub mod taproot;

pub use address::{AddressType, BitcoinAddress, BitcoinPayload, PayloadType};
pub use error::BtcError;
pub use network::BtcNetwork;
pub use nostr::NostrAddress;
