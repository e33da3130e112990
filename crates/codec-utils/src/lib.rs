//! # codec-utils
//!
//! Byte-level building blocks shared by the address and transaction crates:
//! hash wrappers, length prefixes, Bech32/Base58Check string codecs and the
//! BCS binary encoder.

pub mod base58;
pub mod bcs;
pub mod bech32;
pub mod error;
pub mod hash;
pub mod varint;

pub use bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
pub use error::CodecError;
