//! # rooch-auth
//!
//! Transaction authentication for the native chain: the key-scheme
//! registry, the [`Signer`] capability, authenticator construction and
//! verification for the native, Bitcoin and Bitcoin multisign schemes, plus
//! the address and path validators that sit in front of them.
//!
//! The end-to-end flow:
//!
//! ```text
//! RoochTransactionData --encode_transaction--> bytes --hash--> TxHash
//!                                                               |
//!            Signer + AuthScheme --build_authenticator----------+--> Authenticator
//!                                                               |
//!            Authenticator + sender --verify_authenticator------+--> Ok(())
//! ```

pub mod authenticator;
pub mod config;
pub mod derivation_path;
pub mod error;
pub mod keys;
pub mod parsed_address;
pub mod scope;
pub mod signer;

pub use authenticator::{
    build_authenticator, verify_authenticator, AuthScheme, Authenticator, BitcoinAuthOptions,
    MultisignAuthPayload,
};
pub use error::AuthError;
pub use keys::{KeyScheme, PublicKey};
pub use parsed_address::ParsedAddress;
pub use rooch_types::transaction::{encode_transaction, hash};
pub use scope::SessionScope;
pub use signer::{Ed25519Signer, Secp256k1Signer, Signer};
