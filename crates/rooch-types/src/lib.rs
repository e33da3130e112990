//! # rooch-types
//!
//! Chain-native value types: the 32-byte account address, Move type tags
//! and their canonical strings, object ids, multi-chain addresses and the
//! transaction payload with its canonical encoding and hash.

pub mod address;
pub mod chain_id;
pub mod error;
pub mod identifier;
pub mod multichain;
pub mod object_id;
pub mod transaction;
pub mod type_tag;

pub use address::RoochAddress;
pub use error::TypesError;
pub use object_id::ObjectId;
pub use transaction::{RoochTransactionData, TxHash};
pub use type_tag::{StructTag, TypeTag};
