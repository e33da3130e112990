//! Deterministic object ids for named on-chain resources.

use std::fmt;
use std::str::FromStr;

use codec_utils::hash::sha3_256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::RoochAddress;
use crate::error::TypesError;
use crate::type_tag::StructTag;

/// A 32-byte object id, printed as `0x` + 64 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 32]);

impl ObjectId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

/// Id of the singleton object named by `tag`:
/// `SHA3-256(canonical_string(tag))`.
///
/// Equal tags give equal ids however their addresses were written, since
/// the canonical string always expands addresses to 64 hex digits.
pub fn struct_tag_to_object_id(tag: &StructTag) -> ObjectId {
    ObjectId(sha3_256(tag.to_canonical_string().as_bytes()))
}

/// Id of the object named by `tag` under `account`:
/// `SHA3-256(account || canonical_string(tag))`.
pub fn account_named_object_id(account: &RoochAddress, tag: &StructTag) -> ObjectId {
    let mut buffer = account.to_vec();
    buffer.extend_from_slice(tag.to_canonical_string().as_bytes());
    ObjectId(sha3_256(&buffer))
}

impl FromStr for ObjectId {
    type Err = TypesError;

    /// Accepts the same hex literals as [`RoochAddress`], including short forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = RoochAddress::from_hex_literal(s)?;
        Ok(Self(*address.as_bytes()))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_literal())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex_literal())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_literal())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_tag::TypeTag;

    fn addr(literal: &str) -> RoochAddress {
        RoochAddress::from_hex_literal(literal).unwrap()
    }

    #[test]
    fn timestamp_object_id() {
        let tag = StructTag::new(addr("0x2"), "timestamp", "Timestamp", vec![]).unwrap();
        assert_eq!(
            struct_tag_to_object_id(&tag).to_string(),
            "0x3a7dfe7a9a5cd608810b5ebd60c7adf7316667b17ad5ae703af301b74310bcca"
        );
    }

    #[test]
    fn coin_store_object_id() {
        let gas = StructTag::new(addr("0x3"), "gas_coin", "RGas", vec![]).unwrap();
        let tag = StructTag::new(
            addr("0x3"),
            "coin_store",
            "CoinStore",
            vec![TypeTag::from(gas)],
        )
        .unwrap();
        assert_eq!(
            struct_tag_to_object_id(&tag).to_string(),
            "0xfdda11f9cc18bb30973779eb3610329d7e0e3c6ecce05b4d77b5a839063bff66"
        );
    }

    #[test]
    fn parsed_tag_gives_same_id() {
        let tag: StructTag = "0x3::coin_store::CoinStore<0x3::gas_coin::RGas>"
            .parse()
            .unwrap();
        assert_eq!(
            struct_tag_to_object_id(&tag).to_string(),
            "0xfdda11f9cc18bb30973779eb3610329d7e0e3c6ecce05b4d77b5a839063bff66"
        );
    }

    #[test]
    fn stable_across_address_shorthand() {
        let short = StructTag::new(addr("0x2"), "timestamp", "Timestamp", vec![]).unwrap();
        let full = StructTag::new(
            addr("0x0000000000000000000000000000000000000000000000000000000000000002"),
            "timestamp",
            "Timestamp",
            vec![],
        )
        .unwrap();
        assert_eq!(struct_tag_to_object_id(&short), struct_tag_to_object_id(&full));
    }

    #[test]
    fn type_param_order_matters() {
        let ab: StructTag = "0x1::m::Pair<u8,u64>".parse().unwrap();
        let ba: StructTag = "0x1::m::Pair<u64,u8>".parse().unwrap();
        assert_ne!(struct_tag_to_object_id(&ab), struct_tag_to_object_id(&ba));
    }

    #[test]
    fn account_named_id_vector() {
        let tag = StructTag::new(addr("0x2"), "timestamp", "Timestamp", vec![]).unwrap();
        let id = account_named_object_id(&addr("0x2"), &tag);
        assert_eq!(
            id.to_string(),
            "0xa6eec18eb129f870b404e4765c87baeeb7572ccf8e456ba261376b77e2ff9fe6"
        );
        assert_ne!(id, struct_tag_to_object_id(&tag));
    }

    #[test]
    fn parse_and_serde() {
        let id: ObjectId = "0x3a7dfe7a9a5cd608810b5ebd60c7adf7316667b17ad5ae703af301b74310bcca"
            .parse()
            .unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!("3a7d".parse::<ObjectId>().is_err());
    }
}
