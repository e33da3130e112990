//! The transaction payload, its canonical encoding and its hash.
//!
//! ```text
//! RoochTransactionData:
//!   sender            [u8; 32]
//!   sequence_number   u64
//!   chain_id          u64
//!   max_gas_amount    u64
//!   action            MoveAction
//!
//! MoveAction (enum):
//!   0 Script        { code: vector<u8>, ty_args: vector<TypeTag>, args: vector<vector<u8>> }
//!   1 Function      { function_id, ty_args: vector<TypeTag>, args: vector<vector<u8>> }
//!   2 ModuleBundle  vector<vector<u8>>
//!
//! FunctionId:
//!   module_id         { address: [u8; 32], name: string }
//!   function_name     string
//! ```
//!
//! The transaction hash is SHA3-256 over exactly these bytes.

use std::fmt;
use std::str::FromStr;

use codec_utils::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use codec_utils::hash::sha3_256;
use codec_utils::CodecError;

use crate::address::RoochAddress;
use crate::chain_id::BuiltinChainId;
use crate::error::TypesError;
use crate::identifier::Identifier;
use crate::type_tag::TypeTag;

/// Gas budget used when the builder is not given one.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 50_000_000;

// ---------------------------------------------------------------------------
// Hash
// ---------------------------------------------------------------------------

/// A 32-byte SHA3-256 transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypesError> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| {
            TypesError::Parse(format!("tx hash must be 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 64 lowercase hex digits, no prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash(0x{})", self.to_hex())
    }
}

impl AsRef<[u8]> for TxHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// SHA3-256 of `bytes`.
pub fn hash(bytes: &[u8]) -> TxHash {
    TxHash(sha3_256(bytes))
}

// ---------------------------------------------------------------------------
// Call targets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    pub address: RoochAddress,
    pub name: Identifier,
}

impl ModuleId {
    pub fn new(address: RoochAddress, name: &str) -> Result<Self, TypesError> {
        Ok(Self {
            address,
            name: Identifier::new(name)?,
        })
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address.to_hex_literal(), self.name)
    }
}

/// `address::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionId {
    pub module_id: ModuleId,
    pub function_name: Identifier,
}

impl FunctionId {
    pub fn new(module_id: ModuleId, function_name: &str) -> Result<Self, TypesError> {
        Ok(Self {
            module_id,
            function_name: Identifier::new(function_name)?,
        })
    }
}

impl FromStr for FunctionId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(TypesError::Parse(format!(
                "{s:?}: expected `address::module::function`"
            )));
        };
        let address = RoochAddress::from_str(address.trim())?;
        FunctionId::new(ModuleId::new(address, module.trim())?, function.trim())
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module_id, self.function_name)
    }
}

/// An entry function call with pre-encoded BCS arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub function_id: FunctionId,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

/// A compiled script with pre-encoded BCS arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCall {
    pub code: Vec<u8>,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveAction {
    Script(ScriptCall),
    Function(FunctionCall),
    ModuleBundle(Vec<Vec<u8>>),
}

impl MoveAction {
    pub fn new_function_call(
        function_id: FunctionId,
        ty_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        MoveAction::Function(FunctionCall {
            function_id,
            ty_args,
            args,
        })
    }

    pub fn new_script_call(code: Vec<u8>, ty_args: Vec<TypeTag>, args: Vec<Vec<u8>>) -> Self {
        MoveAction::Script(ScriptCall { code, ty_args, args })
    }

    pub fn new_module_bundle(modules: Vec<Vec<u8>>) -> Self {
        MoveAction::ModuleBundle(modules)
    }
}

// ---------------------------------------------------------------------------
// Transaction data
// ---------------------------------------------------------------------------

/// An unsigned transaction. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoochTransactionData {
    sender: RoochAddress,
    sequence_number: u64,
    chain_id: u64,
    max_gas_amount: u64,
    action: MoveAction,
}

impl RoochTransactionData {
    pub fn new(
        sender: RoochAddress,
        sequence_number: u64,
        chain_id: u64,
        max_gas_amount: u64,
        action: MoveAction,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            chain_id,
            max_gas_amount,
            action,
        }
    }

    /// Start a builder with sequence number 0, the local chain id and the
    /// default gas budget.
    pub fn builder(sender: RoochAddress, action: MoveAction) -> TransactionBuilder {
        TransactionBuilder {
            data: Self::new(
                sender,
                0,
                BuiltinChainId::default().chain_id(),
                DEFAULT_MAX_GAS_AMOUNT,
                action,
            ),
        }
    }

    pub fn sender(&self) -> RoochAddress {
        self.sender
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn max_gas_amount(&self) -> u64 {
        self.max_gas_amount
    }

    pub fn action(&self) -> &MoveAction {
        &self.action
    }

    /// Canonical BCS bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.to_bcs_bytes()
    }

    /// SHA3-256 of [`encode`](Self::encode).
    pub fn tx_hash(&self) -> TxHash {
        hash(&self.encode())
    }
}

/// Single-owner builder; [`build`](TransactionBuilder::build) freezes the data.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    data: RoochTransactionData,
}

impl TransactionBuilder {
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.data.sequence_number = sequence_number;
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.data.chain_id = chain_id;
        self
    }

    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.data.max_gas_amount = max_gas_amount;
        self
    }

    pub fn action(mut self, action: MoveAction) -> Self {
        self.data.action = action;
        self
    }

    pub fn build(self) -> RoochTransactionData {
        self.data
    }
}

/// Canonical BCS bytes of `data`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(data), fields(sender = %data.sender(), seq = data.sequence_number()))
)]
pub fn encode_transaction(data: &RoochTransactionData) -> Vec<u8> {
    data.encode()
}

// ---------------------------------------------------------------------------
// BCS
// ---------------------------------------------------------------------------

impl BcsEncode for ModuleId {
    fn encode_to(&self, writer: &mut BcsWriter) {
        self.address.encode_to(writer);
        self.name.encode_to(writer);
    }
}

impl BcsDecode for ModuleId {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            address: RoochAddress::decode_from(reader)?,
            name: Identifier::decode_from(reader)?,
        })
    }
}

impl BcsEncode for FunctionId {
    fn encode_to(&self, writer: &mut BcsWriter) {
        self.module_id.encode_to(writer);
        self.function_name.encode_to(writer);
    }
}

impl BcsDecode for FunctionId {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            module_id: ModuleId::decode_from(reader)?,
            function_name: Identifier::decode_from(reader)?,
        })
    }
}

impl BcsEncode for MoveAction {
    fn encode_to(&self, writer: &mut BcsWriter) {
        match self {
            MoveAction::Script(call) => {
                writer.write_variant(0);
                writer.write_bytes(&call.code);
                writer.write_seq(&call.ty_args);
                writer.write_seq(&call.args);
            }
            MoveAction::Function(call) => {
                writer.write_variant(1);
                call.function_id.encode_to(writer);
                writer.write_seq(&call.ty_args);
                writer.write_seq(&call.args);
            }
            MoveAction::ModuleBundle(modules) => {
                writer.write_variant(2);
                writer.write_seq(modules);
            }
        }
    }
}

impl BcsDecode for MoveAction {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        match reader.read_variant()? {
            0 => Ok(MoveAction::Script(ScriptCall {
                code: reader.read_bytes()?,
                ty_args: reader.read_seq()?,
                args: reader.read_seq()?,
            })),
            1 => Ok(MoveAction::Function(FunctionCall {
                function_id: FunctionId::decode_from(reader)?,
                ty_args: reader.read_seq()?,
                args: reader.read_seq()?,
            })),
            2 => Ok(MoveAction::ModuleBundle(reader.read_seq()?)),
            other => Err(CodecError::Encoding(format!("unknown move action variant {other}"))),
        }
    }
}

impl BcsEncode for RoochTransactionData {
    fn encode_to(&self, writer: &mut BcsWriter) {
        self.sender.encode_to(writer);
        writer.write_u64(self.sequence_number);
        writer.write_u64(self.chain_id);
        writer.write_u64(self.max_gas_amount);
        self.action.encode_to(writer);
    }
}

impl BcsDecode for RoochTransactionData {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            sender: RoochAddress::decode_from(reader)?,
            sequence_number: reader.read_u64()?,
            chain_id: reader.read_u64()?,
            max_gas_amount: reader.read_u64()?,
            action: MoveAction::decode_from(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_tag::StructTag;

    fn addr(literal: &str) -> RoochAddress {
        RoochAddress::from_hex_literal(literal).unwrap()
    }

    fn empty_call() -> MoveAction {
        MoveAction::new_function_call("0x3::empty::empty".parse().unwrap(), vec![], vec![])
    }

    #[test]
    fn builder_defaults() {
        let tx = RoochTransactionData::builder(addr("0x42"), empty_call()).build();
        assert_eq!(tx.sequence_number(), 0);
        assert_eq!(tx.chain_id(), 4);
        assert_eq!(tx.max_gas_amount(), DEFAULT_MAX_GAS_AMOUNT);
        assert_eq!(tx.max_gas_amount(), 50_000_000);
    }

    #[test]
    fn empty_call_encoding_vector() {
        let tx = RoochTransactionData::builder(addr("0x42"), empty_call())
            .sequence_number(7)
            .chain_id(4)
            .build();
        assert_eq!(
            hex::encode(encode_transaction(&tx)),
            "0000000000000000000000000000000000000000000000000000000000000042\
             0700000000000000\
             0400000000000000\
             80f0fa0200000000\
             01\
             0000000000000000000000000000000000000000000000000000000000000003\
             05656d707479\
             05656d707479\
             00\
             00"
        );
        assert_eq!(
            tx.tx_hash().to_hex(),
            "bce52d4843eed9d47e4961b994fe64975dd01bee3886c682b7e12493248a676a"
        );
    }

    #[test]
    fn transfer_call_hash_vector() {
        let gas = StructTag::new(addr("0x3"), "gas_coin", "RGas", vec![]).unwrap();
        let mut amount = [0u8; 32];
        amount[0] = 100;
        let action = MoveAction::new_function_call(
            "0x3::transfer::transfer_coin".parse().unwrap(),
            vec![gas.into()],
            vec![addr("0x42").to_vec(), amount.to_vec()],
        );
        let tx = RoochTransactionData::builder(addr("0x42"), action)
            .sequence_number(7)
            .build();
        assert_eq!(tx.encode().len(), 228);
        assert_eq!(
            tx.tx_hash().to_hex(),
            "7112f58c1cf0e460f48d582e0b449b0694b09f6f94ebbcf465f4f950bb5af4cd"
        );
    }

    #[test]
    fn hash_is_sha3_of_encoding() {
        let tx = RoochTransactionData::builder(addr("0x1"), empty_call()).build();
        assert_eq!(tx.tx_hash(), hash(&tx.encode()));
        assert_eq!(*tx.tx_hash().as_bytes(), sha3_256(&tx.encode()));
    }

    #[test]
    fn every_field_changes_the_hash() {
        let base = RoochTransactionData::builder(addr("0x1"), empty_call()).build();
        let variants = [
            RoochTransactionData::builder(addr("0x2"), empty_call()).build(),
            RoochTransactionData::builder(addr("0x1"), empty_call()).sequence_number(1).build(),
            RoochTransactionData::builder(addr("0x1"), empty_call()).chain_id(1).build(),
            RoochTransactionData::builder(addr("0x1"), empty_call()).max_gas_amount(1).build(),
            RoochTransactionData::builder(addr("0x1"), MoveAction::new_module_bundle(vec![]))
                .build(),
        ];
        for other in variants {
            assert_ne!(other.tx_hash(), base.tx_hash());
        }
    }

    #[test]
    fn action_variants_decode() {
        let actions = [
            MoveAction::new_script_call(vec![0xa1, 0x1c], vec![TypeTag::U8], vec![vec![1]]),
            empty_call(),
            MoveAction::new_module_bundle(vec![vec![1, 2, 3], vec![]]),
        ];
        for (index, action) in actions.into_iter().enumerate() {
            let bytes = action.to_bcs_bytes();
            assert_eq!(bytes[0] as usize, index);
            assert_eq!(MoveAction::from_bcs_bytes(&bytes).unwrap(), action);
        }
        assert!(MoveAction::from_bcs_bytes(&[3]).is_err());
    }

    #[test]
    fn transaction_decodes_from_its_encoding() {
        let tx = RoochTransactionData::builder(addr("0x42"), empty_call())
            .sequence_number(9)
            .chain_id(BuiltinChainId::Main.chain_id())
            .build();
        assert_eq!(RoochTransactionData::from_bcs_bytes(&tx.encode()).unwrap(), tx);
    }

    #[test]
    fn function_id_parse_and_display() {
        let id: FunctionId = "0x3::empty::empty".parse().unwrap();
        assert_eq!(
            id.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000003::empty::empty"
        );
        assert!("0x3::empty".parse::<FunctionId>().is_err());
        assert!("0x3::empty::em-pty".parse::<FunctionId>().is_err());
        assert!("0x3::a::b::c".parse::<FunctionId>().is_err());
    }

    #[test]
    fn tx_hash_formats() {
        let h = TxHash::new([0xab; 32]);
        assert_eq!(h.to_hex(), "ab".repeat(32));
        assert_eq!(h.to_string(), format!("0x{}", "ab".repeat(32)));
        assert!(TxHash::from_slice(&[0u8; 31]).is_err());
        assert_eq!(TxHash::from_slice(&[0xab; 32]).unwrap(), h);
    }
}
