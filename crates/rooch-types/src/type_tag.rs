//! Move type tags and their canonical strings.
//!
//! The canonical string is the preimage of named object ids, so it must be
//! byte-identical to what the chain produces:
//!
//! ```text
//! bool | u8 | u16 | u32 | u64 | u128 | u256 | address | signer
//! vector<T>
//! 0x<64 hex>::module::Name                 no type parameters
//! 0x<64 hex>::module::Name<T1,T2,...>      no spaces after commas
//! ```

use std::fmt;
use std::str::FromStr;

use codec_utils::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use codec_utils::CodecError;

use crate::address::RoochAddress;
use crate::error::TypesError;
use crate::identifier::Identifier;

/// Deepest `vector<...>` / type-parameter nesting accepted by the parser
/// and the decoder.
pub const MAX_TYPE_TAG_NESTING: usize = 8;

/// A Move type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

/// A fully-qualified struct type: `address::module::name<type_params>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructTag {
    pub address: RoochAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_params: Vec<TypeTag>,
}

// ---------------------------------------------------------------------------
// Construction and canonical strings
// ---------------------------------------------------------------------------

impl TypeTag {
    pub fn vector(element: TypeTag) -> Self {
        TypeTag::Vector(Box::new(element))
    }

    fn primitive_token(&self) -> Option<&'static str> {
        Some(match self {
            TypeTag::Bool => "bool",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::U128 => "u128",
            TypeTag::U256 => "u256",
            TypeTag::Address => "address",
            TypeTag::Signer => "signer",
            TypeTag::Vector(_) | TypeTag::Struct(_) => return None,
        })
    }

    fn from_primitive_token(token: &str) -> Option<Self> {
        Some(match token {
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "u16" => TypeTag::U16,
            "u32" => TypeTag::U32,
            "u64" => TypeTag::U64,
            "u128" => TypeTag::U128,
            "u256" => TypeTag::U256,
            "address" => TypeTag::Address,
            "signer" => TypeTag::Signer,
            _ => return None,
        })
    }

    pub fn to_canonical_string(&self) -> String {
        match self {
            TypeTag::Vector(element) => format!("vector<{}>", element.to_canonical_string()),
            TypeTag::Struct(tag) => tag.to_canonical_string(),
            primitive => primitive.primitive_token().unwrap_or_default().to_string(),
        }
    }
}

impl StructTag {
    /// Build a struct tag, validating `module` and `name` as identifiers.
    pub fn new(
        address: RoochAddress,
        module: &str,
        name: &str,
        type_params: Vec<TypeTag>,
    ) -> Result<Self, TypesError> {
        Ok(Self {
            address,
            module: Identifier::new(module)?,
            name: Identifier::new(name)?,
            type_params,
        })
    }

    /// Canonical form with the address expanded to 64 hex digits.
    pub fn to_canonical_string(&self) -> String {
        let mut out = format!(
            "{}::{}::{}",
            self.address.to_hex_literal(),
            self.module,
            self.name
        );
        if !self.type_params.is_empty() {
            let params: Vec<String> = self
                .type_params
                .iter()
                .map(TypeTag::to_canonical_string)
                .collect();
            out.push('<');
            out.push_str(&params.join(","));
            out.push('>');
        }
        out
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a type tag string. Addresses may be shortened (`0x2`) or bech32;
/// whitespace around type parameters is ignored.
pub fn parse_type_tag(s: &str) -> Result<TypeTag, TypesError> {
    parse_nested(s, 0)
}

/// Parse a struct tag string such as `0x3::coin_store::CoinStore<0x3::gas_coin::RGas>`.
pub fn parse_struct_tag(s: &str) -> Result<StructTag, TypesError> {
    parse_struct(s.trim(), 0)
}

/// Split a type-parameter list on top-level commas.
///
/// Commas inside nested `<...>` do not split, so
/// `u8,vector<u64>,0xa::m::n<u8>` yields three entries. Each entry is
/// trimmed; empty entries and unbalanced brackets are errors.
pub fn split_generic_parameters(s: &str) -> Result<Vec<String>, TypesError> {
    let mut params = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| TypesError::Parse(format!("{s:?}: unbalanced `>`")))?;
            }
            ',' if depth == 0 => {
                params.push(s[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TypesError::Parse(format!("{s:?}: unbalanced `<`")));
    }
    params.push(s[start..].trim().to_string());

    if params.iter().any(|p| p.is_empty()) {
        return Err(TypesError::Parse(format!("{s:?}: empty type parameter")));
    }
    Ok(params)
}

fn parse_nested(s: &str, depth: usize) -> Result<TypeTag, TypesError> {
    if depth > MAX_TYPE_TAG_NESTING {
        return Err(TypesError::Parse(format!(
            "{s:?}: nested deeper than {MAX_TYPE_TAG_NESTING}"
        )));
    }

    let s = s.trim();
    if let Some(primitive) = TypeTag::from_primitive_token(s) {
        return Ok(primitive);
    }

    if s.starts_with("vector<") {
        let open = "vector".len();
        let close = matching_close(s, open)?;
        if close != s.len() - 1 {
            return Err(TypesError::Parse(format!(
                "{s:?}: unexpected characters after `>`"
            )));
        }
        let element = parse_nested(&s[open + 1..close], depth + 1)?;
        return Ok(TypeTag::vector(element));
    }

    Ok(TypeTag::Struct(Box::new(parse_struct(s, depth)?)))
}

fn parse_struct(s: &str, depth: usize) -> Result<StructTag, TypesError> {
    let (head, type_params) = match s.find('<') {
        Some(open) => {
            let close = matching_close(s, open)?;
            if close != s.len() - 1 {
                return Err(TypesError::Parse(format!(
                    "{s:?}: unexpected characters after `>`"
                )));
            }
            let params = split_generic_parameters(&s[open + 1..close])?
                .iter()
                .map(|p| parse_nested(p, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            (&s[..open], params)
        }
        None => {
            if s.contains('>') {
                return Err(TypesError::Parse(format!("{s:?}: unbalanced `>`")));
            }
            (s, Vec::new())
        }
    };

    let mut parts = head.split("::");
    let (Some(address), Some(module), Some(name), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TypesError::Parse(format!(
            "{s:?}: expected `address::module::name`"
        )));
    };

    let address = RoochAddress::from_str(address.trim())
        .map_err(|e| TypesError::Parse(format!("{s:?}: {e}")))?;
    StructTag::new(address, module.trim(), name.trim(), type_params)
        .map_err(|e| TypesError::Parse(format!("{s:?}: {e}")))
}

/// Index of the `>` closing the `<` at byte offset `open`.
fn matching_close(s: &str, open: usize) -> Result<usize, TypesError> {
    let mut depth: usize = 0;
    for (i, b) in s.bytes().enumerate().skip(open) {
        match b {
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(TypesError::Parse(format!("{s:?}: unbalanced `<`")))
}

impl FromStr for TypeTag {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_tag(s)
    }
}

impl FromStr for StructTag {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_struct_tag(s)
    }
}

// ---------------------------------------------------------------------------
// BCS
// ---------------------------------------------------------------------------
//
// Variant indices follow the Move enum order, with the later integer widths
// appended at the end:
//
//   Bool 0 | U8 1 | U64 2 | U128 3 | Address 4 | Signer 5 | Vector 6
//   Struct 7 | U16 8 | U32 9 | U256 10

impl BcsEncode for TypeTag {
    fn encode_to(&self, writer: &mut BcsWriter) {
        match self {
            TypeTag::Bool => writer.write_variant(0),
            TypeTag::U8 => writer.write_variant(1),
            TypeTag::U64 => writer.write_variant(2),
            TypeTag::U128 => writer.write_variant(3),
            TypeTag::Address => writer.write_variant(4),
            TypeTag::Signer => writer.write_variant(5),
            TypeTag::Vector(element) => {
                writer.write_variant(6);
                element.encode_to(writer);
            }
            TypeTag::Struct(tag) => {
                writer.write_variant(7);
                tag.encode_to(writer);
            }
            TypeTag::U16 => writer.write_variant(8),
            TypeTag::U32 => writer.write_variant(9),
            TypeTag::U256 => writer.write_variant(10),
        }
    }
}

impl BcsEncode for StructTag {
    fn encode_to(&self, writer: &mut BcsWriter) {
        self.address.encode_to(writer);
        self.module.encode_to(writer);
        self.name.encode_to(writer);
        writer.write_seq(&self.type_params);
    }
}

impl BcsDecode for TypeTag {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        decode_type_tag(reader, 0)
    }
}

impl BcsDecode for StructTag {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        decode_struct_tag(reader, 0)
    }
}

fn decode_type_tag(reader: &mut BcsReader<'_>, depth: usize) -> Result<TypeTag, CodecError> {
    if depth > MAX_TYPE_TAG_NESTING {
        return Err(CodecError::Encoding(format!(
            "type tag nested deeper than {MAX_TYPE_TAG_NESTING}"
        )));
    }
    Ok(match reader.read_variant()? {
        0 => TypeTag::Bool,
        1 => TypeTag::U8,
        2 => TypeTag::U64,
        3 => TypeTag::U128,
        4 => TypeTag::Address,
        5 => TypeTag::Signer,
        6 => TypeTag::vector(decode_type_tag(reader, depth + 1)?),
        7 => TypeTag::Struct(Box::new(decode_struct_tag(reader, depth)?)),
        8 => TypeTag::U16,
        9 => TypeTag::U32,
        10 => TypeTag::U256,
        other => {
            return Err(CodecError::Encoding(format!(
                "unknown type tag variant {other}"
            )))
        }
    })
}

fn decode_struct_tag(reader: &mut BcsReader<'_>, depth: usize) -> Result<StructTag, CodecError> {
    let address = RoochAddress::decode_from(reader)?;
    let module = Identifier::decode_from(reader)?;
    let name = Identifier::decode_from(reader)?;

    let len = reader.read_length()?;
    let mut type_params = Vec::with_capacity(len.min(reader.remaining()));
    for _ in 0..len {
        type_params.push(decode_type_tag(reader, depth + 1)?);
    }

    Ok(StructTag {
        address,
        module,
        name,
        type_params,
    })
}
