use std::fmt;
use std::str::FromStr;

use codec_utils::bcs::{BcsDecode, BcsEncode, BcsReader, BcsWriter};
use codec_utils::CodecError;

use crate::error::TypesError;

/// A Move identifier: a module, struct or function name.
///
/// `[a-zA-Z][a-zA-Z0-9_]*` or `_` followed by at least one of
/// `[a-zA-Z0-9_]`. This excludes `::`, `<`, `>`, `,` and whitespace, so
/// canonical type strings built from identifiers parse back unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Result<Self, TypesError> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(Self(name))
        } else {
            Err(TypesError::InvalidIdentifier(name))
        }
    }

    pub fn is_valid(name: &str) -> bool {
        let bytes = name.as_bytes();
        let valid_tail = |b: &[u8]| b.iter().all(|c| c.is_ascii_alphanumeric() || *c == b'_');
        match bytes.first().copied() {
            Some(c) if c.is_ascii_alphabetic() => valid_tail(&bytes[1..]),
            Some(b'_') => bytes.len() > 1 && valid_tail(&bytes[1..]),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl BcsEncode for Identifier {
    fn encode_to(&self, writer: &mut BcsWriter) {
        writer.write_str(&self.0);
    }
}

impl BcsDecode for Identifier {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        let name = reader.read_string()?;
        Self::new(name).map_err(|e| CodecError::Encoding(e.to_string()))
    }
}
