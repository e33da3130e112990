//! Session-key scopes: which functions a session key may call.
//!
//! A scope is written `address::module::function`; module and function may
//! be `*` to match anything. BCS layout:
//!
//! ```text
//! module_address  32 bytes
//! module_name     uleb128(len) || ascii
//! function_name   uleb128(len) || ascii
//! ```

use std::fmt;
use std::str::FromStr;

use codec_utils::{BcsDecode, BcsEncode, BcsReader, BcsWriter, CodecError};
use rooch_types::identifier::Identifier;
use rooch_types::transaction::FunctionId;
use rooch_types::RoochAddress;

use crate::error::AuthError;
use crate::parsed_address::ParsedAddress;

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionScope {
    pub module_address: RoochAddress,
    module_name: String,
    function_name: String,
}

fn check_part(part: &str, what: &str) -> Result<(), AuthError> {
    if part == WILDCARD || Identifier::is_valid(part) {
        Ok(())
    } else {
        Err(AuthError::Validation(format!("invalid {what} {part:?} in scope")))
    }
}

impl SessionScope {
    pub fn new(
        module_address: RoochAddress,
        module_name: &str,
        function_name: &str,
    ) -> Result<Self, AuthError> {
        check_part(module_name, "module name")?;
        check_part(function_name, "function name")?;
        Ok(Self {
            module_address,
            module_name: module_name.to_string(),
            function_name: function_name.to_string(),
        })
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Whether a call to `function` is allowed by this scope.
    pub fn matches(&self, function: &FunctionId) -> bool {
        self.module_address == function.module_id.address
            && (self.module_name == WILDCARD
                || self.module_name == function.module_id.name.as_str())
            && (self.function_name == WILDCARD
                || self.function_name == function.function_name.as_str())
    }
}

impl FromStr for SessionScope {
    type Err = AuthError;

    /// The address part accepts any [`ParsedAddress`] form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(AuthError::Validation(format!(
                "scope {s:?} must be `address::module::function`"
            )));
        };
        let address = ParsedAddress::parse(address.trim())
            .and_then(|a| a.to_rooch_address())
            .map_err(|e| AuthError::Validation(format!("scope {s:?}: {e}")))?;
        Self::new(address, module.trim(), function.trim())
    }
}

impl fmt::Display for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.module_address.to_hex_literal(),
            self.module_name,
            self.function_name
        )
    }
}

impl BcsEncode for SessionScope {
    fn encode_to(&self, writer: &mut BcsWriter) {
        self.module_address.encode_to(writer);
        writer.write_str(&self.module_name);
        writer.write_str(&self.function_name);
    }
}

impl BcsDecode for SessionScope {
    fn decode_from(reader: &mut BcsReader<'_>) -> Result<Self, CodecError> {
        let module_address = RoochAddress::decode_from(reader)?;
        let module_name = reader.read_string()?;
        let function_name = reader.read_string()?;
        Self::new(module_address, &module_name, &function_name)
            .map_err(|e| CodecError::Encoding(e.to_string()))
    }
}
