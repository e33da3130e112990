//! BIP-32 derivation path validation for the two key schemes.
//!
//! ```text
//! Ed25519    m / 44' / 784' / account' / change' / index'    (all hardened)
//! Secp256k1  m / 86' / 0'   / account' / change  / index     (BIP-86)
//! ```
//!
//! Only the path shape is checked here; deriving keys is left to the wallet.

use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;
use crate::keys::KeyScheme;

pub const ED25519_PURPOSE: u32 = 44;
pub const ROOCH_COIN_TYPE: u32 = 784;
pub const TAPROOT_PURPOSE: u32 = 86;
pub const BITCOIN_COIN_TYPE: u32 = 0;

/// Indices at or above this value are written with a `'` suffix instead.
pub const HARDENED_OFFSET: u32 = 1 << 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildNumber {
    pub index: u32,
    pub hardened: bool,
}

impl ChildNumber {
    pub fn hardened(index: u32) -> Self {
        Self {
            index,
            hardened: true,
        }
    }

    pub fn normal(index: u32) -> Self {
        Self {
            index,
            hardened: false,
        }
    }
}

impl FromStr for ChildNumber {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix('\'') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthError::Validation(format!("invalid path component {s:?}")));
        }
        let index: u32 = digits
            .parse()
            .map_err(|e| AuthError::Validation(format!("path component {s:?}: {e}")))?;
        if index >= HARDENED_OFFSET {
            return Err(AuthError::Validation(format!(
                "path component {s:?} is out of range"
            )));
        }
        Ok(Self { index, hardened })
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// A parsed `m/...` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    pub fn components(&self) -> &[ChildNumber] {
        &self.0
    }

    /// The default path for `scheme` at `account`.
    pub fn default_for(scheme: KeyScheme, account: u32) -> Self {
        match scheme {
            KeyScheme::Ed25519 => Self(vec![
                ChildNumber::hardened(ED25519_PURPOSE),
                ChildNumber::hardened(ROOCH_COIN_TYPE),
                ChildNumber::hardened(account),
                ChildNumber::hardened(0),
                ChildNumber::hardened(0),
            ]),
            KeyScheme::Secp256k1 => Self(vec![
                ChildNumber::hardened(TAPROOT_PURPOSE),
                ChildNumber::hardened(BITCOIN_COIN_TYPE),
                ChildNumber::hardened(account),
                ChildNumber::normal(0),
                ChildNumber::normal(0),
            ]),
        }
    }
}

impl FromStr for DerivationPath {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("m/")
            .ok_or_else(|| AuthError::Validation(format!("path {s:?} must start with \"m/\"")))?;
        rest.split('/')
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for child in &self.0 {
            write!(f, "/{child}")?;
        }
        Ok(())
    }
}

/// Parse `path` and check it has the shape `scheme` requires.
pub fn validate_derivation_path(
    path: &str,
    scheme: KeyScheme,
) -> Result<DerivationPath, AuthError> {
    let parsed: DerivationPath = path.parse()?;
    let [purpose, coin_type, account, change, index] = parsed.components() else {
        return Err(AuthError::Validation(format!(
            "path {path:?} must have 5 components, got {}",
            parsed.components().len()
        )));
    };

    let ok = match scheme {
        KeyScheme::Ed25519 => {
            *purpose == ChildNumber::hardened(ED25519_PURPOSE)
                && *coin_type == ChildNumber::hardened(ROOCH_COIN_TYPE)
                && account.hardened
                && change.hardened
                && index.hardened
        }
        KeyScheme::Secp256k1 => {
            *purpose == ChildNumber::hardened(TAPROOT_PURPOSE)
                && *coin_type == ChildNumber::hardened(BITCOIN_COIN_TYPE)
                && account.hardened
                && !change.hardened
                && !index.hardened
        }
    };
    if !ok {
        return Err(AuthError::Validation(format!(
            "path {path:?} is not a valid {scheme} path"
        )));
    }
    Ok(parsed)
}

/// True when `path` is valid for `scheme`.
pub fn is_valid_derivation_path(path: &str, scheme: KeyScheme) -> bool {
    validate_derivation_path(path, scheme).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ed25519_paths() {
        assert!(is_valid_derivation_path("m/44'/784'/0'/0'/0'", KeyScheme::Ed25519));
        assert!(is_valid_derivation_path("m/44'/784'/12'/0'/3'", KeyScheme::Ed25519));
    }

    #[test]
    fn accepts_taproot_paths() {
        assert!(is_valid_derivation_path("m/86'/0'/0'/0/0", KeyScheme::Secp256k1));
        assert!(is_valid_derivation_path("m/86'/0'/5'/1/9", KeyScheme::Secp256k1));
    }

    #[test]
    fn rejects_wrong_shapes() {
        for (path, scheme) in [
            ("m/44'/784'/0'/0/0", KeyScheme::Ed25519),
            ("m/44'/60'/0'/0'/0'", KeyScheme::Ed25519),
            ("m/86'/0'/0'/0'/0'", KeyScheme::Secp256k1),
            ("m/84'/0'/0'/0/0", KeyScheme::Secp256k1),
            ("m/86'/0'/0'/0", KeyScheme::Secp256k1),
            ("44'/784'/0'/0'/0'", KeyScheme::Ed25519),
            ("m/44'/784'/x'/0'/0'", KeyScheme::Ed25519),
            ("m/44'/784'/2147483648'/0'/0'", KeyScheme::Ed25519),
            ("m/86'/0'//0/0", KeyScheme::Secp256k1),
        ] {
            let err = validate_derivation_path(path, scheme).unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)), "{path}");
        }
    }

    #[test]
    fn defaults_are_valid_and_print_back() {
        for scheme in [KeyScheme::Ed25519, KeyScheme::Secp256k1] {
            let path = DerivationPath::default_for(scheme, 3);
            let text = path.to_string();
            assert_eq!(validate_derivation_path(&text, scheme).unwrap(), path);
        }
        assert_eq!(
            DerivationPath::default_for(KeyScheme::Secp256k1, 0).to_string(),
            "m/86'/0'/0'/0/0"
        );
        assert_eq!(
            DerivationPath::default_for(KeyScheme::Ed25519, 0).to_string(),
            "m/44'/784'/0'/0'/0'"
        );
    }
}
