use chain_btc::BtcError;
use codec_utils::CodecError;
use rooch_types::TypesError;
use thiserror::Error;

/// Every failure the authentication pipeline can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("scheme mismatch: {0}")]
    SchemeMismatch(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("address mismatch: expected {expected}, got {actual}")]
    AddressMismatch { expected: String, actual: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

impl From<CodecError> for AuthError {
    fn from(e: CodecError) -> Self {
        AuthError::Encoding(e.to_string())
    }
}

impl From<TypesError> for AuthError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::Parse(msg) | TypesError::InvalidIdentifier(msg) => AuthError::Parse(msg),
            TypesError::InvalidAddress(msg) => AuthError::InvalidAddress(msg),
            TypesError::Encoding(e) => e.into(),
        }
    }
}

impl From<BtcError> for AuthError {
    fn from(e: BtcError) -> Self {
        match e {
            BtcError::InvalidPublicKey(msg) => AuthError::InvalidKey(msg),
            BtcError::InvalidAddress(msg) | BtcError::InvalidNetwork(msg) => {
                AuthError::InvalidAddress(msg)
            }
            BtcError::Encoding(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_signature() {
        let err = AuthError::InvalidSignature("bad s".into());
        assert_eq!(err.to_string(), "invalid signature: bad s");
    }

    #[test]
    fn display_scheme_mismatch() {
        let err = AuthError::SchemeMismatch("unknown flag 7".into());
        assert_eq!(err.to_string(), "scheme mismatch: unknown flag 7");
    }

    #[test]
    fn display_address_mismatch() {
        let err = AuthError::AddressMismatch {
            expected: "0x1".into(),
            actual: "0x2".into(),
        };
        assert_eq!(err.to_string(), "address mismatch: expected 0x1, got 0x2");
    }

    #[test]
    fn display_validation() {
        let err = AuthError::Validation("empty module".into());
        assert_eq!(err.to_string(), "validation error: empty module");
    }

    #[test]
    fn codec_error_maps_to_encoding() {
        let err: AuthError = CodecError::Bech32("checksum".into()).into();
        assert!(matches!(err, AuthError::Encoding(_)));
    }

    #[test]
    fn types_errors_keep_their_bucket() {
        let parse: AuthError = TypesError::Parse("x".into()).into();
        assert_eq!(parse, AuthError::Parse("x".into()));
        let addr: AuthError = TypesError::InvalidAddress("y".into()).into();
        assert_eq!(addr, AuthError::InvalidAddress("y".into()));
        let enc: AuthError = TypesError::Encoding(CodecError::TrailingBytes(3)).into();
        assert!(matches!(enc, AuthError::Encoding(_)));
    }

    #[test]
    fn btc_errors_keep_their_bucket() {
        let key: AuthError = BtcError::InvalidPublicKey("off curve".into()).into();
        assert_eq!(key, AuthError::InvalidKey("off curve".into()));
        let net: AuthError = BtcError::InvalidNetwork("liquid".into()).into();
        assert_eq!(net, AuthError::InvalidAddress("liquid".into()));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(AuthError::Signing("test".into()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn debug_format_works() {
        let err = AuthError::InvalidKey("fail".into());
        let debug = format!("{:?}", err);
        assert!(debug.contains("InvalidKey"));
    }
}
