use codec_utils::CodecError;
use thiserror::Error;

/// Errors from building, parsing or decoding chain-native types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Encoding(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse() {
        let err = TypesError::Parse("unbalanced `<`".into());
        assert_eq!(err.to_string(), "parse error: unbalanced `<`");
    }

    #[test]
    fn display_invalid_address() {
        let err = TypesError::InvalidAddress("expected 32 bytes, got 20".into());
        assert_eq!(err.to_string(), "invalid address: expected 32 bytes, got 20");
    }

    #[test]
    fn display_invalid_identifier() {
        let err = TypesError::InvalidIdentifier("a::b".into());
        assert_eq!(err.to_string(), "invalid identifier: a::b");
    }

    #[test]
    fn codec_errors_pass_through() {
        let err: TypesError = CodecError::TrailingBytes(2).into();
        assert_eq!(err.to_string(), "trailing bytes after decoding: 2");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(TypesError::Parse("test".into()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn debug_format_works() {
        let err = TypesError::InvalidIdentifier("x".into());
        let debug = format!("{:?}", err);
        assert!(debug.contains("InvalidIdentifier"));
    }
}
