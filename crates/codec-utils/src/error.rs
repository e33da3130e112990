use thiserror::Error;

/// Byte and string codec errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("bech32 error: {0}")]
    Bech32(String),

    #[error("base58 error: {0}")]
    Base58(String),

    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("trailing bytes after decoding: {0}")]
    TrailingBytes(usize),
}
