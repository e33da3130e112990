use codec_utils::CodecError;
use rooch_types::TypesError;
use thiserror::Error;

/// Bitcoin and Nostr address errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BtcError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error(transparent)]
    Encoding(#[from] CodecError),
}

impl From<TypesError> for BtcError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::Encoding(e) => BtcError::Encoding(e),
            other => BtcError::InvalidAddress(other.to_string()),
        }
    }
}
