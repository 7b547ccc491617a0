use thiserror::Error;

/// Errors returned by the sharing core.
///
/// `Decryption` deliberately carries no detail: a wrong key, a flipped
/// ciphertext byte and a corrupted nonce all look the same to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharingError {
    #[error("invalid share configuration: {0}")]
    Config(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("not enough shares to reconstruct secret (need {needed}, got {got})")]
    InsufficientShares { needed: usize, got: usize },
    #[error("conflicting shares for index {0}")]
    DuplicateIndex(u32),
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed")]
    Decryption,
    #[error("malformed share: {0}")]
    MalformedShare(String),
}

pub type Result<T> = std::result::Result<T, SharingError>;
