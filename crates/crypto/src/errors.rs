use thiserror::Error;

/// Errors produced while sealing or opening file payloads.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("sealed payload is malformed: {0}")]
    Malformed(&'static str),

    #[error("encryption failed")]
    SealFailed,

    #[error("decryption failed (wrong key or tampered ciphertext)")]
    OpenFailed,

    #[error("payload framing error: {0}")]
    Frame(#[from] bincode::Error),

    #[error("key derivation failed")]
    KeyDerivation,
}

pub type Result<T> = std::result::Result<T, CryptoError>;
