use anchorfs_crypto::CryptoError;
use anchorfs_store::StoreError;
use thiserror::Error;

/// What sank an individual file inside an upload batch.
#[derive(Debug, Error)]
pub enum UploadCause {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Errors surfaced by the transfer orchestrator.
#[derive(Debug, Error)]
pub enum TransferError {
    /// One file failed; the whole batch is aborted and no descriptors are
    /// exposed for the files that had already gone up.
    #[error("upload of {name} failed")]
    UploadFailed {
        name: String,
        #[source]
        source: UploadCause,
    },

    /// Opening a fetched payload failed. Unlike a fetch failure this is
    /// not skipped: a wrong key or tampered ciphertext must surface.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

pub type Result<T> = std::result::Result<T, TransferError>;
