use anchorfs_index::IndexError;
use anchorfs_ledger::LedgerError;
use anchorfs_store::StoreError;
use anchorfs_transfer::TransferError;
use thiserror::Error;

/// Errors surfaced by the client facade.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
