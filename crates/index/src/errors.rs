use anchorfs_ledger::LedgerError;
use anchorfs_store::StoreError;
use anchorfs_types::{ContentId, OwnerId, RootCodecError};
use thiserror::Error;

/// Errors surfaced by the root index manager.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The pointer-update transaction did not reach finality. The freshly
    /// uploaded root blob stays behind in the content store; the previous
    /// pointer and index are untouched.
    #[error("pointer commit failed for {owner}; root {orphaned_root} left orphaned")]
    CommitFailed {
        owner: OwnerId,
        orphaned_root: ContentId,
        #[source]
        source: Option<LedgerError>,
    },

    /// The committed root blob exists but cannot be parsed. Unlike a
    /// missing blob this is index corruption, and it is always fatal.
    #[error("root index for {owner} at {pointer} is corrupt")]
    CorruptIndex {
        owner: OwnerId,
        pointer: ContentId,
        #[source]
        source: RootCodecError,
    },

    #[error(transparent)]
    Codec(#[from] RootCodecError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type Result<T> = std::result::Result<T, IndexError>;
