//! AnchorFS Client
//!
//! Facade over the AnchorFS stack: keeps, per owner, a versioned index
//! of individually-encrypted files in a content-addressed store, with
//! the latest index location anchored in an external pointer ledger.
//!
//! Writing is a single logical flow: each file is sealed and uploaded in
//! order, the fresh descriptors are prepend-merged into the owner's
//! existing index, the merged index is uploaded as an immutable blob,
//! its identifier is committed to the ledger pointer, and the superseded
//! index blob is retired best-effort. Reading reverses it: resolve the
//! pointer, fetch and parse the index, fetch and open each file.
//!
//! A single client may serve many owners concurrently; two concurrent
//! writes for the *same* owner race on the pointer and can lose an
//! update, so callers serialize same-owner writes externally.

pub mod config;
pub mod error;

pub use config::ClientConfig;
pub use error::ClientError;

// The vocabulary a client embedder needs, re-exported from the stack.
pub use anchorfs_crypto::{generate_key, FileCipher, SealedBoxCipher};
pub use anchorfs_index::{IndexError, RootLookup};
pub use anchorfs_ledger::{HttpPointerLedger, LedgerConfig, MemoryPointerLedger, PointerLedger};
pub use anchorfs_store::{ContentStore, HttpContentStore, MemoryContentStore, StoreConfig};
pub use anchorfs_transfer::{NoopProgress, TransferError, TransferProgress};
pub use anchorfs_types::{ContentId, FileBlob, FileDescriptor, OwnerId, RootIndex};

use anchorfs_index::RootIndexManager;
use anchorfs_store::NoopPutObserver;
use anchorfs_transfer::TransferOrchestrator;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of one `store_files` call.
#[derive(Debug, Clone)]
pub struct StoredBatch {
    /// Identifier of the newly committed root index blob.
    pub new_root: ContentId,
    /// Descriptors of the uploaded files, in input order.
    pub descriptors: Vec<FileDescriptor>,
}

/// One AnchorFS instance: a content store, a pointer ledger, and a file
/// cipher wired together.
///
/// Holds no per-owner state between calls; all durable state lives in
/// the two external services.
#[derive(Clone)]
pub struct AnchorFsClient {
    index: RootIndexManager,
    transfer: TransferOrchestrator,
}

impl AnchorFsClient {
    /// Build a client against HTTP gateways, per the given config.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let store: Arc<dyn ContentStore> = Arc::new(HttpContentStore::new(config.store)?);
        let ledger: Arc<dyn PointerLedger> = Arc::new(HttpPointerLedger::new(config.ledger)?);
        Ok(Self::with_adapters(
            store,
            ledger,
            Arc::new(SealedBoxCipher::new()),
        ))
    }

    /// Build a client from explicit adapter instances. This is the seam
    /// tests use to plug in the in-memory fakes.
    pub fn with_adapters(
        store: Arc<dyn ContentStore>,
        ledger: Arc<dyn PointerLedger>,
        cipher: Arc<dyn FileCipher>,
    ) -> Self {
        Self {
            index: RootIndexManager::new(store.clone(), ledger),
            transfer: TransferOrchestrator::new(store, cipher),
        }
    }

    /// Upload a batch of files for `owner` and commit the merged index.
    ///
    /// Files are processed strictly in input order; any single upload
    /// failure aborts the whole batch before the index is touched. After
    /// a confirmed commit the superseded root blob is deleted
    /// best-effort. Returns the new root identifier and the descriptors
    /// of the uploaded files.
    pub async fn store_files(
        &self,
        owner: &OwnerId,
        files: &[FileBlob],
        encrypt_key: Option<&str>,
        progress: &dyn TransferProgress,
    ) -> Result<StoredBatch, ClientError> {
        let (old_root, existing) = match self.index.resolve(owner).await? {
            RootLookup::Current { pointer, index } => (Some(pointer), index),
            RootLookup::Empty => (None, RootIndex::empty()),
            RootLookup::Unreachable { pointer } => {
                // Merge into an empty index but keep the unreachable blob:
                // it may only be transiently unavailable, and deleting it
                // on a degraded read would destroy history.
                warn!(%owner, %pointer, "existing root unreachable; starting from an empty index");
                (None, RootIndex::empty())
            }
        };
        debug!(%owner, files = files.len(), existing = existing.len(), "storing file batch");

        let descriptors = self
            .transfer
            .upload_all(files, encrypt_key, progress)
            .await?;

        let new_root = self
            .index
            .merge_and_commit(
                owner,
                descriptors.clone(),
                existing,
                old_root.as_ref(),
                &NoopPutObserver,
            )
            .await?;

        Ok(StoredBatch {
            new_root,
            descriptors,
        })
    }

    /// Resolve the owner's current root index.
    pub async fn load_index(&self, owner: &OwnerId) -> Result<RootLookup, ClientError> {
        Ok(self.index.resolve(owner).await?)
    }

    /// Fetch and open every file in the owner's current index.
    ///
    /// Unfetchable items are skipped; with a key, each fetched payload is
    /// opened and carries its own embedded name.
    pub async fn fetch_files(
        &self,
        owner: &OwnerId,
        decrypt_key: Option<&str>,
        progress: &dyn TransferProgress,
    ) -> Result<Vec<FileBlob>, ClientError> {
        let index = self.index.resolve(owner).await?.into_index();
        Ok(self
            .transfer
            .download_all(index.entries(), decrypt_key, progress)
            .await?)
    }
}
