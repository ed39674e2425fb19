//! Content Store Adapter
//!
//! Uploads, resolves, and deletes opaque content units for AnchorFS.
//! A unit is one or more named blobs stored together under a single
//! store-assigned identifier. The store is treated as reliable-but-
//! fallible network I/O; nothing here retries.

pub mod errors;
pub mod http;
pub mod memory;
pub mod observer;

pub use errors::StoreError;
pub use http::{HttpContentStore, StoreConfig};
pub use memory::MemoryContentStore;
pub use observer::{NoopPutObserver, PutObserver};

use anchorfs_types::{ContentId, FileBlob};
use async_trait::async_trait;

/// Put/get/delete of opaque content units.
///
/// `put` uploads the given blobs as one unit and returns the unit's
/// identifier. `get` resolves an identifier back to its blobs;
/// [`StoreError::NotFound`] distinguishes missing content from transport
/// failure. `delete` is best-effort — callers decide whether its failure
/// matters.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn put(
        &self,
        blobs: &[FileBlob],
        observer: &dyn PutObserver,
    ) -> Result<ContentId, StoreError>;

    async fn get(&self, id: &ContentId) -> Result<Vec<FileBlob>, StoreError>;

    async fn delete(&self, id: &ContentId) -> Result<(), StoreError>;
}
