//! In-memory content store for tests and local mode.

use crate::errors::StoreError;
use crate::observer::PutObserver;
use crate::ContentStore;
use anchorfs_types::{ContentId, FileBlob};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// In-memory [`ContentStore`] with deterministic failure injection.
///
/// Unit identifiers are derived from an upload sequence number plus the
/// blob bytes, so repeated uploads of identical content get distinct ids,
/// matching the opacity contract of a real store.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    units: HashMap<ContentId, Vec<FileBlob>>,
    seq: u64,
    poisoned_gets: HashSet<ContentId>,
    failing_puts: u32,
    fail_deletes: bool,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `get` of `id` fail with a transport-style error.
    pub fn poison_get(&self, id: &ContentId) {
        self.inner.write().poisoned_gets.insert(id.clone());
    }

    /// Make the next `n` calls to `put` fail.
    pub fn fail_next_puts(&self, n: u32) {
        self.inner.write().failing_puts = n;
    }

    /// Toggle failure of every `delete`.
    pub fn fail_deletes(&self, fail: bool) {
        self.inner.write().fail_deletes = fail;
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.inner.read().units.contains_key(id)
    }

    /// Number of stored units.
    pub fn len(&self) -> usize {
        self.inner.read().units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().units.is_empty()
    }

    fn assign_id(seq: u64, blobs: &[FileBlob]) -> ContentId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&seq.to_le_bytes());
        for blob in blobs {
            hasher.update(blob.name.as_bytes());
            hasher.update(&blob.content);
        }
        ContentId::new(hasher.finalize().to_hex().to_string())
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn put(
        &self,
        blobs: &[FileBlob],
        observer: &dyn PutObserver,
    ) -> Result<ContentId, StoreError> {
        let id = {
            let mut inner = self.inner.write();
            if inner.failing_puts > 0 {
                inner.failing_puts -= 1;
                return Err(StoreError::Unavailable("injected put failure".into()));
            }
            inner.seq += 1;
            let id = Self::assign_id(inner.seq, blobs);
            inner.units.insert(id.clone(), blobs.to_vec());
            id
        };

        observer.unit_id_ready(&id);
        for blob in blobs {
            observer.stored_chunk(blob.len() as u64);
        }
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> Result<Vec<FileBlob>, StoreError> {
        let inner = self.inner.read();
        if inner.poisoned_gets.contains(id) {
            return Err(StoreError::Unavailable("injected get failure".into()));
        }
        inner
            .units
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn delete(&self, id: &ContentId) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.fail_deletes {
            return Err(StoreError::Unavailable("injected delete failure".into()));
        }
        // Deleting an unknown unit is a no-op, matching fire-and-forget
        // delete semantics.
        inner.units.remove(id);
        Ok(())
    }
}
