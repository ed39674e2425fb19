use crate::errors::{IndexError, Result};
use anchorfs_ledger::PointerLedger;
use anchorfs_store::{ContentStore, PutObserver};
use anchorfs_types::{ContentId, FileBlob, FileDescriptor, OwnerId, RootIndex};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of resolving an owner's root index.
///
/// `Empty` (pointer never written) and `Unreachable` (pointer written but
/// the blob cannot currently be fetched) are deliberately distinct: the
/// first is the normal state of a new owner, the second is a degraded
/// read that a caller may want to retry or alert on. Callers that accept
/// the lenient collapse of both into an empty index use
/// [`RootLookup::into_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootLookup {
    /// The owner has never committed an index.
    Empty,
    /// A pointer exists but the blob it names could not be fetched.
    Unreachable { pointer: ContentId },
    /// The committed index, as of the pointer's current value.
    Current {
        pointer: ContentId,
        index: RootIndex,
    },
}

impl RootLookup {
    /// The pointer value, when one exists.
    pub fn pointer(&self) -> Option<&ContentId> {
        match self {
            RootLookup::Empty => None,
            RootLookup::Unreachable { pointer } => Some(pointer),
            RootLookup::Current { pointer, .. } => Some(pointer),
        }
    }

    /// Collapse to a plain index: `Empty` and `Unreachable` become an
    /// index with no entries.
    pub fn into_index(self) -> RootIndex {
        match self {
            RootLookup::Current { index, .. } => index,
            RootLookup::Empty | RootLookup::Unreachable { .. } => RootIndex::empty(),
        }
    }
}

/// Merges, commits, resolves, and retires per-owner root indexes.
///
/// One instance owns nothing durable: all state lives in the content
/// store and the pointer ledger it is constructed with. There is no
/// concurrency control between two commits for the same owner — the last
/// confirmed pointer transaction wins and the other root is silently
/// superseded. Callers serialize same-owner writes externally.
#[derive(Clone)]
pub struct RootIndexManager {
    store: Arc<dyn ContentStore>,
    ledger: Arc<dyn PointerLedger>,
}

impl RootIndexManager {
    pub fn new(store: Arc<dyn ContentStore>, ledger: Arc<dyn PointerLedger>) -> Self {
        Self { store, ledger }
    }

    /// Prepend `new_descriptors` onto `existing_index`, upload the merged
    /// index, commit its identifier to the ledger, and retire `old_root`.
    ///
    /// The pointer transaction is the only point where the store and the
    /// ledger must agree. If it does not reach finality the whole call
    /// fails with [`IndexError::CommitFailed`] and the uploaded blob is
    /// left orphaned (logged, never deleted here). After a confirmed
    /// commit, failure to delete `old_root` is logged and ignored.
    pub async fn merge_and_commit(
        &self,
        owner: &OwnerId,
        new_descriptors: Vec<FileDescriptor>,
        existing_index: RootIndex,
        old_root: Option<&ContentId>,
        observer: &dyn PutObserver,
    ) -> Result<ContentId> {
        let updated = RootIndex::merged(new_descriptors, existing_index);
        let blob = FileBlob::new(RootIndex::blob_name(owner), updated.encode()?);
        debug!(%owner, entries = updated.len(), "root index serialized");

        let new_root = self.store.put(std::slice::from_ref(&blob), observer).await?;
        debug!(%owner, root = %new_root, "root index uploaded");

        let finality = async {
            let tx = self.ledger.submit_update(owner, &new_root).await?;
            self.ledger.wait_finality(&tx).await
        }
        .await;

        match finality {
            Ok(outcome) if outcome.is_confirmed() => {
                info!(%owner, root = %new_root, "root pointer committed");
            }
            Ok(_) => {
                warn!(%owner, orphaned_root = %new_root, "pointer transaction reverted; uploaded root is orphaned");
                return Err(IndexError::CommitFailed {
                    owner: owner.clone(),
                    orphaned_root: new_root,
                    source: None,
                });
            }
            Err(err) => {
                warn!(%owner, orphaned_root = %new_root, error = %err, "pointer transaction did not finalize; uploaded root is orphaned");
                return Err(IndexError::CommitFailed {
                    owner: owner.clone(),
                    orphaned_root: new_root,
                    source: Some(err),
                });
            }
        }

        if let Some(old) = old_root {
            match self.store.delete(old).await {
                Ok(()) => debug!(%owner, old_root = %old, "superseded root retired"),
                Err(err) => {
                    warn!(%owner, old_root = %old, error = %err, "old root cleanup failed; ignoring");
                }
            }
        }

        Ok(new_root)
    }

    /// Resolve the owner's current root index through the ledger pointer.
    ///
    /// An unset pointer is a normal state, not an error. A set pointer
    /// whose blob cannot be fetched resolves to
    /// [`RootLookup::Unreachable`]; a blob that fetches but does not
    /// parse is [`IndexError::CorruptIndex`].
    pub async fn resolve(&self, owner: &OwnerId) -> Result<RootLookup> {
        let Some(pointer) = self.ledger.read(owner).await? else {
            debug!(%owner, "root pointer unset");
            return Ok(RootLookup::Empty);
        };

        let files = match self.store.get(&pointer).await {
            Ok(files) => files,
            Err(err) => {
                warn!(%owner, %pointer, error = %err, "root blob unreachable");
                return Ok(RootLookup::Unreachable { pointer });
            }
        };

        match RootIndex::from_unit(owner, &files) {
            Ok(index) => Ok(RootLookup::Current { pointer, index }),
            Err(source) => Err(IndexError::CorruptIndex {
                owner: owner.clone(),
                pointer,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorfs_ledger::{Finality, MemoryPointerLedger};
    use anchorfs_store::{MemoryContentStore, NoopPutObserver};

    fn owner(name: &str) -> OwnerId {
        OwnerId::new(name).unwrap()
    }

    fn descriptor(cid: &str, name: &str, ts: u64) -> FileDescriptor {
        FileDescriptor::new(ContentId::new(cid), name, ts)
    }

    fn manager(
        store: &MemoryContentStore,
        ledger: &MemoryPointerLedger,
    ) -> RootIndexManager {
        RootIndexManager::new(Arc::new(store.clone()), Arc::new(ledger.clone()))
    }

    #[tokio::test]
    async fn resolve_of_unknown_owner_is_empty() {
        let store = MemoryContentStore::new();
        let ledger = MemoryPointerLedger::new();
        let manager = manager(&store, &ledger);

        let lookup = manager.resolve(&owner("alice")).await.unwrap();

        assert_eq!(lookup, RootLookup::Empty);
        assert!(lookup.into_index().is_empty());
    }

    #[tokio::test]
    async fn commit_stores_the_prepend_merged_index() {
        let store = MemoryContentStore::new();
        let ledger = MemoryPointerLedger::new();
        let manager = manager(&store, &ledger);
        let alice = owner("alice");

        let existing = RootIndex::from_entries(vec![
            descriptor("c3", "c.txt", 30),
            descriptor("c4", "d.txt", 40),
        ]);
        let new = vec![descriptor("c1", "a.txt", 10), descriptor("c2", "b.txt", 20)];

        let root = manager
            .merge_and_commit(&alice, new, existing, None, &NoopPutObserver)
            .await
            .unwrap();

        assert_eq!(ledger.pointer_of(&alice), Some(root.clone()));
        let lookup = manager.resolve(&alice).await.unwrap();
        let index = lookup.into_index();
        let ids: Vec<&str> = index
            .entries()
            .iter()
            .map(|d| d.content_id.as_str())
            .collect();
        assert_eq!(ids, ["c1", "c2", "c3", "c4"]);
    }

    #[tokio::test]
    async fn failed_finality_leaves_pointer_and_orphan_behind() {
        let store = MemoryContentStore::new();
        let ledger = MemoryPointerLedger::new();
        let manager = manager(&store, &ledger);
        let alice = owner("alice");

        // Seed a committed first root.
        let first_root = manager
            .merge_and_commit(
                &alice,
                vec![descriptor("c1", "a.txt", 10)],
                RootIndex::empty(),
                None,
                &NoopPutObserver,
            )
            .await
            .unwrap();

        ledger.enqueue_finality(Finality::Reverted);
        let existing = manager.resolve(&alice).await.unwrap().into_index();
        let result = manager
            .merge_and_commit(
                &alice,
                vec![descriptor("c2", "b.txt", 20)],
                existing,
                Some(&first_root),
                &NoopPutObserver,
            )
            .await;

        let Err(IndexError::CommitFailed { orphaned_root, .. }) = result else {
            panic!("expected CommitFailed");
        };
        // Pointer still names the first root; resolve sees the old index.
        assert_eq!(ledger.pointer_of(&alice), Some(first_root.clone()));
        let index = manager.resolve(&alice).await.unwrap().into_index();
        assert_eq!(index.len(), 1);
        // No compensating rollback: the new blob is still in the store,
        // and the old one was not deleted.
        assert!(store.contains(&orphaned_root));
        assert!(store.contains(&first_root));
    }

    #[tokio::test]
    async fn confirmed_commit_retires_the_old_root() {
        let store = MemoryContentStore::new();
        let ledger = MemoryPointerLedger::new();
        let manager = manager(&store, &ledger);
        let alice = owner("alice");

        let first_root = manager
            .merge_and_commit(
                &alice,
                vec![descriptor("c1", "a.txt", 10)],
                RootIndex::empty(),
                None,
                &NoopPutObserver,
            )
            .await
            .unwrap();

        let existing = manager.resolve(&alice).await.unwrap().into_index();
        let second_root = manager
            .merge_and_commit(
                &alice,
                vec![descriptor("c2", "b.txt", 20)],
                existing,
                Some(&first_root),
                &NoopPutObserver,
            )
            .await
            .unwrap();

        assert!(!store.contains(&first_root));
        assert!(store.contains(&second_root));
        assert_eq!(ledger.pointer_of(&alice), Some(second_root));
    }

    #[tokio::test]
    async fn cleanup_failure_does_not_fail_the_commit() {
        let store = MemoryContentStore::new();
        let ledger = MemoryPointerLedger::new();
        let manager = manager(&store, &ledger);
        let alice = owner("alice");

        let first_root = manager
            .merge_and_commit(
                &alice,
                vec![descriptor("c1", "a.txt", 10)],
                RootIndex::empty(),
                None,
                &NoopPutObserver,
            )
            .await
            .unwrap();

        store.fail_deletes(true);
        let existing = manager.resolve(&alice).await.unwrap().into_index();
        let second_root = manager
            .merge_and_commit(
                &alice,
                vec![descriptor("c2", "b.txt", 20)],
                existing,
                Some(&first_root),
                &NoopPutObserver,
            )
            .await
            .unwrap();

        // Commit succeeded; the stale root simply stayed behind.
        assert_eq!(ledger.pointer_of(&alice), Some(second_root));
        assert!(store.contains(&first_root));
    }

    #[tokio::test]
    async fn unreachable_root_is_distinct_from_empty() {
        let store = MemoryContentStore::new();
        let ledger = MemoryPointerLedger::new();
        let manager = manager(&store, &ledger);
        let alice = owner("alice");

        let root = manager
            .merge_and_commit(
                &alice,
                vec![descriptor("c1", "a.txt", 10)],
                RootIndex::empty(),
                None,
                &NoopPutObserver,
            )
            .await
            .unwrap();

        store.poison_get(&root);
        let lookup = manager.resolve(&alice).await.unwrap();

        assert_eq!(
            lookup,
            RootLookup::Unreachable {
                pointer: root.clone()
            }
        );
        assert_eq!(lookup.pointer(), Some(&root));
        // Lenient collapse still yields an empty index.
        let relookup = manager.resolve(&alice).await.unwrap();
        assert!(relookup.into_index().is_empty());
    }

    #[tokio::test]
    async fn unparsable_root_blob_is_corrupt_not_empty() {
        let store = MemoryContentStore::new();
        let ledger = MemoryPointerLedger::new();
        let manager = manager(&store, &ledger);
        let alice = owner("alice");

        let garbage = store
            .put(
                &[FileBlob::new("alice.json", b"{]".to_vec())],
                &NoopPutObserver,
            )
            .await
            .unwrap();
        ledger.set_pointer(alice.clone(), garbage);

        assert!(matches!(
            manager.resolve(&alice).await,
            Err(IndexError::CorruptIndex { .. })
        ));
    }
}
