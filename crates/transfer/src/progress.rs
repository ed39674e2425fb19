use anchorfs_store::PutObserver;
use anchorfs_types::ContentId;

/// Optional per-item and per-batch progress observer.
///
/// Purely informational: implementations must tolerate observers that do
/// nothing, and observer behavior never affects transfer outcomes. The
/// unit/chunk events mirror the content store's [`PutObserver`] and are
/// forwarded from each put.
pub trait TransferProgress: Send + Sync {
    /// The store assigned an identifier to a unit being uploaded.
    fn unit_id_ready(&self, _id: &ContentId) {}

    /// A chunk of the current unit has been durably stored.
    fn stored_chunk(&self, _bytes: u64) {}

    /// One file of the batch finished uploading.
    fn item_uploaded(&self, _index: usize, _name: &str, _id: &ContentId) {}

    /// One file of the batch finished downloading.
    fn item_downloaded(&self, _index: usize, _name: &str) {}

    /// The batch finished; `completed` counts the items that made it.
    fn batch_done(&self, _completed: usize) {}
}

/// Progress observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl TransferProgress for NoopProgress {}

/// Adapter forwarding a put's store events to a [`TransferProgress`].
pub(crate) struct PutEvents<'a>(pub &'a dyn TransferProgress);

impl PutObserver for PutEvents<'_> {
    fn unit_id_ready(&self, id: &ContentId) {
        self.0.unit_id_ready(id);
    }

    fn stored_chunk(&self, bytes: u64) {
        self.0.stored_chunk(bytes);
    }
}
