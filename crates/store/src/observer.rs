use anchorfs_types::ContentId;

/// Optional progress observer for a single `put`.
///
/// Observers are purely informational; implementations must tolerate them
/// doing nothing and must not let observer behavior affect the outcome of
/// the upload.
pub trait PutObserver: Send + Sync {
    /// The store has assigned the unit its identifier.
    fn unit_id_ready(&self, _id: &ContentId) {}

    /// A chunk of the unit has been durably stored.
    fn stored_chunk(&self, _bytes: u64) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPutObserver;

impl PutObserver for NoopPutObserver {}
