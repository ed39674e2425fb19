use crate::content_id::ContentId;
use serde::{Deserialize, Serialize};

/// Metadata record for one stored, individually-encrypted file.
///
/// Immutable once created. `last_modified` is assigned when the upload is
/// processed, in milliseconds since the Unix epoch. Field order is part
/// of the canonical root index encoding and must not be reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub content_id: ContentId,
    pub name: String,
    pub last_modified: u64,
}

impl FileDescriptor {
    pub fn new(content_id: ContentId, name: impl Into<String>, last_modified: u64) -> Self {
        Self {
            content_id,
            name: name.into(),
            last_modified,
        }
    }
}
