use crate::blob::FileBlob;
use crate::descriptor::FileDescriptor;
use crate::owner::OwnerId;
use serde::{Deserialize, Serialize};

/// Errors that can occur while decoding a stored root index blob.
#[derive(Debug, thiserror::Error)]
pub enum RootCodecError {
    #[error("root unit contains no files")]
    EmptyUnit,
    #[error("root index blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The ordered list of file descriptors for one owner, newest first.
///
/// New uploads are prepended, so sequence order reflects upload recency.
/// There is no uniqueness constraint on `name` or `content_id`: the index
/// is an append-only history, not a key-value map, and duplicates are
/// legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootIndex(Vec<FileDescriptor>);

impl RootIndex {
    /// An index with no entries — the state of an owner before any upload.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_entries(entries: Vec<FileDescriptor>) -> Self {
        Self(entries)
    }

    /// Prepend-merge: the new batch goes in front of the existing entries,
    /// both halves keeping their internal order.
    pub fn merged(new: Vec<FileDescriptor>, existing: RootIndex) -> Self {
        let mut entries = new;
        entries.extend(existing.0);
        Self(entries)
    }

    pub fn entries(&self) -> &[FileDescriptor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name the index blob is stored under in the content store.
    pub fn blob_name(owner: &OwnerId) -> String {
        format!("{owner}.json")
    }

    /// Canonical encoding: a JSON array with one object per descriptor,
    /// fields in declaration order.
    pub fn encode(&self) -> Result<Vec<u8>, RootCodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RootCodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Extract and decode the index from a fetched content unit.
    ///
    /// The blob named `{owner}.json` is the index; if no blob carries that
    /// name the first one in the unit is used.
    pub fn from_unit(owner: &OwnerId, files: &[FileBlob]) -> Result<Self, RootCodecError> {
        let wanted = Self::blob_name(owner);
        let blob = files
            .iter()
            .find(|file| file.name == wanted)
            .or_else(|| files.first())
            .ok_or(RootCodecError::EmptyUnit)?;
        Self::decode(&blob.content)
    }
}

impl IntoIterator for RootIndex {
    type Item = FileDescriptor;
    type IntoIter = std::vec::IntoIter<FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
