use serde::{Deserialize, Serialize};

/// What gets sealed: the file content together with its original name.
///
/// The name travels inside the ciphertext so that a decrypted file
/// supplies its own name, independent of whatever the index entry says.
/// Content stays raw bytes through framing, sealing, and opening — no
/// intermediate string representation exists that could narrow or drop
/// byte values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainPayload {
    pub name: String,
    #[serde(with = "serde_bytes")]
    pub content: Vec<u8>,
}

impl PlainPayload {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}
