use serde::{Deserialize, Serialize};

/// A named byte blob — the unit the content store puts and gets.
///
/// The content is opaque: plaintext on unencrypted transfers, sealed
/// ciphertext otherwise. Byte values are carried verbatim end to end;
/// nothing here passes the content through a string representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlob {
    pub name: String,
    #[serde(with = "serde_bytes")]
    pub content: Vec<u8>,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Size of the content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_arbitrary_byte_values() {
        let content: Vec<u8> = (0u8..=255).collect();
        let blob = FileBlob::new("raw.bin", content.clone());

        let encoded = bincode::serialize(&blob).unwrap();
        let decoded: FileBlob = bincode::deserialize(&encoded).unwrap();

        assert_eq!(decoded.name, "raw.bin");
        assert_eq!(decoded.content, content);
    }

    #[test]
    fn empty_content_is_legal() {
        let blob = FileBlob::new("empty", Vec::new());
        assert!(blob.is_empty());
        assert_eq!(blob.len(), 0);
    }
}
