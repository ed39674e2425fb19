use crate::errors::{Result, TransferError};
use crate::progress::{PutEvents, TransferProgress};
use anchorfs_crypto::{FileCipher, PlainPayload};
use anchorfs_store::ContentStore;
use anchorfs_types::{BatchClock, FileBlob, FileDescriptor};
use std::sync::Arc;
use tracing::{debug, warn};

/// Uploads and downloads batches of files through the content store,
/// applying the cipher per file.
#[derive(Clone)]
pub struct TransferOrchestrator {
    store: Arc<dyn ContentStore>,
    cipher: Arc<dyn FileCipher>,
}

impl TransferOrchestrator {
    pub fn new(store: Arc<dyn ContentStore>, cipher: Arc<dyn FileCipher>) -> Self {
        Self { store, cipher }
    }

    /// Upload every file, strictly in input order, one at a time.
    ///
    /// Each file is optionally sealed under `encrypt_key`, uploaded as
    /// its own unit under the original name, and stamped with a
    /// processing-time timestamp that never decreases across the batch.
    /// Descriptors come back in input order; prepend-merge ordering is
    /// the caller's job.
    ///
    /// The first failure aborts the batch: descriptors for files already
    /// uploaded are discarded, and the error names the file that sank.
    pub async fn upload_all(
        &self,
        files: &[FileBlob],
        encrypt_key: Option<&str>,
        progress: &dyn TransferProgress,
    ) -> Result<Vec<FileDescriptor>> {
        let mut clock = BatchClock::new();
        let mut descriptors = Vec::with_capacity(files.len());

        for (index, file) in files.iter().enumerate() {
            let content = match encrypt_key {
                Some(key) => {
                    let payload = PlainPayload::new(file.name.clone(), file.content.clone());
                    self.cipher.seal(key, &payload).map_err(|err| {
                        TransferError::UploadFailed {
                            name: file.name.clone(),
                            source: err.into(),
                        }
                    })?
                }
                None => file.content.clone(),
            };

            let unit = FileBlob::new(file.name.clone(), content);
            let id = self
                .store
                .put(std::slice::from_ref(&unit), &PutEvents(progress))
                .await
                .map_err(|err| TransferError::UploadFailed {
                    name: file.name.clone(),
                    source: err.into(),
                })?;

            progress.item_uploaded(index, &file.name, &id);
            debug!(name = %file.name, %id, "file uploaded");
            descriptors.push(FileDescriptor::new(id, file.name.clone(), clock.next()));
        }

        progress.batch_done(descriptors.len());
        Ok(descriptors)
    }

    /// Download the files named by `descriptors`, skipping what cannot be
    /// fetched.
    ///
    /// A per-item fetch failure is logged and the item dropped — partial
    /// recovery beats losing the whole read. With a key, each fetched
    /// payload is opened and the name embedded in the payload wins over
    /// the descriptor's; opening failures are NOT skipped, they abort the
    /// call.
    pub async fn download_all(
        &self,
        descriptors: &[FileDescriptor],
        decrypt_key: Option<&str>,
        progress: &dyn TransferProgress,
    ) -> Result<Vec<FileBlob>> {
        let mut files = Vec::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            let blobs = match self.store.get(&descriptor.content_id).await {
                Ok(blobs) => blobs,
                Err(err) => {
                    warn!(
                        name = %descriptor.name,
                        id = %descriptor.content_id,
                        error = %err,
                        "skipping unfetchable file"
                    );
                    continue;
                }
            };
            let Some(blob) = blobs.into_iter().next() else {
                warn!(
                    name = %descriptor.name,
                    id = %descriptor.content_id,
                    "skipping empty content unit"
                );
                continue;
            };

            let file = match decrypt_key {
                Some(key) => {
                    let payload = self.cipher.open(key, &blob.content)?;
                    FileBlob::new(payload.name, payload.content)
                }
                None => blob,
            };

            progress.item_downloaded(index, &file.name);
            files.push(file);
        }

        progress.batch_done(files.len());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;
    use anchorfs_crypto::{generate_key, SealedBoxCipher};
    use anchorfs_store::MemoryContentStore;
    use anchorfs_types::ContentId;
    use parking_lot::Mutex;

    fn orchestrator(store: &MemoryContentStore) -> TransferOrchestrator {
        TransferOrchestrator::new(Arc::new(store.clone()), Arc::new(SealedBoxCipher::new()))
    }

    fn batch(names: &[&str]) -> Vec<FileBlob> {
        names
            .iter()
            .map(|name| FileBlob::new(*name, format!("content of {name}").into_bytes()))
            .collect()
    }

    #[tokio::test]
    async fn upload_returns_descriptors_in_input_order() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let files = batch(&["a.txt", "b.txt", "c.txt"]);

        let descriptors = orchestrator
            .upload_all(&files, None, &NoopProgress)
            .await
            .unwrap();

        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn upload_timestamps_never_decrease() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let files = batch(&["a", "b", "c", "d", "e"]);

        let descriptors = orchestrator
            .upload_all(&files, None, &NoopProgress)
            .await
            .unwrap();

        for pair in descriptors.windows(2) {
            assert!(pair[0].last_modified <= pair[1].last_modified);
        }
    }

    #[tokio::test]
    async fn upload_aborts_on_first_failure_and_names_the_file() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let files = batch(&["a.txt", "b.txt", "c.txt"]);

        store.fail_next_puts(1);
        let result = orchestrator.upload_all(&files, None, &NoopProgress).await;

        let Err(TransferError::UploadFailed { name, .. }) = result else {
            panic!("expected UploadFailed");
        };
        assert_eq!(name, "a.txt");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn encrypted_roundtrip_restores_names_and_bytes() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let key = generate_key();
        let content: Vec<u8> = (0u8..=255).collect();
        let files = vec![FileBlob::new("raw.bin", content.clone())];

        let descriptors = orchestrator
            .upload_all(&files, Some(&key), &NoopProgress)
            .await
            .unwrap();

        // Stored bytes are ciphertext, not the plaintext.
        let stored = store.get(&descriptors[0].content_id).await.unwrap();
        assert_ne!(stored[0].content, content);

        let downloaded = orchestrator
            .download_all(&descriptors, Some(&key), &NoopProgress)
            .await
            .unwrap();
        assert_eq!(downloaded.len(), 1);
        assert_eq!(downloaded[0].name, "raw.bin");
        assert_eq!(downloaded[0].content, content);
    }

    #[tokio::test]
    async fn download_skips_unfetchable_items() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let files = batch(&["a.txt", "b.txt"]);

        let descriptors = orchestrator
            .upload_all(&files, None, &NoopProgress)
            .await
            .unwrap();
        store.poison_get(&descriptors[1].content_id);

        let downloaded = orchestrator
            .download_all(&descriptors, None, &NoopProgress)
            .await
            .unwrap();

        assert_eq!(downloaded.len(), 1);
        assert_eq!(downloaded[0].name, "a.txt");
    }

    #[tokio::test]
    async fn download_skips_missing_items() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let mut descriptors = orchestrator
            .upload_all(&batch(&["a.txt"]), None, &NoopProgress)
            .await
            .unwrap();
        descriptors.push(FileDescriptor::new(
            ContentId::new("gone"),
            "gone.txt",
            0,
        ));

        let downloaded = orchestrator
            .download_all(&descriptors, None, &NoopProgress)
            .await
            .unwrap();

        assert_eq!(downloaded.len(), 1);
    }

    #[tokio::test]
    async fn download_with_wrong_key_fails_loudly() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let descriptors = orchestrator
            .upload_all(&batch(&["a.txt"]), Some(&generate_key()), &NoopProgress)
            .await
            .unwrap();

        let result = orchestrator
            .download_all(&descriptors, Some(&generate_key()), &NoopProgress)
            .await;

        assert!(matches!(result, Err(TransferError::Crypto(_))));
    }

    #[derive(Default)]
    struct RecordingProgress {
        uploaded: Mutex<Vec<String>>,
        downloaded: Mutex<Vec<String>>,
        batches: Mutex<Vec<usize>>,
        chunk_bytes: Mutex<u64>,
    }

    impl TransferProgress for RecordingProgress {
        fn stored_chunk(&self, bytes: u64) {
            *self.chunk_bytes.lock() += bytes;
        }

        fn item_uploaded(&self, _index: usize, name: &str, _id: &ContentId) {
            self.uploaded.lock().push(name.to_owned());
        }

        fn item_downloaded(&self, _index: usize, name: &str) {
            self.downloaded.lock().push(name.to_owned());
        }

        fn batch_done(&self, completed: usize) {
            self.batches.lock().push(completed);
        }
    }

    #[tokio::test]
    async fn progress_sees_every_item_in_order() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let progress = RecordingProgress::default();
        let files = batch(&["a.txt", "b.txt"]);

        let descriptors = orchestrator
            .upload_all(&files, None, &progress)
            .await
            .unwrap();
        orchestrator
            .download_all(&descriptors, None, &progress)
            .await
            .unwrap();

        assert_eq!(progress.uploaded.lock().as_slice(), &["a.txt", "b.txt"]);
        assert_eq!(progress.downloaded.lock().as_slice(), &["a.txt", "b.txt"]);
        assert_eq!(progress.batches.lock().as_slice(), &[2, 2]);
        assert!(*progress.chunk_bytes.lock() > 0);
    }

    #[tokio::test]
    async fn upload_failure_hides_earlier_descriptors() {
        let store = MemoryContentStore::new();
        let orchestrator = orchestrator(&store);
        let files = batch(&["a.txt", "b.txt", "c.txt"]);
        let progress = RecordingProgress::default();

        // Let the first file through, then arm a failure for the second.
        struct ArmAfterFirst<'a> {
            store: &'a MemoryContentStore,
            inner: &'a RecordingProgress,
        }
        impl TransferProgress for ArmAfterFirst<'_> {
            fn item_uploaded(&self, index: usize, name: &str, id: &ContentId) {
                if index == 0 {
                    self.store.fail_next_puts(1);
                }
                self.inner.item_uploaded(index, name, id);
            }
        }
        let arming = ArmAfterFirst {
            store: &store,
            inner: &progress,
        };
        let result = orchestrator.upload_all(&files, None, &arming).await;

        let Err(TransferError::UploadFailed { name, .. }) = result else {
            panic!("expected UploadFailed");
        };
        assert_eq!(name, "b.txt");
        // The first file's upload happened, but no batch completion was
        // reported and no descriptors escaped.
        assert_eq!(progress.uploaded.lock().as_slice(), &["a.txt"]);
        assert!(progress.batches.lock().is_empty());
    }
}
