//! Storage doubles for integration tests.

use async_trait::async_trait;
use filedrop_storage::{
    ObjectStorage, Storage, StorageBackend, StorageError, StorageResult, StoredObject,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::AsyncRead;

/// In-memory storage that records which writes were attempted and committed.
pub struct RecordingStorage {
    inner: ObjectStorage,
    put_attempts: AtomicUsize,
    committed: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub fn in_memory() -> Self {
        Self {
            inner: ObjectStorage::in_memory(),
            put_attempts: AtomicUsize::new(0),
            committed: Mutex::new(Vec::new()),
        }
    }

    pub fn put_attempts(&self) -> usize {
        self.put_attempts.load(Ordering::SeqCst)
    }

    /// Keys of successfully stored objects, in write order.
    pub fn committed(&self) -> Vec<String> {
        self.committed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);
        let size = self.inner.put_stream(key, content_type, reader).await?;
        self.committed.lock().unwrap().push(key.to_string());
        Ok(size)
    }

    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        self.inner.get(key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// Storage whose backend rejects every request.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn put_stream(
        &self,
        _key: &str,
        _content_type: &str,
        _reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        Err(StorageError::UploadFailed("bucket unreachable".to_string()))
    }

    async fn get(&self, _key: &str) -> StorageResult<StoredObject> {
        Err(StorageError::DownloadFailed("bucket unreachable".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}
