//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Reading the caller-provided source failed before the write completed.
    /// The partial object is discarded.
    #[error("Failed to read upload source: {0}")]
    SourceRead(#[source] std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An object read back from storage, fully buffered.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    /// Size reported by the backend's object metadata
    pub size: u64,
    pub data: Bytes,
}

/// Storage abstraction trait
///
/// All storage backends must implement this trait so the HTTP handlers work
/// against any of them without knowing which one is configured.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream `reader` to `key` until EOF and return the number of bytes written.
    ///
    /// The object only becomes visible once the write is finalized. If the
    /// reader fails, `StorageError::SourceRead` is returned and nothing is
    /// stored at `key`.
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Read the whole object at `key` together with its content type and size.
    async fn get(&self, key: &str) -> StorageResult<StoredObject>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
