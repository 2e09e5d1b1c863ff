use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::transfer::copy_stream;
use crate::{content_type_for, StorageBackend, DEFAULT_CONTENT_TYPE};
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Storage backed by any `object_store` implementation (GCS, S3, in-memory).
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
}

impl ObjectStorage {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, backend: StorageBackend) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            backend,
        }
    }

    /// Create a Google Cloud Storage client for `bucket`.
    ///
    /// `service_account_key` may be the JSON key itself or a path to it. Without
    /// one, credentials are discovered from the environment
    /// (`GOOGLE_APPLICATION_CREDENTIALS`, metadata server).
    pub fn gcs(bucket: String, service_account_key: Option<String>) -> StorageResult<Self> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket.clone());

        if let Some(key) = service_account_key {
            builder = if key.trim_start().starts_with('{') {
                builder.with_service_account_key(key)
            } else {
                builder.with_service_account_path(key)
            };
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::new(Arc::new(store), bucket, StorageBackend::Gcs))
    }

    /// Create an S3 client for `bucket`.
    ///
    /// `endpoint_url` selects an S3-compatible provider
    /// (e.g. "http://localhost:9000" for MinIO).
    pub fn s3(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::new(Arc::new(store), bucket, StorageBackend::S3))
    }

    /// Process-local store, used for development and tests.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory", StorageBackend::Memory)
    }
}

impl fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("bucket", &self.bucket)
            .field("backend", &self.backend)
            .finish()
    }
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<u64> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );

        let mut writer =
            BufWriter::new(Arc::clone(&self.store), location).with_attributes(attributes);

        let copied = copy_stream(reader, &mut writer).await;
        let result = match copied {
            Ok(size) => writer
                .shutdown()
                .await
                .map(|_| size)
                .map_err(|e| StorageError::UploadFailed(e.to_string())),
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        bucket = %self.bucket,
                        key = %key,
                        "Failed to abort partial upload"
                    );
                }
                Err(e.into_storage_error(key))
            }
        };

        match result {
            Ok(size) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload successful"
                );
                Ok(size)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object upload failed"
                );
                Err(e)
            }
        }
    }

    async fn get(&self, key: &str) -> StorageResult<StoredObject> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result = self.store.get(&location).await.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Object download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string())
            .or_else(|| content_type_for(key).map(String::from))
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let size = result.meta.size;

        let data = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object download successful"
        );

        Ok(StoredObject {
            content_type,
            size,
            data,
        })
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}
