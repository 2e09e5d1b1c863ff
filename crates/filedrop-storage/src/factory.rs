use crate::{
    LocalStorage, ObjectStorage, Storage, StorageBackend, StorageError, StorageProvider,
    StorageResult,
};
use filedrop_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        StorageBackend::Gcs => {
            let bucket = config
                .gcs_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("GCS_BUCKET not configured".to_string()))?;
            let key = config.gcs_service_account_key().map(String::from);

            let storage = ObjectStorage::gcs(bucket, key)?;
            Ok(Arc::new(storage))
        }

        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .or_else(|| config.aws_region())
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = ObjectStorage::s3(bucket, region, endpoint)?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path).await?;
            Ok(Arc::new(storage))
        }

        StorageBackend::Memory => Ok(Arc::new(ObjectStorage::in_memory())),
    }
}

/// Provider that builds the configured backend on first use.
pub fn storage_provider(config: Config) -> StorageProvider {
    let config = Arc::new(config);
    StorageProvider::new(move || {
        let config = Arc::clone(&config);
        async move { create_storage(&config).await }
    })
}
