//! Storage setup and initialization

use anyhow::{Context, Result};
use filedrop_core::Config;
use filedrop_storage::{storage_provider, StorageProvider};

/// Build the storage provider for the configured backend and construct the
/// client right away so misconfiguration fails at startup.
pub async fn setup_storage(config: &Config) -> Result<StorageProvider> {
    tracing::info!(backend = %config.storage_backend(), "Initializing storage...");

    let provider = storage_provider(config.clone());
    provider
        .get()
        .await
        .with_context(|| format!("Failed to initialize {} storage", config.storage_backend()))?;

    Ok(provider)
}
