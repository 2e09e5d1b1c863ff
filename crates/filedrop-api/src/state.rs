//! Shared application state handed to every handler.

use filedrop_core::{AppError, Config};
use filedrop_storage::{KeyDeriver, Storage, StorageProvider};
use std::sync::Arc;

pub struct AppState {
    /// Lazily constructed storage client shared by all requests
    pub storage: Arc<StorageProvider>,
    pub keys: Arc<KeyDeriver>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, storage: StorageProvider) -> Self {
        Self {
            storage: Arc::new(storage),
            keys: Arc::new(KeyDeriver::new()),
            config,
        }
    }

    /// The storage client, constructing it on first use.
    ///
    /// Construction failures are reported as `StorageUnavailable` and retried
    /// by the next caller.
    pub async fn storage(&self) -> Result<Arc<dyn Storage>, AppError> {
        self.storage
            .get()
            .await
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))
    }
}
