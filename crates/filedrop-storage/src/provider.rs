//! Shared storage client with one-time initialization.
//!
//! The provider owns the process-wide `Arc<dyn Storage>`. The first `get`
//! runs the factory; concurrent first callers wait for that single attempt
//! and then share its result. A failed attempt is not cached, so the next
//! caller tries again instead of inheriting a dead client.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::{Storage, StorageError, StorageResult};

type StorageFactory =
    Box<dyn Fn() -> BoxFuture<'static, StorageResult<Arc<dyn Storage>>> + Send + Sync>;

pub struct StorageProvider {
    cell: OnceCell<Arc<dyn Storage>>,
    factory: StorageFactory,
}

impl StorageProvider {
    /// Create a provider that builds its client with `factory` on first use.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StorageResult<Arc<dyn Storage>>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(move || Box::pin(factory())),
        }
    }

    /// Create a provider around an already constructed client.
    pub fn ready(storage: Arc<dyn Storage>) -> Self {
        let fallback = Arc::clone(&storage);
        Self {
            cell: OnceCell::new_with(Some(storage)),
            factory: Box::new(move || {
                let storage = Arc::clone(&fallback);
                Box::pin(async move { Ok(storage) })
            }),
        }
    }

    /// Return the shared client, constructing it if needed.
    pub async fn get(&self) -> StorageResult<Arc<dyn Storage>> {
        let storage = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!("Initializing storage client");
                let start = std::time::Instant::now();

                let storage = (self.factory)().await.map_err(|e| {
                    tracing::error!(
                        error = %e,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Storage client initialization failed, will retry on next use"
                    );
                    e
                })?;

                tracing::info!(
                    backend = %storage.backend_type(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Storage client initialized"
                );
                Ok::<_, StorageError>(storage)
            })
            .await?;

        Ok(Arc::clone(storage))
    }

    /// The client, if it has been constructed already.
    pub fn get_initialized(&self) -> Option<Arc<dyn Storage>> {
        self.cell.get().map(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

impl fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageProvider")
            .field(
                "backend",
                &self.cell.get().map(|storage| storage.backend_type()),
            )
            .finish_non_exhaustive()
    }
}
