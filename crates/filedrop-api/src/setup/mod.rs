//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use filedrop_core::Config;
use filedrop_storage::StorageProvider;
use std::sync::Arc;

/// Initialize the entire application: telemetry, storage client, routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let provider = storage::setup_storage(&config).await?;

    Ok(build_app(config, provider))
}

/// Assemble state and router around an existing storage provider.
pub fn build_app(config: Config, provider: StorageProvider) -> (Arc<AppState>, axum::Router) {
    let state = Arc::new(AppState::new(config.clone(), provider));
    let router = routes::setup_routes(&config, state.clone());
    (state, router)
}
