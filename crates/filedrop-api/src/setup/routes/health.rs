//! Health check handler and response type.

use crate::constants::SERVICE_VERSION;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    /// Backend name, or `uninitialized` before the first storage call
    pub storage: String,
    pub version: String,
}

/// Liveness plus the state of the storage client. Never touches the network.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is running", body = HealthCheckResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = state
        .storage
        .get_initialized()
        .map(|storage| storage.backend_type().to_string())
        .unwrap_or_else(|| "uninitialized".to_string());

    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            storage,
            version: SERVICE_VERSION.to_string(),
        }),
    )
}
