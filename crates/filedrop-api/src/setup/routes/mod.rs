//! Route configuration and setup.
//!
//! File routes live in [handlers](crate::handlers); the health check in [health](health).

pub mod health;

use crate::handlers::{download, upload};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use filedrop_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let max_upload_size = config.max_upload_size_bytes();
    let request_timeout_secs = config.request_timeout_secs();
    let http_concurrency_limit = config.http_concurrency_limit();

    tracing::info!(
        max_upload_size_bytes = max_upload_size,
        request_timeout_secs,
        http_concurrency_limit,
        "HTTP limits configured"
    );

    Router::new()
        .route("/upload", post(upload::upload_files))
        .route(
            "/file/{dir}/{filename}",
            get(download::download_file).options(download::download_options),
        )
        .route("/health", get(health::health_check))
        .route("/api/openapi.json", get(openapi_json))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        // Over-limit bodies surface through the multipart stream as 413.
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_json() -> impl IntoResponse {
    Json(crate::api_doc::get_openapi_spec())
}
