//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::constants::SERVICE_VERSION;
use crate::error;
use crate::handlers;
use crate::setup::routes::health;

/// Returns the OpenAPI document with the crate version filled in.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    spec.info.version = SERVICE_VERSION.to_string();
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filedrop API",
        description = "Upload files into an object storage bucket under date-partitioned keys and download them back by key."
    ),
    paths(
        handlers::upload::upload_files,
        handlers::download::download_file,
        handlers::download::download_options,
        health::health_check,
    ),
    components(schemas(
        handlers::upload::UploadResponse,
        health::HealthCheckResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "files", description = "File upload and download"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
