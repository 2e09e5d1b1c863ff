//! Filedrop API Library
//!
//! This crate provides the HTTP handlers (upload, download, health), error
//! mapping, tracing setup and application wiring for the `filedrop-api`
//! binary.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;

pub mod error;
pub mod state;

pub use api_doc::{get_openapi_spec, ApiDoc};
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::download::disposition_for;
pub use handlers::upload::UploadResponse;
