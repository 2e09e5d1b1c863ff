//! Filedrop Core Library
//!
//! This crate provides the configuration, error types and storage backend
//! selector shared by the storage layer and the HTTP API.

pub mod config;
pub mod error;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, StorageConfig, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
