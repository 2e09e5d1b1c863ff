//! HTTP request handlers.

pub mod download;
pub mod upload;
