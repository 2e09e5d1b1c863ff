//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p filedrop-api`.

#![allow(dead_code)]

pub mod storage;
pub mod workflows;

use axum_test::TestServer;
use filedrop_api::setup;
use filedrop_api::state::AppState;
use filedrop_core::Config;
use filedrop_storage::{Storage, StorageProvider};
use std::collections::HashMap;
use std::sync::Arc;

use storage::RecordingStorage;

/// Test application: server plus the storage double behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage: Arc<RecordingStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Build a config from explicit variables on top of the in-memory backend.
pub fn test_config(vars: &[(&str, &str)]) -> Config {
    let mut all: HashMap<String, String> = HashMap::new();
    all.insert("STORAGE_BACKEND".to_string(), "memory".to_string());
    for (key, value) in vars {
        all.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|name| all.get(name).cloned()).expect("Invalid test config")
}

/// Setup test app with default config and in-memory storage.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup test app with config overrides and in-memory storage.
pub async fn setup_test_app_with(vars: &[(&str, &str)]) -> TestApp {
    let storage = Arc::new(RecordingStorage::in_memory());
    let provider = StorageProvider::ready(storage.clone() as Arc<dyn Storage>);
    let (state, server) = server_with_provider(test_config(vars), provider);

    TestApp {
        server,
        state,
        storage,
    }
}

/// Router and storage double without a test server, for hand-built requests.
pub fn setup_test_router_with(vars: &[(&str, &str)]) -> (axum::Router, Arc<RecordingStorage>) {
    let storage = Arc::new(RecordingStorage::in_memory());
    let provider = StorageProvider::ready(storage.clone() as Arc<dyn Storage>);
    let (_state, router) = setup::build_app(test_config(vars), provider);
    (router, storage)
}

/// Build a test server around an arbitrary storage provider.
pub fn server_with_provider(
    config: Config,
    provider: StorageProvider,
) -> (Arc<AppState>, TestServer) {
    let (state, app) = setup::build_app(config, provider);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");
    (state, server)
}
