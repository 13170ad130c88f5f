//! Test helpers for Web API integration tests.
//!
//! Builds an in-process server over an in-memory database and blob store.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use fileshelf::file::BlobStore;
use fileshelf::web::{create_router, AppState};
use fileshelf::{Database, MemoryBlobStore};
use serde_json::{json, Value};

/// Handles to everything behind a test server.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
}

/// Create a test server with an in-memory database and blob store.
pub async fn create_test_app() -> (TestApp, Arc<MemoryBlobStore>) {
    let storage = Arc::new(MemoryBlobStore::new());
    let app = create_test_app_with(storage.clone(), None).await;
    (app, storage)
}

/// Create a test server over the given blob store.
///
/// `max_upload_size` overrides the default upload cap when set.
pub async fn create_test_app_with(
    storage: Arc<dyn BlobStore>,
    max_upload_size: Option<u64>,
) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let mut state = AppState::new(db.clone(), storage);
    if let Some(max) = max_upload_size {
        state = state.with_max_upload_size(max);
    }

    let router = create_router(Arc::new(state), &[]);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, db }
}

/// Create a folder through the API and return its id.
pub async fn create_folder(server: &TestServer, name: &str, parent_id: Option<i64>) -> i64 {
    let response = server
        .post("/api/folders")
        .json(&json!({ "name": name, "parentId": parent_id }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<Value>()["id"]
        .as_i64()
        .expect("folder id in response")
}
