//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p thumbstore-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use thumbstore_api::setup::routes;
use thumbstore_api::state::AppState;
use thumbstore_core::Config;
use thumbstore_storage::{LocalStorage, Storage};

/// Test application: server plus the temporary storage root it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Every entry under the storage root, including hidden staged files.
    pub fn all_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.storage_root())
            .expect("Failed to read storage root")
            .map(|entry| {
                entry
                    .expect("Failed to read directory entry")
                    .file_name()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        names.sort();
        names
    }

    /// Entries a download could ever serve.
    pub fn visible_files(&self) -> Vec<String> {
        self.all_files()
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .collect()
    }

    pub fn read(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.storage_root().join(name)).expect("Failed to read stored file")
    }
}

/// Setup test app with local storage in a fresh temporary directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, letting the caller adjust the configuration first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut config = Config::with_storage_path(temp_dir.path().to_string_lossy().to_string());
    configure(&mut config);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path())
            .await
            .expect("Failed to create local storage"),
    );

    let state = Arc::new(AppState::new(storage));
    let app = routes::setup_routes(&config, state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, temp_dir }
}
