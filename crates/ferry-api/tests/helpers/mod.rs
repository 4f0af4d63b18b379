//! Test helpers: build the router over a temporary upload directory.
//!
//! Run from workspace root: `cargo test -p ferry-api`.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{DateTime, TimeDelta, Utc};
use ferry_api::setup::{build_state, routes};
use ferry_api::state::AppState;
use ferry_core::{Clock, Config};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Clock the tests move forward by hand.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc::now()))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += TimeDelta::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Test application: server plus the resources it owns.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Directory that contains the upload directory.
    pub fn outer_dir(&self) -> &Path {
        self._temp_dir.path()
    }

    pub async fn issue_token(&self) -> String {
        let response = self.server.post("/token").await;
        response.assert_status_ok();
        response.text()
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

pub fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let upload_dir = temp_dir.path().join("uploads");

    let mut config = Config {
        upload_dir: upload_dir.clone(),
        ..Config::default()
    };
    customize(&mut config);
    config.validate().unwrap();

    let clock = Arc::new(ManualClock::new());
    let state = build_state(config.clone(), clock.clone());
    let router = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        state,
        clock,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Multipart body with one `file` field.
pub fn file_form(filename: &str, contents: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(contents.to_vec())
            .file_name(filename.to_string())
            .mime_type("application/octet-stream"),
    )
}
