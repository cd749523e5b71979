//! Shared helpers for integration tests: a temp storage root wired into the
//! router, request helpers, and generated stand-ins for the media tools.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use vidshelf::app::create_app;
use vidshelf::config::settings::AppConfig;
use vidshelf::state::AppState;

pub struct TestLibrary {
    pub root: TempDir,
    pub config: AppConfig,
}

impl TestLibrary {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let root = tempfile::tempdir().expect("failed to create storage root");
        let mut config = AppConfig::with_storage_root(root.path());
        customize(&mut config);
        Self { root, config }
    }

    pub fn app(&self) -> Router {
        create_app(AppState::new(self.config.clone()))
    }

    pub fn add_file(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        std::fs::write(&path, data).expect("failed to write fixture");
        path
    }

    pub async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, HeaderMap, Bytes) {
        let mut request = Request::builder().uri(uri);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = self
            .app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body)
    }
}

pub fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .unwrap()
}

/// Deterministic non-repeating-looking payload.
pub fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 31 + 7) % 251) as u8).collect()
}

/// Writes an executable `/bin/sh` script standing in for an external tool.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
