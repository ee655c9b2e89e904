#![allow(dead_code)]

use async_trait::async_trait;
use map_publisher::{ServerError, ServiceCatalog, ServiceRef};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create an empty file, along with any missing parent folders
pub fn touch(path: &Path) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Should create parent folders");
    }
    std::fs::write(path, "").expect("Should create file");
    path.to_path_buf()
}

/// Service catalog returning a fixed list and remembering the URLs queried
#[derive(Default)]
pub struct FakeCatalog {
    pub services: Vec<ServiceRef>,
    pub queried: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_services(services: Vec<ServiceRef>) -> Self {
        Self {
            services,
            queried: Mutex::new(Vec::new()),
        }
    }

    pub fn queried_urls(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceCatalog for FakeCatalog {
    async fn list_services(&self, server_url: &str) -> Result<Vec<ServiceRef>, ServerError> {
        self.queried.lock().unwrap().push(server_url.to_string());
        Ok(self.services.clone())
    }
}

/// Service catalog that always fails
pub struct FailingCatalog;

#[async_trait]
impl ServiceCatalog for FailingCatalog {
    async fn list_services(&self, _server_url: &str) -> Result<Vec<ServiceRef>, ServerError> {
        Err(ServerError::Api {
            code: 500,
            message: "Internal server error".to_string(),
        })
    }
}
