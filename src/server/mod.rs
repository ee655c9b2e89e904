//! Access to the map server that hosts the published services.
//!
//! The server is only consulted when no publish history is available
//! locally. Its URL comes from the settings, either directly or from a
//! connection file.

mod connection;
mod rest;

pub use connection::{service_url_from_connection_file, service_url_from_bytes};
pub use rest::RestServiceCatalog;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Server error {code}: {message}")]
    Api { code: i64, message: String },
}

/// A service published on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRef {
    /// Server folder, `None` for the root folder
    pub folder: Option<String>,
    pub name: String,
}

impl ServiceRef {
    pub fn new(folder: Option<String>, name: impl Into<String>) -> Self {
        Self {
            folder,
            name: name.into(),
        }
    }
}

/// Lists the services currently published on a server
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn list_services(&self, server_url: &str) -> Result<Vec<ServiceRef>, ServerError>;
}
