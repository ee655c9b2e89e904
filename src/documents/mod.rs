//! Decides which map documents to publish and which services to remove.
//!
//! Three sources feed the decision:
//! - the documents found under the root folder (and one folder below it)
//! - the history of services published on earlier runs
//! - the settings, used as a fallback for both of the above
//!
//! When no history is available locally, the services currently on the
//! server stand in for it.

mod scan;

pub use scan::{find_documents, FilesystemDocument};

use crate::config::{Settings, DEFAULT_DOCUMENT_EXTENSION};
use crate::document::Doc;
use crate::history::{
    history_from_documents, read_history, write_history, HistoryEntry, HistoryError,
};
use crate::server::{
    service_url_from_connection_file, RestServiceCatalog, ServerError, ServiceCatalog,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum DocumentsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("History error: {0}")]
    HistoryError(#[from] HistoryError),

    #[error("Server error: {0}")]
    ServerError(#[from] ServerError),
}

/// The map documents on disk, reconciled against the publish history
#[derive(Debug, Clone)]
pub struct Documents {
    path: Option<PathBuf>,
    history: Option<Vec<HistoryEntry>>,
    filesystem_documents: Vec<FilesystemDocument>,
    settings: Option<Arc<Settings>>,
}

impl Documents {
    /// Build the reconciler, querying the map server over REST when the
    /// history has to come from the server.
    pub async fn new(
        path: Option<PathBuf>,
        history: Option<Vec<HistoryEntry>>,
        settings: Option<Settings>,
    ) -> Result<Self, DocumentsError> {
        Self::with_catalog(path, history, settings, &RestServiceCatalog::new()).await
    }

    /// Build the reconciler.
    ///
    /// `path` falls back to the settings' root directory. `history` falls
    /// back to the settings' history file, then to the services `catalog`
    /// reports for the settings' server.
    pub async fn with_catalog(
        path: Option<PathBuf>,
        history: Option<Vec<HistoryEntry>>,
        settings: Option<Settings>,
        catalog: &dyn ServiceCatalog,
    ) -> Result<Self, DocumentsError> {
        let mut documents = Self {
            path: None,
            history: None,
            filesystem_documents: Vec::new(),
            settings: settings.map(Arc::new),
        };

        let path = match path {
            Some(path) => Some(path),
            None => documents.root_directory_from_settings(),
        };
        documents.set_path(path)?;

        let history = match history {
            Some(history) => Some(history),
            None => match documents.history_file_from_settings() {
                Some(history_file) => Some(read_history(&history_file).await?),
                None => documents.history_from_server(catalog).await?,
            },
        };
        documents.set_history(history);

        Ok(documents)
    }

    /// Folder searched for map documents
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Change the folder searched for map documents.
    ///
    /// Setting the current value does nothing. Any other value triggers a
    /// new scan. Returns whether the path changed.
    pub fn set_path(&mut self, new_path: Option<PathBuf>) -> Result<bool, DocumentsError> {
        if new_path == self.path {
            return Ok(false);
        }

        debug!("Setting path from {:?} to {:?}", self.path, new_path);
        let found = match &new_path {
            Some(root) => find_documents(root, &self.document_extension())?,
            None => Vec::new(),
        };

        self.path = new_path;
        self.filesystem_documents = found;
        Ok(true)
    }

    /// Services published previously and not yet removed
    pub fn history(&self) -> Option<&[HistoryEntry]> {
        self.history.as_deref()
    }

    /// Replace the history. Returns whether it changed.
    pub fn set_history(&mut self, new_history: Option<Vec<HistoryEntry>>) -> bool {
        if new_history == self.history {
            return false;
        }

        debug!(
            "Setting history from {:?} to {:?} entries",
            self.history.as_ref().map(Vec::len),
            new_history.as_ref().map(Vec::len)
        );
        self.history = new_history;
        true
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_deref()
    }

    /// Documents found by the last scan
    pub fn filesystem_documents(&self) -> &[FilesystemDocument] {
        &self.filesystem_documents
    }

    /// Every document found on disk
    pub fn items_to_publish(&self) -> Vec<Doc> {
        debug!(
            "Found {} documents to publish",
            self.filesystem_documents.len()
        );
        self.filesystem_documents
            .iter()
            .map(|found| {
                Doc::new(
                    Some(found.path.clone()),
                    found.folder.clone(),
                    self.settings.clone(),
                )
            })
            .collect()
    }

    /// Previously published services whose document is no longer on disk.
    ///
    /// Nothing is removed without a history, and nothing is removed when the
    /// scan found no documents at all: an empty or misconfigured root must
    /// not wipe every service.
    pub fn items_to_unpublish(&self) -> Vec<Doc> {
        let history = match &self.history {
            Some(history) => history,
            None => return Vec::new(),
        };

        if self.filesystem_documents.is_empty() {
            warn!(
                "No *.{} files found, unwilling to unpublish all services",
                self.document_extension()
            );
            return Vec::new();
        }

        let source_paths: HashSet<&Path> = self
            .filesystem_documents
            .iter()
            .map(|found| found.path.as_path())
            .collect();

        let docs: Vec<Doc> = history
            .iter()
            .filter(|entry| match &entry.source_path {
                Some(path) => !source_paths.contains(path.as_path()),
                None => true,
            })
            .map(|entry| {
                Doc::new(
                    entry.source_path.clone(),
                    entry.service_folder.clone(),
                    self.settings.clone(),
                )
                .with_service_name(entry.service_name.clone())
            })
            .collect();

        debug!("Found {} documents to unpublish", docs.len());
        docs
    }

    /// Record the documents on disk as the publish history.
    ///
    /// An empty scan leaves the history file untouched, for the same reason
    /// [`Documents::items_to_unpublish`] refuses to act on one. Returns the
    /// number of entries written, or `None` when nothing was written.
    pub async fn record_history(
        &self,
        history_file: &Path,
    ) -> Result<Option<usize>, DocumentsError> {
        if self.filesystem_documents.is_empty() {
            warn!(
                "No *.{} files found, unwilling to replace the history in {}",
                self.document_extension(),
                history_file.display()
            );
            return Ok(None);
        }

        let entries = history_from_documents(&self.items_to_publish());
        let count = entries.len();
        write_history(history_file, entries).await?;
        Ok(Some(count))
    }

    fn document_extension(&self) -> String {
        self.settings
            .as_ref()
            .map(|settings| settings.document_extension())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_EXTENSION.to_string())
    }

    fn root_directory_from_settings(&self) -> Option<PathBuf> {
        let root = self
            .settings
            .as_ref()
            .and_then(|settings| settings.root_directory.clone());
        if root.is_none() {
            info!("root_directory not defined in the settings");
        }
        root
    }

    fn history_file_from_settings(&self) -> Option<PathBuf> {
        let history_file = self
            .settings
            .as_ref()
            .and_then(|settings| settings.history_file.clone());
        if history_file.is_none() {
            info!("history_file not defined in the settings");
        }
        history_file
    }

    /// The services on the server named in the settings, as history entries
    /// with no known source path
    async fn history_from_server(
        &self,
        catalog: &dyn ServiceCatalog,
    ) -> Result<Option<Vec<HistoryEntry>>, DocumentsError> {
        let server_url = match self.server_url().await? {
            Some(url) => url,
            None => {
                info!("Unable to get services (no server_url is defined)");
                return Ok(None);
            }
        };

        let services = catalog.list_services(&server_url).await?;
        debug!("Found {} services at {}", services.len(), server_url);

        Ok(Some(
            services
                .into_iter()
                .map(|service| HistoryEntry::new(None, service.folder, service.name))
                .collect(),
        ))
    }

    /// `server_url` from the settings, else the URL in the connection file
    /// named by `server`
    async fn server_url(&self) -> Result<Option<String>, DocumentsError> {
        let settings = self.settings.as_deref();

        if let Some(url) = settings.and_then(|s| s.server_url.clone()) {
            return Ok(Some(url));
        }
        info!("server_url not defined in the settings");

        match settings.and_then(|s| s.server.as_deref()) {
            Some(connection_file) => Ok(service_url_from_connection_file(connection_file).await?),
            None => {
                info!("server not defined in the settings");
                Ok(None)
            }
        }
    }
}
