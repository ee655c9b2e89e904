use crate::utils::{now_iso, HISTORY_SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One previously published service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Document the service was published from; unknown for services read
    /// back from the server
    #[serde(default)]
    pub source_path: Option<PathBuf>,

    /// Server folder, `None` for the root folder
    #[serde(default)]
    pub service_folder: Option<String>,

    pub service_name: String,
}

impl HistoryEntry {
    pub fn new(
        source_path: Option<PathBuf>,
        service_folder: Option<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            source_path,
            service_folder,
            service_name: service_name.into(),
        }
    }
}

/// The publish history file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishHistory {
    /// Schema version for future migrations
    pub schema_version: u32,

    /// When the history was last written
    pub updated_at: String,

    #[serde(default)]
    pub services: Vec<HistoryEntry>,
}

impl PublishHistory {
    pub fn new(services: Vec<HistoryEntry>) -> Self {
        Self {
            schema_version: HISTORY_SCHEMA_VERSION,
            updated_at: now_iso(),
            services,
        }
    }
}

impl Default for PublishHistory {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
