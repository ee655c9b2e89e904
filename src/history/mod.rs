mod types;

pub use types::{HistoryEntry, PublishHistory};

use crate::document::Doc;
use crate::utils::temp_path_for;
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Read the services recorded in a history file.
///
/// A missing file is the first run and yields an empty history.
pub async fn read_history(path: &Path) -> Result<Vec<HistoryEntry>, HistoryError> {
    if !path.exists() {
        debug!("History file {} does not exist yet", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).await?;
    let history: PublishHistory = serde_json::from_str(&content)?;
    debug!(
        "Read {} history entries from {}",
        history.services.len(),
        path.display()
    );
    Ok(history.services)
}

/// Write the history file atomically using temp file + rename
pub async fn write_history(path: &Path, services: Vec<HistoryEntry>) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let history = PublishHistory::new(services);
    let content = serde_json::to_string_pretty(&history)?;
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, path).await?;

    debug!(
        "Wrote {} history entries to {}",
        history.services.len(),
        path.display()
    );
    Ok(())
}

/// History entries describing a set of published documents
pub fn history_from_documents<'a>(docs: impl IntoIterator<Item = &'a Doc>) -> Vec<HistoryEntry> {
    docs.into_iter()
        .map(|doc| {
            HistoryEntry::new(
                doc.source_path().map(Path::to_path_buf),
                doc.folder().map(str::to_string),
                doc.name(),
            )
        })
        .collect()
}
