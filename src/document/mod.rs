use crate::config::Settings;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Characters a service name may not contain
static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));

/// A map document that can be published as (or unpublished from) a service.
#[derive(Debug, Clone)]
pub struct Doc {
    source_path: Option<PathBuf>,
    folder: Option<String>,
    name: String,
    settings: Option<Arc<Settings>>,
}

impl Doc {
    /// Wrap a document found at `path`, published into `folder` on the server.
    ///
    /// The service name is derived from the file stem. A document with no
    /// source path (a service only known to the server) has an empty name
    /// until [`Doc::with_service_name`] sets one.
    pub fn new(
        path: Option<PathBuf>,
        folder: Option<String>,
        settings: Option<Arc<Settings>>,
    ) -> Self {
        let name = path
            .as_deref()
            .map(service_name_for_path)
            .unwrap_or_default();

        Self {
            source_path: path,
            folder,
            name,
            settings,
        }
    }

    /// Use an explicit service name instead of the one derived from the path
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_deref()
    }

    /// `folder/name`, or just `name` for documents in the root folder
    pub fn service_path(&self) -> String {
        match &self.folder {
            Some(folder) => format!("{}/{}", folder, self.name),
            None => self.name.clone(),
        }
    }

    /// REST endpoint of the map service, when the server URL is known
    pub fn service_url(&self) -> Option<String> {
        let server_url = self.settings.as_ref()?.server_url.as_deref()?;
        Some(format!(
            "{}/rest/services/{}/MapServer",
            server_url.trim_end_matches('/'),
            self.service_path()
        ))
    }
}

/// Service name for a document: its file stem with unsupported characters
/// replaced by underscores.
pub fn service_name_for_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    INVALID_NAME_CHARS.replace_all(stem.trim(), "_").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_file_stem() {
        let doc = Doc::new(Some(PathBuf::from("/maps/Parks.mxd")), None, None);
        assert_eq!(doc.name(), "Parks");
        assert_eq!(doc.service_path(), "Parks");
        assert!(doc.folder().is_none());
    }

    #[test]
    fn test_name_replaces_invalid_characters() {
        let doc = Doc::new(
            Some(PathBuf::from("/maps/Trails 2024-final.mxd")),
            Some("Recreation".to_string()),
            None,
        );
        assert_eq!(doc.name(), "Trails_2024_final");
        assert_eq!(doc.service_path(), "Recreation/Trails_2024_final");
    }

    #[test]
    fn test_explicit_service_name() {
        let doc = Doc::new(None, Some("Base".to_string()), None).with_service_name("Roads");
        assert!(doc.source_path().is_none());
        assert_eq!(doc.service_path(), "Base/Roads");
    }

    #[test]
    fn test_service_url_requires_server_url() {
        let doc = Doc::new(Some(PathBuf::from("/maps/a.mxd")), None, None);
        assert!(doc.service_url().is_none());

        let settings = Arc::new(Settings {
            server_url: Some("https://maps.example.com/arcgis/".to_string()),
            ..Default::default()
        });
        let doc = Doc::new(
            Some(PathBuf::from("/maps/a.mxd")),
            Some("Sub".to_string()),
            Some(settings),
        );
        assert_eq!(
            doc.service_url().as_deref(),
            Some("https://maps.example.com/arcgis/rest/services/Sub/a/MapServer")
        );
    }
}
