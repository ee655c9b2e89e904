use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Document extension searched for when the settings do not name one
pub const DEFAULT_DOCUMENT_EXTENSION: &str = "mxd";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Publisher settings.
///
/// Every field is optional. A missing field is never an error; callers fall
/// back to the next source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Folder searched for map documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<PathBuf>,

    /// JSON file holding the services published on previous runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,

    /// Base URL of the map server, e.g. `https://host/arcgis`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Server connection file (`*.ags`), used when `server_url` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<PathBuf>,

    /// Extension of the map documents, with or without the leading dot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_extension: Option<String>,
}

impl Settings {
    /// The document extension, lowercase and without a leading dot.
    pub fn document_extension(&self) -> String {
        self.document_extension
            .as_deref()
            .map(|ext| ext.trim().trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .unwrap_or(DEFAULT_DOCUMENT_EXTENSION)
            .to_lowercase()
    }
}

/// Read the settings file
pub async fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).await?;
    let settings: Settings = serde_json::from_str(&content)?;
    Ok(settings)
}

/// Write the settings file
pub async fn write_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_settings() {
        let json = r#"{
            "rootDirectory": "/data/maps",
            "historyFile": "/data/history.json",
            "serverUrl": "https://maps.example.com/arcgis"
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.root_directory, Some(PathBuf::from("/data/maps")));
        assert_eq!(
            settings.history_file,
            Some(PathBuf::from("/data/history.json"))
        );
        assert_eq!(
            settings.server_url.as_deref(),
            Some("https://maps.example.com/arcgis")
        );
        assert!(settings.server.is_none());
    }

    #[test]
    fn test_empty_settings_are_valid() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_document_extension_defaults_to_mxd() {
        assert_eq!(Settings::default().document_extension(), "mxd");

        let settings = Settings {
            document_extension: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.document_extension(), "mxd");
    }

    #[test]
    fn test_document_extension_is_normalized() {
        let settings = Settings {
            document_extension: Some(".LYR".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.document_extension(), "lyr");
    }

    #[tokio::test]
    async fn test_write_then_read_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            root_directory: Some(PathBuf::from("maps")),
            server: Some(PathBuf::from("server.ags")),
            ..Default::default()
        };

        write_settings(&path, &settings).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("rootDirectory"));
        assert!(!content.contains("serverUrl"));

        assert_eq!(read_settings(&path).await.unwrap(), settings);
    }
}
