use std::path::{Path, PathBuf};

/// Current history file schema version
pub const HISTORY_SCHEMA_VERSION: u32 = 1;

/// Get current timestamp in ISO 8601 format
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Path of the temporary file used for an atomic write of `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Case-insensitive extension check; `extension` has no leading dot
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_extension_ignores_case() {
        assert!(has_extension(Path::new("/maps/a.mxd"), "mxd"));
        assert!(has_extension(Path::new("/maps/b.MXD"), "mxd"));
        assert!(!has_extension(Path::new("/maps/c.txt"), "mxd"));
        assert!(!has_extension(Path::new("/maps/mxd"), "mxd"));
    }

    #[test]
    fn test_temp_path_keeps_directory() {
        let temp = temp_path_for(Path::new("/var/lib/history.json"));
        assert_eq!(temp, PathBuf::from("/var/lib/history.json.tmp"));
    }

    #[test]
    fn test_now_iso_is_rfc3339() {
        assert!(chrono::DateTime::parse_from_rfc3339(&now_iso()).is_ok());
    }
}
