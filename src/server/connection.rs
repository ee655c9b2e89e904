use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// First server URL in a connection file. Connection files are binary with
/// the URL stored as UTF-8 or UTF-16LE text.
static SERVER_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>\x00-\x1F\x{FFFD}]+?/arcgis\b"#).expect("valid regex")
});

/// Read the server URL out of a connection file (`*.ags`).
///
/// Returns `Ok(None)` when the file holds no recognizable URL.
pub async fn service_url_from_connection_file(
    path: &Path,
) -> Result<Option<String>, std::io::Error> {
    let bytes = fs::read(path).await?;
    let url = service_url_from_bytes(&bytes);

    match &url {
        Some(url) => debug!("Found server {} in {}", url, path.display()),
        None => debug!("No server URL in connection file {}", path.display()),
    }

    Ok(url)
}

/// Find the server URL in the raw contents of a connection file
pub fn service_url_from_bytes(bytes: &[u8]) -> Option<String> {
    let utf8 = String::from_utf8_lossy(bytes);
    if let Some(found) = SERVER_URL.find(&utf8) {
        return Some(found.as_str().to_string());
    }

    // The UTF-16 text may start at either byte alignment
    [0, 1]
        .into_iter()
        .filter_map(|offset| bytes.get(offset..))
        .find_map(find_in_utf16le)
}

fn find_in_utf16le(bytes: &[u8]) -> Option<String> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let utf16 = String::from_utf16_lossy(&units);
    SERVER_URL
        .find(&utf16)
        .map(|found| found.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
    }

    #[test]
    fn test_url_in_plain_text() {
        let bytes = b"\x01\x02garbage https://maps.example.com:6443/arcgis/admin \x00";
        assert_eq!(
            service_url_from_bytes(bytes).as_deref(),
            Some("https://maps.example.com:6443/arcgis")
        );
    }

    #[test]
    fn test_url_in_utf16_text() {
        let mut bytes = vec![0xFF, 0xFE, 0x03, 0x00];
        bytes.extend(utf16le("http://gis.example.org/arcgis/services"));
        bytes.extend([0x00, 0x00, 0x7F, 0x12]);

        assert_eq!(
            service_url_from_bytes(&bytes).as_deref(),
            Some("http://gis.example.org/arcgis")
        );
    }

    #[test]
    fn test_url_in_utf16_text_at_odd_offset() {
        let mut bytes = vec![0x07];
        bytes.extend(utf16le("http://gis.example.org/arcgis/services"));
        bytes.extend([0x00, 0x00]);

        assert_eq!(
            service_url_from_bytes(&bytes).as_deref(),
            Some("http://gis.example.org/arcgis")
        );
    }

    #[test]
    fn test_no_url() {
        assert!(service_url_from_bytes(b"no server here").is_none());
        assert!(service_url_from_bytes(b"").is_none());
    }

    #[tokio::test]
    async fn test_missing_connection_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = service_url_from_connection_file(&dir.path().join("missing.ags")).await;
        assert!(result.is_err());
    }
}
