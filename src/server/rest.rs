use super::{ServerError, ServiceCatalog, ServiceRef};
use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use tracing::debug;

/// Folders every server has that never hold published map documents
const BUILTIN_FOLDERS: &[&str] = &["System", "Utilities"];

/// Type of the services created from map documents
const MAP_SERVICE_TYPE: &str = "MapServer";

/// Service catalog backed by the server's REST services directory
#[derive(Debug, Clone, Default)]
pub struct RestServiceCatalog {
    client: reqwest::Client,
}

impl RestServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    async fn fetch_directory(&self, url: &str) -> Result<DirectoryResponse, ServerError> {
        debug!("Querying {}", url);
        let response: DirectoryResponse = self
            .client
            .get(url)
            .query(&[("f", "json")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.into_result()
    }
}

#[async_trait]
impl ServiceCatalog for RestServiceCatalog {
    async fn list_services(&self, server_url: &str) -> Result<Vec<ServiceRef>, ServerError> {
        let services_url = services_directory_url(server_url);
        collect_map_services(&services_url, |url| async move {
            self.fetch_directory(&url).await
        })
        .await
    }
}

/// Walk the services directory at `services_url`: the root listing, then
/// each non built-in folder, keeping the map services.
async fn collect_map_services<F, Fut>(
    services_url: &str,
    mut fetch: F,
) -> Result<Vec<ServiceRef>, ServerError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<DirectoryResponse, ServerError>>,
{
    let root = fetch(services_url.to_string()).await?;

    let mut services = map_services(&root);
    for folder in &root.folders {
        if BUILTIN_FOLDERS.contains(&folder.as_str()) {
            continue;
        }
        let listing = fetch(format!("{}/{}", services_url, folder)).await?;
        services.extend(map_services(&listing));
    }

    Ok(services)
}

/// A services directory listing
#[derive(Debug, Clone, Default, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    folders: Vec<String>,
    #[serde(default)]
    services: Vec<DirectoryService>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

impl DirectoryResponse {
    /// The listing, or the error the server reported in its place
    fn into_result(self) -> Result<Self, ServerError> {
        match self.error {
            Some(error) => Err(ServerError::Api {
                code: error.code,
                message: error.message,
            }),
            None => Ok(self),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DirectoryService {
    /// `Folder/Name` for services outside the root folder
    name: String,
    #[serde(rename = "type")]
    service_type: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    code: i64,
    #[serde(default)]
    message: String,
}

/// `{server}/rest/services`, accepting URLs that already point there
fn services_directory_url(server_url: &str) -> String {
    let base = server_url.trim_end_matches('/');
    let base = base.strip_suffix("/rest/services").unwrap_or(base);
    format!("{}/rest/services", base)
}

fn map_services(listing: &DirectoryResponse) -> Vec<ServiceRef> {
    listing
        .services
        .iter()
        .filter(|service| service.service_type == MAP_SERVICE_TYPE)
        .map(|service| match service.name.rsplit_once('/') {
            Some((folder, name)) => ServiceRef::new(Some(folder.to_string()), name),
            None => ServiceRef::new(None, service.name.clone()),
        })
        .collect()
}
