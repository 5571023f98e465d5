//! PyPI JSON API client

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::DEFAULT_INDEX_URL;
use crate::version::error::RegistryError;
use crate::version::registry::PackageIndex;
use crate::version::types::RemotePackageInfo;

/// PyPI registry client
pub struct PypiRegistry {
    client: Client,
    base_url: String,
}

impl Default for PypiRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_URL.to_string())
    }
}

impl PypiRegistry {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn package_url(&self, package_name: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package_name)
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
    #[serde(default)]
    releases: HashMap<String, Vec<PypiFile>>,
}

/// Package information from PyPI
#[derive(Debug, Deserialize)]
struct PypiInfo {
    name: String,
    /// Latest version (according to PyPI)
    version: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    author_email: Option<String>,
    #[serde(default)]
    home_page: Option<String>,
}

/// Uploaded file of a release
#[derive(Debug, Deserialize)]
struct PypiFile {
    #[serde(default)]
    upload_time_iso_8601: Option<DateTime<Utc>>,
}

/// PyPI fills unknown metadata with "UNKNOWN" or an empty string
fn known(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != "UNKNOWN")
}

impl From<PypiResponse> for RemotePackageInfo {
    fn from(response: PypiResponse) -> Self {
        let released_at = response
            .releases
            .get(&response.info.version)
            .and_then(|files| files.iter().filter_map(|f| f.upload_time_iso_8601).min());

        RemotePackageInfo {
            name: response.info.name,
            latest_version: response.info.version,
            summary: known(response.info.summary),
            author: known(response.info.author),
            author_email: known(response.info.author_email),
            home_page: known(response.info.home_page),
            release_count: response.releases.len(),
            released_at,
        }
    }
}

#[async_trait]
impl PackageIndex for PypiRegistry {
    async fn fetch_info(&self, package_name: &str) -> Result<RemotePackageInfo, RegistryError> {
        let url = self.package_url(package_name);
        debug!("Getting info for '{}' from: {}", package_name, url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !response.status().is_success() {
            return Err(RegistryError::InvalidResponse(format!(
                "PyPI API returned status {} for {}",
                response.status(),
                url
            )));
        }

        let pypi_response: PypiResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        debug!(
            "Found {} releases for package {} (latest {})",
            pypi_response.releases.len(),
            package_name,
            pypi_response.info.version
        );

        Ok(pypi_response.into())
    }
}
