//! Fake package index and installed provider

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use requirementz::version::error::{ProviderError, RegistryError};
use requirementz::version::installed::InstalledProvider;
use requirementz::version::registry::PackageIndex;
use requirementz::version::types::{InstalledPackage, RemotePackageInfo};

/// In-memory package index
///
/// Unknown packages are `NotFound`; packages registered with
/// [`FakeIndex::with_failure`] fail with an invalid response.
#[derive(Default)]
pub struct FakeIndex {
    packages: HashMap<String, RemotePackageInfo>,
    failing: Vec<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latest(mut self, name: &str, version: &str) -> Self {
        self.packages.insert(
            name.to_string(),
            RemotePackageInfo {
                name: name.to_string(),
                latest_version: version.to_string(),
                release_count: 1,
                ..Default::default()
            },
        );
        self
    }

    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    /// Delay every response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageIndex for FakeIndex {
    async fn fetch_info(&self, package_name: &str) -> Result<RemotePackageInfo, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.iter().any(|name| name == package_name) {
            return Err(RegistryError::InvalidResponse("HTTP 503".to_string()));
        }
        self.packages
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}

/// Fixed list of installed packages
#[derive(Default)]
pub struct FakeInstalled {
    packages: Vec<InstalledPackage>,
}

impl FakeInstalled {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: &str, version: &str) -> Self {
        self.packages
            .push(InstalledPackage::new(name, version, "/venv/lib/site-packages"));
        self
    }
}

impl InstalledProvider for FakeInstalled {
    fn list_installed(&self) -> Result<Vec<InstalledPackage>, ProviderError> {
        Ok(self.packages.clone())
    }
}
