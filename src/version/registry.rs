//! Package index trait for fetching release information

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;
use crate::version::types::RemotePackageInfo;

/// Trait for looking up packages on a remote index
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageIndex: Send + Sync {
    /// Fetches everything the index knows about a package
    ///
    /// # Returns
    /// * `Ok(RemotePackageInfo)` - Package metadata including the latest version
    /// * `Err(RegistryError::NotFound)` - The index has no such package
    /// * `Err(RegistryError)` - Any other failure
    async fn fetch_info(&self, package_name: &str) -> Result<RemotePackageInfo, RegistryError>;

    /// Fetches the latest release of a package
    ///
    /// Fails with `InvalidResponse` when the index reports no version at all.
    async fn fetch_latest(&self, package_name: &str) -> Result<RemotePackageInfo, RegistryError> {
        let info = self.fetch_info(package_name).await?;
        if info.latest_version.is_empty() {
            return Err(RegistryError::InvalidResponse(format!(
                "No version info found for {}",
                package_name
            )));
        }
        Ok(info)
    }
}
