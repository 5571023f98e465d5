//! Remote lookups for a batch of packages
//!
//! Lookups run concurrently with staggered start times; a failure only
//! affects the package it belongs to.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use indexmap::IndexSet;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::{FETCH_STAGGER_DELAY_MS, FETCH_TIMEOUT_MS};
use crate::parser::types::normalize_name;
use crate::version::error::RegistryError;
use crate::version::registry::PackageIndex;
use crate::version::types::RemotePackageInfo;

/// Outcome of looking up one package
pub type RemoteLookup = Result<RemotePackageInfo, RegistryError>;

/// Remote lookups keyed by normalized package name
#[derive(Debug, Default)]
pub struct RemoteIndex {
    lookups: HashMap<String, RemoteLookup>,
}

impl RemoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, lookup: RemoteLookup) {
        self.lookups.insert(normalize_name(name), lookup);
    }

    /// Look up a package by any spelling of its name
    pub fn get(&self, name: &str) -> Option<&RemoteLookup> {
        self.lookups.get(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }
}

/// Timing knobs for a fetch batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay between starting consecutive requests
    pub stagger: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(FETCH_TIMEOUT_MS),
            stagger: Duration::from_millis(FETCH_STAGGER_DELAY_MS),
        }
    }
}

/// Fetch one package, bounded by the configured timeout
pub async fn fetch_one(
    index: &dyn PackageIndex,
    package_name: &str,
    options: FetchOptions,
) -> RemoteLookup {
    match timeout(options.timeout, index.fetch_latest(package_name)).await {
        Ok(result) => result,
        Err(_) => Err(RegistryError::Timeout {
            timeout_ms: options.timeout.as_millis() as u64,
        }),
    }
}

/// Fetch the latest release of every named package
///
/// Names are deduplicated by normalized form. Fetches are executed in
/// parallel with staggered start times to avoid rate limiting. Errors are
/// logged and stored per package; they never stop the batch.
pub async fn fetch_remote_index<'a, I>(
    index: &dyn PackageIndex,
    names: I,
    options: FetchOptions,
) -> RemoteIndex
where
    I: IntoIterator<Item = &'a str>,
{
    let names: IndexSet<String> = names.into_iter().map(normalize_name).collect();
    debug!("Fetching {} packages from the index", names.len());

    let futures = names.into_iter().enumerate().map(|(i, name)| {
        let delay = options.stagger * i as u32;
        async move {
            sleep(delay).await;
            let result = fetch_one(index, &name, options)
                .await
                .inspect_err(|e| match e {
                    RegistryError::NotFound(_) => debug!("Package not found on index: {}", name),
                    e => warn!("Failed to fetch {}: {}", name, e),
                });
            (name, result)
        }
    });

    let mut remote = RemoteIndex::new();
    for (name, result) in join_all(futures).await {
        remote.insert(&name, result);
    }
    remote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::registry::MockPackageIndex;

    fn info(name: &str, version: &str) -> RemotePackageInfo {
        RemotePackageInfo {
            name: name.to_string(),
            latest_version: version.to_string(),
            ..Default::default()
        }
    }

    fn fast() -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(5),
            stagger: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn fetch_remote_index_collects_results_per_package() {
        let mut index = MockPackageIndex::new();
        index
            .expect_fetch_latest()
            .withf(|name| name == "requests")
            .times(1)
            .returning(|_| Ok(info("requests", "2.32.0")));
        index
            .expect_fetch_latest()
            .withf(|name| name == "missing")
            .times(1)
            .returning(|name| Err(RegistryError::NotFound(name.to_string())));

        let remote = fetch_remote_index(&index, ["requests", "missing"], fast()).await;

        assert_eq!(remote.len(), 2);
        assert_eq!(
            remote.get("requests").unwrap().as_ref().unwrap().latest_version,
            "2.32.0"
        );
        assert!(matches!(
            remote.get("missing"),
            Some(Err(RegistryError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn fetch_remote_index_deduplicates_normalized_names() {
        let mut index = MockPackageIndex::new();
        index
            .expect_fetch_latest()
            .withf(|name| name == "foo-bar")
            .times(1)
            .returning(|_| Ok(info("foo-bar", "1.0")));

        let remote = fetch_remote_index(&index, ["Foo_Bar", "foo.bar", "foo-bar"], fast()).await;

        assert_eq!(remote.len(), 1);
        assert!(remote.get("FOO_BAR").is_some());
    }

    #[tokio::test]
    async fn fetch_remote_index_with_no_names_is_empty() {
        let index = MockPackageIndex::new();
        let remote = fetch_remote_index(&index, std::iter::empty::<&str>(), fast()).await;
        assert!(remote.is_empty());
    }
}
