//! Installed-package enumeration

use std::collections::HashMap;
use std::process::Command;

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::{debug, info};

use crate::parser::types::normalize_name;
use crate::version::error::ProviderError;
use crate::version::types::InstalledPackage;

/// Trait for listing the packages installed in the inspected environment
#[cfg_attr(test, automock)]
pub trait InstalledProvider {
    /// List every installed package
    fn list_installed(&self) -> Result<Vec<InstalledPackage>, ProviderError>;
}

/// Lists installed packages with `python -m pip list --format=json --verbose`
pub struct PipProvider {
    python: String,
    local_only: bool,
}

impl PipProvider {
    pub fn new(python: String, local_only: bool) -> Self {
        Self { python, local_only }
    }

    fn args(&self) -> Vec<&'static str> {
        let mut args = vec![
            "-m",
            "pip",
            "list",
            "--format=json",
            "--verbose",
            "--disable-pip-version-check",
        ];
        if self.local_only {
            args.push("--local");
        }
        args
    }
}

impl InstalledProvider for PipProvider {
    fn list_installed(&self) -> Result<Vec<InstalledPackage>, ProviderError> {
        let args = self.args();
        debug!("Loading package list: {} {}", self.python, args.join(" "));

        let output = Command::new(&self.python)
            .args(&args)
            .output()
            .map_err(|source| ProviderError::Spawn {
                program: self.python.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProviderError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let packages = parse_pip_list(&String::from_utf8_lossy(&output.stdout))?;
        info!("Packages loaded: {}", packages.len());
        Ok(packages)
    }
}

/// One entry of `pip list --format=json --verbose`
#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: String,
    version: String,
    #[serde(default)]
    location: Option<String>,
    /// Set for editable installs on recent pip versions
    #[serde(default)]
    editable_project_location: Option<String>,
}

/// Parse the JSON printed by `pip list --format=json`
pub fn parse_pip_list(json: &str) -> Result<Vec<InstalledPackage>, ProviderError> {
    let entries: Vec<PipListEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|entry| InstalledPackage {
            name: entry.name,
            version: entry.version,
            location: entry
                .editable_project_location
                .or(entry.location)
                .unwrap_or_default(),
        })
        .collect())
}

/// Installed packages keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct InstalledIndex {
    packages: HashMap<String, InstalledPackage>,
}

impl InstalledIndex {
    pub fn new(packages: Vec<InstalledPackage>) -> Self {
        let packages = packages
            .into_iter()
            .map(|package| (package.normalized_name(), package))
            .collect();
        Self { packages }
    }

    /// Load the index from a provider
    pub fn load(provider: &dyn InstalledProvider) -> Result<Self, ProviderError> {
        Ok(Self::new(provider.list_installed()?))
    }

    /// Look up a package by any spelling of its name
    pub fn get(&self, name: &str) -> Option<&InstalledPackage> {
        self.packages.get(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All packages, sorted by normalized name
    pub fn sorted_by_name(&self) -> Vec<&InstalledPackage> {
        let mut packages: Vec<_> = self.packages.iter().collect();
        packages.sort_by(|(a, _), (b, _)| a.cmp(b));
        packages.into_iter().map(|(_, package)| package).collect()
    }

    /// All packages, sorted by location and then by name
    pub fn sorted_by_location(&self) -> Vec<&InstalledPackage> {
        let mut packages = self.sorted_by_name();
        packages.sort_by(|a, b| a.location.cmp(&b.location));
        packages
    }
}
