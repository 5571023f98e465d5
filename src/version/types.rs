//! Records shared by the version layer

use chrono::{DateTime, Utc};

use crate::parser::types::normalize_name;

/// A package installed in the inspected environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    /// Install path (site-packages directory or project checkout)
    pub location: String,
}

impl InstalledPackage {
    pub fn new(name: &str, version: &str, location: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            location: location.to_string(),
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// What the package index knows about a package
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemotePackageInfo {
    pub name: String,
    pub latest_version: String,
    pub summary: Option<String>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub home_page: Option<String>,
    /// Number of published releases, including the latest
    pub release_count: usize,
    /// Upload time of the first file of the latest release
    pub released_at: Option<DateTime<Utc>>,
}

/// Outcome of checking one requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Installed and every constraint holds
    Satisfied,
    /// Installed but a constraint fails
    Unsatisfied,
    /// Not installed at all
    NotInstalled,
    /// Cannot be decided (unparseable version, non-registry source, failed lookup)
    Unknown,
    /// Installed version is older than the latest release on the index
    Outdated,
}

impl Status {
    /// Returns the string representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Satisfied => "satisfied",
            Status::Unsatisfied => "unsatisfied",
            Status::NotInstalled => "not installed",
            Status::Unknown => "unknown",
            Status::Outdated => "outdated",
        }
    }
}
