//! Manifest file access and text operations
//!
//! # Modules
//!
//! - [`add`]: append or replace requirement lines after validating them
//! - [`duplicates`]: group requirements that name the same package
//! - [`search`]: regex search over raw lines or package names
//! - [`sort`]: stable sort and manifest rewrite
//! - [`writer`]: atomic file replacement
//! - [`error`]: fatal manifest errors

pub mod add;
pub mod duplicates;
pub mod error;
pub mod search;
pub mod sort;
pub mod writer;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::parser::{Requirement, RequirementsTxtParser};

pub use add::{AddOutcome, add_requirements};
pub use duplicates::{DuplicateGroup, find_duplicates};
pub use error::ManifestError;
pub use search::{SearchField, SearchOptions, search};
pub use sort::{SortKey, render_sorted, sort_requirements};
pub use writer::write_atomic;

/// A requirements file and its parsed requirements
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    content: String,
    requirements: Vec<Requirement>,
}

impl Manifest {
    /// Parse manifest content that did not come from disk
    pub fn from_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let content = content.into();
        let requirements = RequirementsTxtParser::new().parse(&content);
        Self {
            path: path.into(),
            content,
            requirements,
        }
    }

    /// Read and parse a manifest; a missing file is an error
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound(path.to_path_buf())
            } else {
                ManifestError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        debug!("Loaded {} ({} bytes)", path.display(), content.len());
        Ok(Self::from_content(path, content))
    }

    /// Read and parse a manifest; a missing file counts as empty
    pub fn load_or_empty(path: &Path) -> Result<Self, ManifestError> {
        match Self::load(path) {
            Err(ManifestError::NotFound(_)) => {
                debug!("{} does not exist yet", path.display());
                Ok(Self::from_content(path, String::new()))
            }
            result => result,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Every requirement line, in manifest order
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Names of the valid registry requirements, in manifest order
    pub fn registry_names(&self) -> Vec<&str> {
        self.requirements
            .iter()
            .filter(|r| r.is_valid() && r.is_registry())
            .map(|r| r.normalized_name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Fail with [`ManifestError::Empty`] when there is nothing to work on
    pub fn ensure_not_empty(&self) -> Result<&Self, ManifestError> {
        if self.is_empty() {
            return Err(ManifestError::Empty(self.path.clone()));
        }
        Ok(self)
    }

    /// Persist new content atomically and re-parse it
    pub fn save(&mut self, content: String) -> Result<(), ManifestError> {
        write_atomic(&self.path, &content)?;
        *self = Self::from_content(self.path.clone(), content);
        Ok(())
    }
}
