//! Errors that abort a manifest operation

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Requirements file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid requirement '{line}': {reason}")]
    InvalidRequirement { line: String, reason: String },

    #[error("Already required: {0}")]
    AlreadyRequired(String),

    #[error("No requirements found in {}", .0.display())]
    Empty(PathBuf),
}
