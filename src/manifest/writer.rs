//! Atomic manifest rewrites

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::manifest::error::ManifestError;

/// Replace the file at `path` with `content`
///
/// The content is written to a temporary file in the same directory, which is
/// then renamed over the target. A crash mid-write leaves the original intact.
/// An existing file keeps its permissions.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), ManifestError> {
    let write_error = |source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }
    file.as_file().sync_all().map_err(write_error)?;

    debug!("Replacing {} via {}", path.display(), file.path().display());
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
