//! Temporary manifests and command runners

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A requirements.txt inside its own temporary directory
pub struct TempManifest {
    dir: TempDir,
}

impl TempManifest {
    pub fn new(content: &str) -> Self {
        let manifest = Self::missing();
        std::fs::write(manifest.path(), content).unwrap();
        manifest
    }

    /// A directory without a requirements.txt yet
    pub fn missing() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("requirements.txt")
    }

    pub fn read(&self) -> String {
        std::fs::read_to_string(self.path()).unwrap()
    }

    /// The binary, pointed at this manifest with colors off and an isolated
    /// config directory
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("requirementz").unwrap();
        cmd.env("XDG_CONFIG_HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .arg("-f")
            .arg(self.path());
        cmd
    }
}
