use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// =============================================================================
// Defaults
// =============================================================================

/// Manifest read when no `--file` is given
pub const DEFAULT_FILE: &str = "requirements.txt";

/// Package index queried for latest releases
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org";

/// Interpreter used to list installed packages
pub const DEFAULT_PYTHON: &str = "python3";

// =============================================================================
// Time-related constants
// =============================================================================

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay between starting each fetch request to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Configuration file contents
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub index: IndexConfig,
    pub installed: InstalledConfig,
}

/// Package index settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexConfig {
    /// Base URL of a PyPI-compatible JSON API
    pub url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Delay between starting consecutive requests in milliseconds
    pub stagger_ms: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INDEX_URL.to_string(),
            timeout_ms: FETCH_TIMEOUT_MS,
            stagger_ms: FETCH_STAGGER_DELAY_MS,
        }
    }
}

/// Installed-package provider settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InstalledConfig {
    pub python: String,
    /// Only list packages of the active virtualenv
    pub local_only: bool,
}

impl Default for InstalledConfig {
    fn default() -> Self {
        Self {
            python: DEFAULT_PYTHON.to_string(),
            local_only: false,
        }
    }
}

/// Returns the path to the configuration file.
/// Uses $XDG_CONFIG_HOME/requirementz/config.json if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/requirementz/config.json,
/// or ./requirementz/config.json if neither is available.
pub fn config_path() -> PathBuf {
    config_path_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

fn config_path_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("requirementz").join("config.json")
}

/// Load the configuration file at the default location
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Load a configuration file
///
/// A missing file yields the defaults. So does a malformed one, after a
/// warning; a broken config never stops a run.
pub fn load_config_from(path: &Path) -> Config {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}", path.display());
            return Config::default();
        }
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    serde_json::from_str(&content)
        .inspect(|_| debug!("Loaded config from {}", path.display()))
        .unwrap_or_else(|e| {
            warn!("Ignoring malformed config file {}: {}", path.display(), e);
            Config::default()
        })
}
