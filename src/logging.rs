//! Tracing subscriber setup
//!
//! Logs go to stderr, or to a file when one is configured. The filter comes
//! from `RUST_LOG` unless debug logging is forced.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "requirementz=warn";
const DEBUG_FILTER: &str = "requirementz=debug";
const DEFAULT_LOG_FILE_NAME: &str = "requirementz.log";

/// How the binary wants its logs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Force debug output regardless of `RUST_LOG`
    pub debug: bool,
    /// Write logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// Emit ANSI colors on stderr
    pub ansi: bool,
}

impl LogConfig {
    fn filter(&self) -> EnvFilter {
        if self.debug {
            EnvFilter::new(DEBUG_FILTER)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the log file when dropped, so the caller must
/// keep it alive until exit. Installing twice is a no-op.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let filter = config.filter();

    match &config.log_file {
        Some(path) => {
            let (dir, file_name) = split_log_path(path);
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .try_init()
                .ok()?;
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_ansi(config.ansi),
                )
                .with(filter)
                .try_init();
            None
        }
    }
}

fn split_log_path(path: &Path) -> (PathBuf, PathBuf) {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_NAME));
    (dir, file_name)
}
