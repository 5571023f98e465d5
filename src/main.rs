use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use requirementz::cli::{self as app, CheckOptions, Context, Mode, Outcome, Printer, Theme};
use requirementz::config::{self, DEFAULT_FILE};
use requirementz::logging::{self, LogConfig};
use requirementz::manifest::{SearchField, SearchOptions, SortKey};
use requirementz::version::fetch::FetchOptions;
use requirementz::version::installed::PipProvider;
use requirementz::version::registries::PypiRegistry;
use tracing::debug;

/// requirementz - check a requirements.txt against installed packages
///
/// Checks requirements against installed versions and the latest releases on
/// PyPI, shows index information for packages, and searches, sorts or
/// de-duplicates a requirements.txt.
///
/// Examples:
///   requirementz                 # Check every requirement against installed packages
///   requirementz -C -e           # Show only requirements that are broken or outdated
///   requirementz -a 'requests>=2.32'
#[derive(Parser, Debug)]
#[command(name = "requirementz", version, about)]
#[command(group(
    ArgGroup::new("mode")
        .args(["add", "check", "check_latest", "duplicates", "list", "packages", "pypi", "search", "sort", "package"])
        .multiple(false)
))]
struct Cli {
    /// Add requirement lines to the requirements file
    #[arg(short = 'a', long, value_name = "LINE", num_args = 1..)]
    add: Vec<String>,

    /// Check installed requirement versions (the default)
    #[arg(short = 'c', long)]
    check: bool,

    /// Check installed requirement versions and the latest versions on the index
    #[arg(short = 'C', long = "check-latest")]
    check_latest: bool,

    /// List duplicate requirements
    #[arg(short = 'd', long)]
    duplicates: bool,

    /// List requirements
    #[arg(short = 'l', long)]
    list: bool,

    /// List installed packages
    #[arg(short = 'p', long)]
    packages: bool,

    /// Show index information for every package in the requirements file
    #[arg(short = 'P', long)]
    pypi: bool,

    /// Search requirements for a regex pattern
    #[arg(short = 's', long, value_name = "PATTERN")]
    search: Option<String>,

    /// Sort the requirements file by package name (by line position with --location)
    #[arg(short = 'S', long)]
    sort: bool,

    /// Show index information for these packages
    #[arg(value_name = "PACKAGE")]
    package: Vec<String>,

    /// Only show requirements with issues
    #[arg(short = 'e', long, conflicts_with_all = ["add", "duplicates", "list", "packages", "pypi", "search", "sort", "package"])]
    errors: bool,

    /// Count local, VCS and URL requirements as issues
    #[arg(long, conflicts_with_all = ["add", "duplicates", "list", "packages", "pypi", "search", "sort", "package"])]
    include_unchecked: bool,

    /// Print requirement lines instead of status lines
    #[arg(short = 'r', long, conflicts_with_all = ["add", "duplicates", "list", "packages", "pypi", "search", "sort", "package"])]
    requirement: bool,

    /// Show install locations
    #[arg(short = 'L', long, conflicts_with_all = ["add", "duplicates", "pypi", "search", "package"])]
    location: bool,

    /// Case-insensitive search
    #[arg(short = 'i', long, requires = "search")]
    ignore_case: bool,

    /// Search package names instead of whole lines
    #[arg(long, requires = "search")]
    name_only: bool,

    /// Show requirements that do not match the search pattern
    #[arg(long, requires = "search")]
    invert: bool,

    /// Requirements file to use
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Base URL of the package index
    #[arg(long, env = "REQUIREMENTZ_INDEX_URL", value_name = "URL")]
    index_url: Option<String>,

    /// Python interpreter used to list installed packages
    #[arg(long, value_name = "PATH")]
    python: Option<String>,

    /// Only list packages installed in the active virtualenv
    #[arg(long)]
    local: bool,

    /// Show debug logs
    #[arg(short = 'D', long)]
    debug: bool,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Disable colors
    #[arg(short = 'n', long = "no-color")]
    no_color: bool,
}

impl Cli {
    fn log_config(&self) -> LogConfig {
        LogConfig {
            debug: self.debug,
            log_file: self.log_file.clone(),
            ansi: !self.no_color,
        }
    }

    fn mode(&self) -> Mode {
        if !self.add.is_empty() {
            Mode::Add(self.add.clone())
        } else if self.duplicates {
            Mode::Duplicates
        } else if self.list {
            Mode::ListRequirements {
                location: self.location,
            }
        } else if self.packages {
            Mode::ListPackages {
                location: self.location,
            }
        } else if let Some(pattern) = &self.search {
            Mode::Search(SearchOptions {
                pattern: pattern.clone(),
                ignore_case: self.ignore_case,
                field: if self.name_only {
                    SearchField::Name
                } else {
                    SearchField::RawLine
                },
                invert: self.invert,
            })
        } else if self.pypi {
            Mode::Info { names: Vec::new() }
        } else if !self.package.is_empty() {
            Mode::Info {
                names: self.package.clone(),
            }
        } else if self.sort {
            Mode::Sort(if self.location {
                SortKey::Location
            } else {
                SortKey::Name
            })
        } else {
            if !self.check && !self.check_latest {
                debug!("No mode flag given, checking installed versions");
            }
            Mode::Check(CheckOptions {
                latest: self.check_latest,
                errors_only: self.errors,
                include_unchecked: self.include_unchecked,
                spec_only: self.requirement,
                location: self.location,
            })
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    let config = config::load_config();

    let theme = if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
        Theme::plain()
    } else {
        Theme::new()
    };

    let index_url = cli.index_url.clone().unwrap_or(config.index.url);
    let registry = PypiRegistry::new(index_url);
    let provider = PipProvider::new(
        cli.python.clone().unwrap_or(config.installed.python),
        cli.local || config.installed.local_only,
    );
    let context = Context {
        manifest_path: cli.file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_FILE)),
        installed: &provider,
        index: &registry,
        fetch: FetchOptions {
            timeout: Duration::from_millis(config.index.timeout_ms),
            stagger: Duration::from_millis(config.index.stagger_ms),
        },
    };

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let mut printer = Printer::new(&mut out, &mut err, theme);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(app::run(&context, cli.mode(), &mut printer))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log_config());

    debug!("requirementz starting with args: {:?}", cli);

    match run(&cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            let style = if cli.no_color {
                Theme::plain().error
            } else {
                Theme::new().error
            };
            eprintln!("{}", style.apply_to(format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}
