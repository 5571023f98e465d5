//! Mode handlers and terminal presentation
//!
//! Each mode loads what it needs through a [`Context`], prints through a
//! [`Printer`] and returns an [`Outcome`] that the binary turns into an exit
//! code. Fatal conditions are returned as errors.
//!
//! # Modules
//!
//! - [`check`]: check-installed and check-latest
//! - [`list`]: requirement and installed-package listings
//! - [`info`]: package index information
//! - [`edit`]: search, sort, duplicates and add
//! - [`format`]: line and block rendering
//! - [`theme`]: terminal styles

pub mod check;
pub mod edit;
pub mod format;
pub mod info;
pub mod list;
pub mod theme;

use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use tracing::debug;

use crate::manifest::{Manifest, ManifestError, SearchOptions, SortKey};
use crate::version::fetch::FetchOptions;
use crate::version::installed::{InstalledIndex, InstalledProvider};
use crate::version::registry::PackageIndex;

pub use check::CheckOptions;
pub use theme::Theme;

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Compare requirements with installed packages (and the index with `latest`)
    Check(CheckOptions),
    /// List manifest requirements
    ListRequirements { location: bool },
    /// List installed packages
    ListPackages { location: bool },
    /// Show index information; manifest packages when `names` is empty
    Info { names: Vec<String> },
    Search(SearchOptions),
    Sort(SortKey),
    Duplicates,
    /// Add requirement lines to the manifest
    Add(Vec<String>),
}

/// Result of a mode that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Something worth a non-zero exit: issues, duplicates, failed lookups
    Issues(usize),
}

impl Outcome {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            Outcome::Success
        } else {
            Outcome::Issues(count)
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Issues(_) => 1,
        }
    }
}

/// Collaborators shared by every mode
pub struct Context<'a> {
    pub manifest_path: PathBuf,
    pub installed: &'a dyn InstalledProvider,
    pub index: &'a dyn PackageIndex,
    pub fetch: FetchOptions,
}

impl Context<'_> {
    /// Load the manifest; an empty one is [`ManifestError::Empty`]
    pub fn load_manifest(&self) -> Result<Manifest, ManifestError> {
        let manifest = Manifest::load(&self.manifest_path)?;
        manifest.ensure_not_empty()?;
        Ok(manifest)
    }

    pub fn load_installed(&self) -> anyhow::Result<InstalledIndex> {
        InstalledIndex::load(self.installed).context("Failed to list installed packages")
    }
}

/// Output sinks plus the theme used to style them
pub struct Printer<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    pub theme: Theme,
}

impl<'a> Printer<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write, theme: Theme) -> Self {
        Self { out, err, theme }
    }

    /// Write a line of regular output
    pub fn println(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }

    /// Write a notice or error line to the error stream
    pub fn eprintln(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.err, "{line}")
    }

    /// `label: value` on the error stream
    pub fn error_label(&mut self, label: &str, value: impl Display) -> io::Result<()> {
        let line = format!(
            "{}: {}",
            self.theme.error.apply_to(label),
            self.theme.name.apply_to(value)
        );
        self.eprintln(line)
    }
}

/// Run one mode
///
/// An empty manifest is not an error: a notice is printed and the run succeeds.
pub async fn run(context: &Context<'_>, mode: Mode, printer: &mut Printer<'_>) -> anyhow::Result<Outcome> {
    debug!("Running {:?} on {}", mode, context.manifest_path.display());

    let result = match mode {
        Mode::Check(options) => check::check(context, &options, printer).await,
        Mode::ListRequirements { location } => list::list_requirements(context, location, printer),
        Mode::ListPackages { location } => list::list_packages(context, location, printer),
        Mode::Info { names } => info::show_info(context, &names, printer).await,
        Mode::Search(options) => edit::search(context, &options, printer),
        Mode::Sort(key) => edit::sort(context, key, printer),
        Mode::Duplicates => edit::duplicates(context, printer),
        Mode::Add(lines) => edit::add(context, &lines, printer),
    };

    if let Err(e) = &result
        && let Some(ManifestError::Empty(path)) = e.downcast_ref::<ManifestError>()
    {
        let notice = printer
            .theme
            .notice
            .apply_to(format!("No requirements found in {}", path.display()));
        printer.eprintln(notice)?;
        return Ok(Outcome::Success);
    }
    result
}
