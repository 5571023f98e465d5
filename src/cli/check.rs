//! check-installed and check-latest

use anyhow::Result;
use tracing::info;

use crate::cli::format::{STATUS_WIDTH, Widths, join_columns, latest_column, location, requirement_line, status_line};
use crate::cli::{Context, Outcome, Printer};
use crate::version::checker::{Report, compare, filter_issues};
use crate::version::fetch::fetch_remote_index;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Also compare against the latest release on the index
    pub latest: bool,
    /// Only print requirements with issues
    pub errors_only: bool,
    /// Count non-registry requirements as issues
    pub include_unchecked: bool,
    /// Print the requirement line instead of the status line
    pub spec_only: bool,
    /// Append the install location
    pub location: bool,
}

/// Print one line per requirement; the outcome counts the issues
pub async fn check(context: &Context<'_>, options: &CheckOptions, printer: &mut Printer<'_>) -> Result<Outcome> {
    let manifest = context.load_manifest()?;
    let installed = context.load_installed()?;

    let remote = if options.latest {
        Some(fetch_remote_index(context.index, manifest.registry_names(), context.fetch).await)
    } else {
        None
    };

    let reports = compare(manifest.requirements(), &installed, remote.as_ref());
    let issues = filter_issues(&reports, options.include_unchecked);
    info!("{} of {} requirements have issues", issues.len(), reports.len());

    let shown: Vec<&Report> = if options.errors_only {
        issues.clone()
    } else {
        reports.iter().collect()
    };

    if options.spec_only {
        let widths = Widths::of(shown.iter().map(|report| &report.requirement));
        for report in &shown {
            let error = report.has_issue() && !report.is_unchecked();
            printer.println(requirement_line(&report.requirement, widths, &printer.theme, error))?;
        }
        return Ok(Outcome::from_count(issues.len()));
    }

    for report in &shown {
        let mut line = status_line(report, &printer.theme);
        if options.latest
            && let Some(column) = latest_column(report, &printer.theme)
        {
            line = join_columns(&line, STATUS_WIDTH, &column);
        }
        if options.location {
            let width = if options.latest { 0 } else { STATUS_WIDTH };
            line = join_columns(&line, width, &location(report.installed.as_ref(), &printer.theme));
        }
        printer.println(line)?;
    }

    Ok(Outcome::from_count(issues.len()))
}
