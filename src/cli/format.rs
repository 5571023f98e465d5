//! Plain-text rendering of reports and records

use console::{Alignment, pad_str};

use crate::cli::theme::Theme;
use crate::parser::Requirement;
use crate::version::checker::{LookupFailure, Report};
use crate::version::evaluator::evaluate;
use crate::version::types::{InstalledPackage, RemotePackageInfo, Status};

const NAME_WIDTH: usize = 30;
const INSTALLED_WIDTH: usize = 13;
const REQUIRED_WIDTH: usize = 12;
const VERSION_WIDTH: usize = 12;
const INFO_WIDTH: usize = 76;
const INDENT: &str = "    ";

/// Visible width of a status line, used to align trailing columns
pub const STATUS_WIDTH: usize = 5 + 1 + NAME_WIDTH + 1 + INSTALLED_WIDTH + 1 + 1 + 1 + REQUIRED_WIDTH;

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Pad `left` to `width` visible columns (styles excluded) and append `right`
pub fn join_columns(left: &str, width: usize, right: &str) -> String {
    format!("{} {}", pad_str(left, width, Alignment::Left, None), right)
}

/// Widths needed to align `name[extras] spec` listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Widths {
    pub name: usize,
    pub spec: usize,
}

impl Widths {
    pub fn of<'a>(requirements: impl IntoIterator<Item = &'a Requirement>) -> Self {
        requirements
            .into_iter()
            .fold(Self::default(), |widths, requirement| Self {
                name: widths.name.max(requirement.name_with_extras().len()),
                spec: widths.spec.max(requirement.spec_string().len()),
            })
    }
}

/// `name[extras] spec` for registry requirements, the canonical line otherwise
pub fn requirement_line(requirement: &Requirement, widths: Widths, theme: &Theme, error: bool) -> String {
    if !requirement.is_valid() {
        return theme.error.apply_to(requirement.display_line()).to_string();
    }
    if !requirement.is_registry() {
        return theme.location.apply_to(requirement.display_line()).to_string();
    }

    let name_style = if error { &theme.error } else { &theme.name };
    let spec_style = if error { &theme.error } else { &theme.version };
    let name = name_style.apply_to(pad(&requirement.name_with_extras(), widths.name));
    let spec = requirement.spec_string();
    if spec.is_empty() && widths.spec == 0 {
        return name.to_string().trim_end().to_string();
    }
    format!("{} {}", name, spec_style.apply_to(pad(&spec, widths.spec)))
        .trim_end()
        .to_string()
}

/// Install path, or `(not installed)`
pub fn location(installed: Option<&InstalledPackage>, theme: &Theme) -> String {
    match installed {
        Some(package) => theme.location.apply_to(&package.location).to_string(),
        None => theme.dim.apply_to("(not installed)").to_string(),
    }
}

fn local_marker(report: &Report) -> &'static str {
    if report.is_unchecked() {
        return "?";
    }
    match report.status {
        Status::Satisfied | Status::Outdated if report.is_pinned() => " ",
        Status::Satisfied | Status::Outdated => "-",
        Status::Unsatisfied | Status::NotInstalled | Status::Unknown => "!",
    }
}

fn required_text(report: &Report) -> String {
    let requirement = &report.requirement;
    if let Some(error) = &requirement.error {
        return error.to_string();
    }
    if !requirement.is_registry() {
        return format!("({})", requirement.source_kind.as_str());
    }
    if requirement.constraints.is_empty() {
        return "installed".to_string();
    }
    requirement.spec_string()
}

/// One status line: label, name, installed version, marker, required spec
///
/// ```text
/// Error colr                           v. 0.7.5      ! >=0.7.6
/// Ok    requests                       v. 2.0.0      - installed
/// ```
pub fn status_line(report: &Report, theme: &Theme) -> String {
    let unchecked = report.is_unchecked();
    let error = report.has_issue() && !unchecked;

    let (label, label_style) = if unchecked {
        ("Skip", &theme.dim)
    } else if error {
        ("Error", &theme.error)
    } else {
        ("Ok", &theme.success)
    };

    let installed = match (&report.installed, report.requirement.is_valid()) {
        (_, false) => "invalid".to_string(),
        (Some(package), true) => format!("v. {}", package.version),
        (None, true) if unchecked => String::new(),
        (None, true) => "not installed".to_string(),
    };
    let installed_style = if report.installed.is_some() {
        &theme.version
    } else {
        &theme.error
    };

    let marker = local_marker(report);
    let marker_style = match marker {
        "-" => &theme.warning,
        "!" => &theme.error,
        _ => &theme.dim,
    };

    let name = if report.requirement.is_valid() {
        report.requirement.label().to_string()
    } else {
        report.requirement.raw_line.trim().to_string()
    };

    format!(
        "{} {} {} {} {}",
        label_style.apply_to(pad(label, 5)),
        (if error { &theme.error } else { &theme.name }).apply_to(pad(&name, NAME_WIDTH)),
        installed_style.apply_to(pad(&installed, INSTALLED_WIDTH)),
        marker_style.apply_to(marker),
        (if error { &theme.error } else { &theme.success })
            .apply_to(pad(&required_text(report), REQUIRED_WIDTH)),
    )
    .trim_end()
    .to_string()
}

/// The `pypi: <latest>` column of check-latest output
///
/// The marker compares the constraints against the latest release: ` ` when
/// the requirement pins it, `-` when it is allowed, `!` when it is excluded,
/// `?` when nothing is known.
pub fn latest_column(report: &Report, theme: &Theme) -> Option<String> {
    let (marker, text, style) = match (&report.remote, &report.remote_error) {
        (Some(info), _) => {
            let constraints = &report.requirement.constraints;
            let evaluation = evaluate(constraints, Some(&info.latest_version));
            match evaluation.status {
                Status::Satisfied
                    if constraints
                        .first()
                        .is_some_and(|c| c.version == info.latest_version) =>
                {
                    (" ", info.latest_version.clone(), &theme.success)
                }
                Status::Satisfied => ("-", info.latest_version.clone(), &theme.warning),
                Status::Unsatisfied => ("!", info.latest_version.clone(), &theme.error),
                _ => ("?", info.latest_version.clone(), &theme.dim),
            }
        }
        (None, Some(LookupFailure::NotFound)) => ("?", "not found".to_string(), &theme.error),
        (None, Some(LookupFailure::Failed(_))) => ("?", "unavailable".to_string(), &theme.error),
        (None, None) => return None,
    };
    Some(format!(
        "{} {}: {}",
        style.apply_to(marker),
        theme.label.apply_to("pypi"),
        style.apply_to(text)
    ))
}

/// `name  v. version  location` for installed-package listings
pub fn package_line(package: &InstalledPackage, theme: &Theme) -> String {
    format!(
        "{} v. {} {}",
        theme.name.apply_to(pad(&package.name, NAME_WIDTH)),
        theme.version.apply_to(pad(&package.version, VERSION_WIDTH)),
        theme.location.apply_to(&package.location),
    )
    .trim_end()
    .to_string()
}

/// Greedy word wrap; every line but the first is prefixed with `indent`
pub fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join(&format!("\n{indent}"))
}

/// Multi-line description of a package on the index
///
/// ```text
/// requests                       2.32.5     (+157 releases)
///     Python HTTP for Humans.
///     Author: Kenneth Reitz <me@kennethreitz.org>
///     Latest: 2.32.5 (released 2025-08-18) (installed: 2.31.0)
/// ```
pub fn info_block(info: &RemotePackageInfo, installed: Option<&InstalledPackage>, theme: &Theme) -> String {
    let mut lines = Vec::new();

    let other_releases = info.release_count.saturating_sub(1);
    let releases = if other_releases > 0 {
        format!(
            "(+{} {})",
            theme.number.apply_to(other_releases),
            if other_releases == 1 { "release" } else { "releases" }
        )
    } else {
        String::new()
    };
    lines.push(
        format!(
            "{} {} {}",
            theme.name.apply_to(pad(&info.name, NAME_WIDTH)),
            theme.version.apply_to(pad(&info.latest_version, 10)),
            releases
        )
        .trim_end()
        .to_string(),
    );

    if let Some(summary) = &info.summary {
        lines.push(format!(
            "{INDENT}{}",
            theme.notice.apply_to(wrap_text(summary, INFO_WIDTH, INDENT))
        ));
    }

    let author = info
        .author
        .as_ref()
        .map(|author| format!("{}: {}", theme.label.apply_to("Author"), theme.version.apply_to(author)));
    let email = info
        .author_email
        .as_ref()
        .map(|email| format!("<{}>", theme.version.apply_to(email)));
    match (author, email) {
        (Some(author), Some(email)) => lines.push(format!("{INDENT}{author} {email}")),
        (Some(text), None) | (None, Some(text)) => lines.push(format!("{INDENT}{text}")),
        (None, None) => {}
    }

    if let Some(home_page) = &info.home_page {
        lines.push(format!(
            "{INDENT}{}: {}",
            theme.label.apply_to("Homepage"),
            theme.version.apply_to(home_page)
        ));
    }

    let released = info
        .released_at
        .map(|at| format!(" (released {})", at.format("%Y-%m-%d")))
        .unwrap_or_default();
    let installed = match installed {
        None => format!("({})", theme.error.apply_to("not installed")),
        Some(package) if package.version == info.latest_version => {
            format!("({})", theme.success.apply_to("installed"))
        }
        Some(package) => format!(
            "({}: {})",
            theme.label.apply_to("installed"),
            theme.version.apply_to(&package.version)
        ),
    };
    lines.push(format!(
        "{INDENT}{}: {}{} {}",
        theme.label.apply_to("Latest"),
        theme.version.apply_to(&info.latest_version),
        released,
        installed
    ));

    lines.join("\n")
}
