//! Requirement and installed-package listings

use anyhow::Result;

use crate::cli::format::{Widths, join_columns, location, package_line, requirement_line};
use crate::cli::{Context, Outcome, Printer};
use crate::manifest::{SortKey, sort_requirements};

/// Aligned `name[extras] spec` lines, sorted by name
///
/// With `show_location`, the install path of each requirement is appended.
pub fn list_requirements(context: &Context<'_>, show_location: bool, printer: &mut Printer<'_>) -> Result<Outcome> {
    let manifest = context.load_manifest()?;
    let installed = if show_location {
        Some(context.load_installed()?)
    } else {
        None
    };

    let sorted = sort_requirements(manifest.requirements(), SortKey::Name);
    let widths = Widths::of(sorted.iter().copied());

    for requirement in sorted {
        let mut line = requirement_line(requirement, widths, &printer.theme, !requirement.is_valid());
        if let Some(installed) = &installed {
            let package = installed.get(&requirement.normalized_name);
            let width = widths.name + 1 + widths.spec;
            line = join_columns(&line, width, &location(package, &printer.theme));
        }
        printer.println(line)?;
    }
    Ok(Outcome::Success)
}

/// Every installed package, sorted by name or by install location
pub fn list_packages(context: &Context<'_>, by_location: bool, printer: &mut Printer<'_>) -> Result<Outcome> {
    let installed = context.load_installed()?;
    if installed.is_empty() {
        let notice = printer.theme.notice.apply_to("No installed packages found.");
        printer.eprintln(notice)?;
        return Ok(Outcome::Success);
    }

    let packages = if by_location {
        installed.sorted_by_location()
    } else {
        installed.sorted_by_name()
    };
    for package in packages {
        printer.println(package_line(package, &printer.theme))?;
    }
    Ok(Outcome::Success)
}
