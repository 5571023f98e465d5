//! Search, sort, duplicates and add

use anyhow::Result;
use tracing::info;

use crate::cli::format::{Widths, requirement_line};
use crate::cli::{Context, Outcome, Printer};
use crate::manifest::{
    AddOutcome, Manifest, SearchOptions, SortKey, add_requirements, find_duplicates, render_sorted,
};

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

/// Print matching requirements; no match is an issue
pub fn search(context: &Context<'_>, options: &SearchOptions, printer: &mut Printer<'_>) -> Result<Outcome> {
    let manifest = context.load_manifest()?;
    let found = crate::manifest::search(manifest.requirements(), options)?;

    if found.is_empty() {
        printer.error_label("No entries found with", &options.pattern)?;
        return Ok(Outcome::Issues(1));
    }

    let widths = Widths::of(found.iter().copied());
    for requirement in &found {
        printer.println(requirement_line(requirement, widths, &printer.theme, false))?;
    }
    let summary = format!(
        "\n{} {} {}.",
        printer.theme.notice.apply_to("Found"),
        printer.theme.number.apply_to(found.len()),
        printer.theme.notice.apply_to(plural(found.len(), "entry", "entries")),
    );
    printer.println(summary)?;
    Ok(Outcome::Success)
}

/// Rewrite the manifest with its requirements sorted
pub fn sort(context: &Context<'_>, key: SortKey, printer: &mut Printer<'_>) -> Result<Outcome> {
    let mut manifest = context.load_manifest()?;
    let sorted = render_sorted(manifest.content(), manifest.requirements(), key);

    if sorted == manifest.content() {
        info!("{} is already sorted by {}", manifest.path().display(), key.as_str());
        let notice = format!("Requirements file already sorted: {}", manifest.path().display());
        printer.println(printer.theme.notice.apply_to(notice))?;
        return Ok(Outcome::Success);
    }

    manifest.save(sorted)?;
    let notice = format!("Sorted requirements file: {}", manifest.path().display());
    printer.println(printer.theme.success.apply_to(notice))?;
    Ok(Outcome::Success)
}

/// Print every package required more than once; each group is an issue
pub fn duplicates(context: &Context<'_>, printer: &mut Printer<'_>) -> Result<Outcome> {
    let manifest = context.load_manifest()?;
    let groups = find_duplicates(manifest.requirements());

    if groups.is_empty() {
        printer.println(printer.theme.notice.apply_to("No duplicate requirements found."))?;
        return Ok(Outcome::Success);
    }

    let header = format!(
        "{} {} {}",
        printer.theme.notice.apply_to("Found"),
        printer.theme.number.apply_to(groups.len()),
        printer.theme.notice.apply_to(format!(
            "{} with duplicate entries:",
            plural(groups.len(), "requirement", "requirements")
        )),
    );
    printer.println(header)?;

    for group in &groups {
        let lines: Vec<String> = group.lines.iter().map(ToString::to_string).collect();
        let line = format!(
            "{} has {} entries (lines {})",
            printer.theme.name.apply_to(format!("{:>30}", group.name)),
            printer.theme.number.apply_to(group.count),
            lines.join(", ")
        );
        printer.println(line)?;
    }
    Ok(Outcome::from_count(groups.len()))
}

/// Add requirement lines, creating the manifest if needed
pub fn add(context: &Context<'_>, lines: &[String], printer: &mut Printer<'_>) -> Result<Outcome> {
    let mut manifest = Manifest::load_or_empty(&context.manifest_path)?;
    if !manifest.path().exists() {
        let notice = format!("Creating {}", manifest.path().display());
        printer.eprintln(printer.theme.notice.apply_to(notice))?;
    }

    let (content, outcomes) = add_requirements(manifest.content(), lines)?;
    manifest.save(content)?;

    for outcome in &outcomes {
        let label = match outcome {
            AddOutcome::Added(_) => "Added requirement",
            AddOutcome::Replaced { .. } => "Replaced requirement with",
        };
        let line = format!(
            "{}: {}",
            printer.theme.success.apply_to(label),
            printer.theme.name.apply_to(outcome.line())
        );
        printer.println(line)?;
    }
    Ok(Outcome::Success)
}
