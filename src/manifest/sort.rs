//! Stable requirement sorting and manifest rewrite

use std::collections::HashSet;

use crate::parser::Requirement;

/// Sort order for requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Normalized package name
    #[default]
    Name,
    /// Original line position
    Location,
}

impl SortKey {
    /// Returns the string representation of the sort key
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Location => "location",
        }
    }
}

/// Stable sort; ties keep their manifest order
pub fn sort_requirements(requirements: &[Requirement], key: SortKey) -> Vec<&Requirement> {
    let mut sorted: Vec<&Requirement> = requirements.iter().collect();
    match key {
        SortKey::Name => sorted.sort_by_cached_key(|r| r.identity().to_lowercase()),
        SortKey::Location => sorted.sort_by_key(|r| r.line_number),
    }
    sorted
}

/// Rewrite manifest content with its requirement lines in sorted order
///
/// Comment, blank and option lines stay at their line positions; the lines
/// that held requirements are refilled with the sorted requirements' raw
/// lines. Comments therefore do not travel with the requirement they were
/// written above. The result always ends with a newline.
pub fn render_sorted(content: &str, requirements: &[Requirement], key: SortKey) -> String {
    let slots: HashSet<usize> = requirements.iter().map(|r| r.line_number).collect();
    let mut sorted = sort_requirements(requirements, key).into_iter();

    let mut output = String::with_capacity(content.len() + 1);
    for (index, line) in content.lines().enumerate() {
        let line = if slots.contains(&(index + 1)) {
            sorted.next().map(Requirement::to_line).unwrap_or(line)
        } else {
            line
        };
        output.push_str(line);
        output.push('\n');
    }
    output
}
