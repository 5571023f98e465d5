//! Adding requirement lines to a manifest

use tracing::debug;

use crate::manifest::error::ManifestError;
use crate::parser::{LineKind, Requirement, RequirementsTxtParser, line_kind};

/// What happened to one added line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at the end of the manifest
    Added(String),
    /// Replaced an existing line for the same package
    Replaced { previous: String, line: String },
}

impl AddOutcome {
    pub fn line(&self) -> &str {
        match self {
            AddOutcome::Added(line) => line,
            AddOutcome::Replaced { line, .. } => line,
        }
    }
}

/// Same package, same extras, same constraints, same source
fn same_requirement(a: &Requirement, b: &Requirement) -> bool {
    a.extras == b.extras
        && a.constraints == b.constraints
        && a.source_kind == b.source_kind
        && a.location == b.location
        && a.revision == b.revision
}

/// Add `new_lines` to manifest `content`
///
/// Every line is validated first; if any of them is not a valid requirement
/// the whole operation fails and nothing changes. A line naming a package that
/// is already required with a different spec replaces the existing line in
/// place. A line identical to an existing requirement is rejected with
/// [`ManifestError::AlreadyRequired`].
pub fn add_requirements<S: AsRef<str>>(
    content: &str,
    new_lines: &[S],
) -> Result<(String, Vec<AddOutcome>), ManifestError> {
    let parser = RequirementsTxtParser::new();

    let additions = new_lines
        .iter()
        .map(|line| {
            let line = line.as_ref().trim();
            if line_kind(line) != LineKind::Requirement {
                return Err(ManifestError::InvalidRequirement {
                    line: line.to_string(),
                    reason: "not a requirement line".to_string(),
                });
            }
            let requirement = parser.parse_line(line, 0);
            match &requirement.error {
                Some(e) => Err(ManifestError::InvalidRequirement {
                    line: line.to_string(),
                    reason: e.to_string(),
                }),
                None => Ok(requirement),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let mut outcomes = Vec::with_capacity(additions.len());

    for addition in additions {
        let existing = lines.iter().enumerate().find_map(|(index, line)| {
            if line_kind(line) != LineKind::Requirement {
                return None;
            }
            let requirement = parser.parse_line(line, index + 1);
            (requirement.identity() == addition.identity()).then_some((index, requirement))
        });

        match existing {
            Some((_, requirement)) if same_requirement(&requirement, &addition) => {
                return Err(ManifestError::AlreadyRequired(requirement.display_line()));
            }
            Some((index, _)) => {
                debug!("Replacing line {}: {}", index + 1, lines[index]);
                let previous = std::mem::replace(&mut lines[index], addition.raw_line.clone());
                outcomes.push(AddOutcome::Replaced {
                    previous,
                    line: addition.raw_line,
                });
            }
            None => {
                debug!("Appending: {}", addition.raw_line);
                lines.push(addition.raw_line.clone());
                outcomes.push(AddOutcome::Added(addition.raw_line));
            }
        }
    }

    let mut output = lines.join("\n");
    output.push('\n');
    Ok((output, outcomes))
}
