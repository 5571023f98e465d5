//! Duplicate requirement detection

use indexmap::IndexMap;

use crate::parser::Requirement;

/// Requirements that refer to the same package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Name of the first occurrence, as written
    pub name: String,
    pub count: usize,
    /// Line numbers of every occurrence, ascending
    pub lines: Vec<usize>,
}

/// Group requirements by identity and keep the groups with more than one member
///
/// Groups come out in order of first occurrence.
pub fn find_duplicates(requirements: &[Requirement]) -> Vec<DuplicateGroup> {
    let mut groups: IndexMap<String, Vec<&Requirement>> = IndexMap::new();
    for requirement in requirements {
        groups
            .entry(requirement.identity())
            .or_default()
            .push(requirement);
    }

    groups
        .into_values()
        .filter(|members| members.len() > 1)
        .map(|members| {
            let mut lines: Vec<usize> = members.iter().map(|r| r.line_number).collect();
            lines.sort_unstable();
            DuplicateGroup {
                name: members[0].label().to_string(),
                count: members.len(),
                lines,
            }
        })
        .collect()
}
