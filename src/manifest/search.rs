//! Regex search over manifest requirements

use regex::{Regex, RegexBuilder};

use crate::manifest::error::ManifestError;
use crate::parser::Requirement;

/// Which part of a requirement a pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    /// The whole line as written
    #[default]
    RawLine,
    /// The package name, as written or normalized
    Name,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub pattern: String,
    pub ignore_case: bool,
    pub field: SearchField,
    /// Keep the requirements that do not match
    pub invert: bool,
}

impl SearchOptions {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }
}

/// A compiled search
#[derive(Debug)]
pub struct Matcher {
    regex: Regex,
    field: SearchField,
    invert: bool,
}

impl Matcher {
    pub fn new(options: &SearchOptions) -> Result<Self, ManifestError> {
        let regex = RegexBuilder::new(&options.pattern)
            .case_insensitive(options.ignore_case)
            .build()
            .map_err(|source| ManifestError::InvalidPattern {
                pattern: options.pattern.clone(),
                source,
            })?;
        Ok(Self {
            regex,
            field: options.field,
            invert: options.invert,
        })
    }

    pub fn is_match(&self, requirement: &Requirement) -> bool {
        let found = match self.field {
            SearchField::RawLine => self.regex.is_match(&requirement.raw_line),
            SearchField::Name => {
                self.regex.is_match(requirement.label())
                    || (!requirement.normalized_name.is_empty()
                        && self.regex.is_match(&requirement.normalized_name))
            }
        };
        found != self.invert
    }
}

/// Requirements matching `options`, in manifest order
pub fn search<'a>(
    requirements: &'a [Requirement],
    options: &SearchOptions,
) -> Result<Vec<&'a Requirement>, ManifestError> {
    let matcher = Matcher::new(options)?;
    Ok(requirements
        .iter()
        .filter(|requirement| matcher.is_match(requirement))
        .collect())
}
