//! Common types for the requirements parser

use std::collections::BTreeSet;
use std::fmt;

use crate::parser::error::ParseError;

/// Comparison operator of a version constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `~=` (compatible release)
    Compatible,
    /// `===` (arbitrary string equality)
    Identical,
}

impl Operator {
    /// Returns the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::Compatible => "~=",
            Operator::Identical => "===",
        }
    }
}

impl std::str::FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            ">=" => Ok(Operator::GreaterEqual),
            "<=" => Ok(Operator::LessEqual),
            ">" => Ok(Operator::Greater),
            "<" => Ok(Operator::Less),
            "~=" => Ok(Operator::Compatible),
            "===" => Ok(Operator::Identical),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(operator, version)` restriction
///
/// The version is kept as written so the constraint renders back the way the
/// manifest spells it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub operator: Operator,
    pub version: String,
}

impl Constraint {
    pub fn new(operator: Operator, version: impl Into<String>) -> Self {
        Self {
            operator,
            version: version.into(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// Where a requirement is resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Resolved by name against the package index (`requests>=2.0`)
    Registry,
    /// A local directory or archive (`./pkg`, `-e .`)
    LocalPath,
    /// A version control URL (`git+https://...#egg=name`)
    Vcs,
    /// A direct URL (`https://.../pkg.whl`, `name @ https://...`)
    Url,
}

impl SourceKind {
    /// Returns the string representation of the source kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Registry => "registry",
            SourceKind::LocalPath => "local",
            SourceKind::Vcs => "vcs",
            SourceKind::Url => "url",
        }
    }
}

/// One requirement line of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Package name as written (empty for unnamed paths/URLs and unparseable lines)
    pub name: String,
    /// PEP 503 normalized name, used for every lookup and comparison
    pub normalized_name: String,
    pub extras: BTreeSet<String>,
    /// Constraints in manifest order, never deduplicated
    pub constraints: Vec<Constraint>,
    /// Environment markers after `;`, kept verbatim and never evaluated
    pub markers: Option<String>,
    /// Path or URL for non-registry requirements
    pub location: Option<String>,
    /// VCS revision (`@v1.0`)
    pub revision: Option<String>,
    pub editable: bool,
    pub source_kind: SourceKind,
    /// The original line, byte for byte
    pub raw_line: String,
    /// 1-based line number in the manifest
    pub line_number: usize,
    pub error: Option<ParseError>,
}

impl Requirement {
    /// Create a registry requirement with no constraints
    pub fn registry(name: &str, raw_line: &str, line_number: usize) -> Self {
        Self {
            name: name.to_string(),
            normalized_name: normalize_name(name),
            extras: BTreeSet::new(),
            constraints: Vec::new(),
            markers: None,
            location: None,
            revision: None,
            editable: false,
            source_kind: SourceKind::Registry,
            raw_line: raw_line.to_string(),
            line_number,
            error: None,
        }
    }

    /// Create a requirement for a line that failed to parse
    pub fn invalid(raw_line: &str, line_number: usize, error: ParseError) -> Self {
        Self {
            error: Some(error),
            ..Self::registry("", raw_line, line_number)
        }
    }

    pub fn is_registry(&self) -> bool {
        self.source_kind == SourceKind::Registry
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Key used to group requirements that refer to the same package
    ///
    /// Named requirements use their normalized name, unnamed paths and URLs
    /// their location, and unparseable lines their trimmed text.
    pub fn identity(&self) -> String {
        if !self.normalized_name.is_empty() {
            return self.normalized_name.clone();
        }
        match &self.location {
            Some(location) => location.trim_end_matches('/').to_string(),
            None => self.raw_line.trim().to_string(),
        }
    }

    /// Label shown in listings: the name if known, the location otherwise
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else if let Some(location) = &self.location {
            location
        } else {
            self.raw_line.trim()
        }
    }

    /// Re-render the requirement as a manifest line
    ///
    /// The raw line is kept verbatim, so this always round-trips.
    pub fn to_line(&self) -> &str {
        &self.raw_line
    }

    /// Constraint list joined with commas (`>=1.0,<2.0`)
    pub fn spec_string(&self) -> String {
        self.constraints
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `name[extras]` for display
    pub fn name_with_extras(&self) -> String {
        if self.extras.is_empty() {
            self.label().to_string()
        } else {
            let extras: Vec<&str> = self.extras.iter().map(String::as_str).collect();
            format!("{}[{}]", self.label(), extras.join(","))
        }
    }

    /// Canonical single-line form, e.g. `requests[socks]>=2.0` or
    /// `-e git+https://host/repo.git@v1#egg=repo`
    pub fn display_line(&self) -> String {
        if self.error.is_some() {
            return self.raw_line.trim().to_string();
        }
        let editable = if self.editable { "-e " } else { "" };
        match self.source_kind {
            SourceKind::Registry => format!("{}{}", self.name_with_extras(), self.spec_string()),
            SourceKind::LocalPath => {
                format!("{}{}", editable, self.location.as_deref().unwrap_or_default())
            }
            SourceKind::Vcs | SourceKind::Url => {
                let location = self.location.as_deref().unwrap_or_default();
                let revision = self
                    .revision
                    .as_deref()
                    .map(|rev| format!("@{rev}"))
                    .unwrap_or_default();
                if self.name.is_empty() {
                    format!("{editable}{location}{revision}")
                } else if self.editable || self.source_kind == SourceKind::Vcs {
                    format!("{editable}{location}{revision}#egg={}", self.name)
                } else {
                    format!("{} @ {location}", self.name_with_extras())
                }
            }
        }
    }
}

/// Normalize a package name the way PEP 503 does
///
/// Lowercases and collapses every run of `-`, `_` and `.` into a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    normalized
}
