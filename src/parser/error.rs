//! Error type for parsing a single requirement line

/// Why a manifest line could not be turned into a requirement.
///
/// Parse errors never abort a parse pass: they are attached to the
/// [`Requirement`](crate::parser::Requirement) built for the offending line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The package name is missing or contains invalid characters
    #[error("Invalid package name: {0}")]
    InvalidName(String),

    /// A constraint clause has no known operator or no version operand
    #[error("Invalid version constraint: {0}")]
    InvalidConstraint(String),

    /// The line is not a valid PEP 508 dependency specifier
    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),

    /// `-e`/`--editable` without a path or URL
    #[error("Editable requirement without a path or URL")]
    MissingLocation,

    /// Anything else that does not look like a requirement
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),
}
