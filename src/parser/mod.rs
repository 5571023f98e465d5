//! Parser layer
//! - error.rs: per-line parse errors
//! - types.rs: Requirement record and friends (Constraint, Operator, SourceKind)
//! - requirements_txt.rs: requirements.txt line parser

pub mod error;
pub mod requirements_txt;
pub mod types;

pub use error::ParseError;
pub use requirements_txt::{LineKind, RequirementsTxtParser, line_kind};
pub use types::{Constraint, Operator, Requirement, SourceKind, normalize_name};
