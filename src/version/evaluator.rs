//! Constraint evaluation using PEP 440 version specifiers
//!
//! Constraints are AND-combined and checked in manifest order. The first
//! constraint that fails (or cannot be evaluated) decides the outcome and is
//! reported back so callers can show which one broke.

use std::cmp::Ordering;
use std::str::FromStr;

use pep508_rs::pep440_rs::{Version, VersionSpecifier};
use tracing::warn;

use crate::parser::types::Constraint;
use crate::version::types::Status;

/// Result of evaluating a constraint list against an installed version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub status: Status,
    /// The constraint that failed or could not be evaluated
    pub failed_constraint: Option<Constraint>,
}

impl Evaluation {
    fn status(status: Status) -> Self {
        Self {
            status,
            failed_constraint: None,
        }
    }

    fn failed(status: Status, constraint: &Constraint) -> Self {
        Self {
            status,
            failed_constraint: Some(constraint.clone()),
        }
    }
}

/// Decide whether `installed` meets every constraint
///
/// - no installed version: [`Status::NotInstalled`]
/// - no constraints: [`Status::Satisfied`]
/// - first failing constraint: [`Status::Unsatisfied`]
/// - unparseable installed version or specifier: [`Status::Unknown`]
pub fn evaluate(constraints: &[Constraint], installed: Option<&str>) -> Evaluation {
    let Some(installed) = installed else {
        return Evaluation::status(Status::NotInstalled);
    };

    let Some(first) = constraints.first() else {
        return Evaluation::status(Status::Satisfied);
    };

    let Ok(installed_version) = Version::from_str(installed.trim()).inspect_err(|e| {
        warn!("Failed to parse installed version '{}': {}", installed, e);
    }) else {
        return Evaluation::failed(Status::Unknown, first);
    };

    for constraint in constraints {
        match constraint_holds(constraint, &installed_version) {
            Some(true) => continue,
            Some(false) => return Evaluation::failed(Status::Unsatisfied, constraint),
            None => return Evaluation::failed(Status::Unknown, constraint),
        }
    }

    Evaluation::status(Status::Satisfied)
}

/// Check a single constraint; `None` when it is not a valid specifier
///
/// Local version labels of `installed` are ignored unless the constraint
/// names one, so `==2.1.0` holds for `2.1.0+cu118`.
pub fn constraint_holds(constraint: &Constraint, installed: &Version) -> Option<bool> {
    let specifier = VersionSpecifier::from_str(&constraint.to_string())
        .inspect_err(|e| warn!("Failed to parse version specifier '{}': {}", constraint, e))
        .ok()?;
    Some(specifier.contains(installed))
}

/// Compare two versions, `None` if either is not a valid version
pub fn compare_versions(left: &str, right: &str) -> Option<Ordering> {
    let left = Version::from_str(left.trim()).ok()?;
    let right = Version::from_str(right.trim()).ok()?;
    Some(left.cmp(&right))
}
