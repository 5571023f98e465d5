//! Per-requirement comparison against installed and published versions

use std::cmp::Ordering;

use tracing::debug;

use crate::parser::types::{Constraint, Operator, Requirement};
use crate::version::error::RegistryError;
use crate::version::evaluator::{compare_versions, evaluate};
use crate::version::fetch::RemoteIndex;
use crate::version::installed::InstalledIndex;
use crate::version::types::{InstalledPackage, RemotePackageInfo, Status};

/// Outcome of checking one requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub requirement: Requirement,
    pub installed: Option<InstalledPackage>,
    pub remote: Option<RemotePackageInfo>,
    pub status: Status,
    /// The constraint that failed or could not be evaluated
    pub failed_constraint: Option<Constraint>,
    /// Why the remote lookup did not produce a version
    pub remote_error: Option<LookupFailure>,
}

/// A remote lookup that did not produce release information
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// The index does not know the package
    NotFound,
    /// The lookup itself failed (network, timeout, bad response)
    Failed(String),
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::NotFound => f.write_str("not found"),
            LookupFailure::Failed(reason) => f.write_str(reason),
        }
    }
}

impl Report {
    fn new(requirement: &Requirement, status: Status) -> Self {
        Self {
            requirement: requirement.clone(),
            installed: None,
            remote: None,
            status,
            failed_constraint: None,
            remote_error: None,
        }
    }

    /// Anything other than a satisfied requirement is an issue
    pub fn has_issue(&self) -> bool {
        self.status != Status::Satisfied
    }

    /// Valid non-registry requirements are never version-checked
    pub fn is_unchecked(&self) -> bool {
        self.requirement.is_valid() && !self.requirement.is_registry()
    }

    /// Whether the requirement pins exactly the installed version
    pub fn is_pinned(&self) -> bool {
        let Some(installed) = &self.installed else {
            return false;
        };
        match self.requirement.constraints.as_slice() {
            [constraint] => {
                matches!(constraint.operator, Operator::Equal | Operator::Identical)
                    && (constraint.version == installed.version
                        || compare_versions(&constraint.version, &installed.version)
                            == Some(Ordering::Equal))
            }
            _ => false,
        }
    }

    /// Whether a newer release than the installed one is published
    pub fn is_behind_latest(&self) -> bool {
        match (&self.installed, &self.remote) {
            (Some(installed), Some(remote)) => {
                compare_versions(&installed.version, &remote.latest_version)
                    == Some(Ordering::Less)
            }
            _ => false,
        }
    }
}

/// Build one report per requirement, in manifest order
///
/// With a remote index, a satisfied requirement whose installed version is
/// older than the latest release becomes [`Status::Outdated`]. A failed
/// lookup degrades a satisfied requirement to [`Status::Unknown`]; a package
/// the index does not know keeps its local status.
pub fn compare(
    requirements: &[Requirement],
    installed: &InstalledIndex,
    remote: Option<&RemoteIndex>,
) -> Vec<Report> {
    let reports: Vec<Report> = requirements
        .iter()
        .map(|requirement| compare_one(requirement, installed, remote))
        .collect();
    debug!(
        "Compared {} requirements, {} with issues",
        reports.len(),
        reports.iter().filter(|r| r.has_issue()).count()
    );
    reports
}

fn compare_one(
    requirement: &Requirement,
    installed: &InstalledIndex,
    remote: Option<&RemoteIndex>,
) -> Report {
    if !requirement.is_valid() {
        return Report::new(requirement, Status::Unknown);
    }

    let installed_package = if requirement.normalized_name.is_empty() {
        None
    } else {
        installed.get(&requirement.normalized_name).cloned()
    };

    if !requirement.is_registry() {
        return Report {
            installed: installed_package,
            ..Report::new(requirement, Status::Unknown)
        };
    }

    let evaluation = evaluate(
        &requirement.constraints,
        installed_package.as_ref().map(|p| p.version.as_str()),
    );
    let mut report = Report {
        installed: installed_package,
        failed_constraint: evaluation.failed_constraint,
        ..Report::new(requirement, evaluation.status)
    };

    if let Some(remote) = remote {
        apply_remote(&mut report, remote);
    }
    debug!(
        "{} (line {}) is {}",
        report.requirement.label(),
        report.requirement.line_number,
        report.status.as_str()
    );
    report
}

fn apply_remote(report: &mut Report, remote: &RemoteIndex) {
    match remote.get(&report.requirement.normalized_name) {
        Some(Ok(info)) => {
            report.remote = Some(info.clone());
            if report.status == Status::Satisfied && report.is_behind_latest() {
                report.status = Status::Outdated;
            }
        }
        Some(Err(RegistryError::NotFound(_))) => {
            report.remote_error = Some(LookupFailure::NotFound);
        }
        Some(Err(e)) => {
            report.remote_error = Some(LookupFailure::Failed(e.to_string()));
            if report.status == Status::Satisfied {
                report.status = Status::Unknown;
            }
        }
        None => {
            debug!(
                "No remote lookup for {}",
                report.requirement.normalized_name
            );
        }
    }
}

/// Reports with an issue, in manifest order
///
/// Unchecked (non-registry) requirements are left out unless
/// `include_unchecked` is set.
pub fn filter_issues(reports: &[Report], include_unchecked: bool) -> Vec<&Report> {
    reports
        .iter()
        .filter(|report| report.has_issue())
        .filter(|report| include_unchecked || !report.is_unchecked())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RequirementsTxtParser;

    fn parse(content: &str) -> Vec<Requirement> {
        RequirementsTxtParser::new().parse(content)
    }

    fn installed(packages: &[(&str, &str)]) -> InstalledIndex {
        InstalledIndex::new(
            packages
                .iter()
                .map(|(name, version)| InstalledPackage::new(name, version, "/site"))
                .collect(),
        )
    }

    fn remote(entries: Vec<(&str, Result<&str, RegistryError>)>) -> RemoteIndex {
        let mut index = RemoteIndex::new();
        for (name, result) in entries {
            index.insert(
                name,
                result.map(|version| RemotePackageInfo {
                    name: name.to_string(),
                    latest_version: version.to_string(),
                    ..Default::default()
                }),
            );
        }
        index
    }

    #[test]
    fn compare_reports_unsatisfied_constraint_and_bare_requirement() {
        let requirements = parse("colr>=0.7.6\n# comment\nrequests\n");
        let index = installed(&[("colr", "0.7.5"), ("requests", "2.0.0")]);

        let reports = compare(&requirements, &index, None);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].requirement.name, "colr");
        assert_eq!(reports[0].status, Status::Unsatisfied);
        assert_eq!(
            reports[0].failed_constraint,
            Some(Constraint::new(Operator::GreaterEqual, "0.7.6"))
        );
        assert_eq!(reports[1].requirement.name, "requests");
        assert_eq!(reports[1].status, Status::Satisfied);
        assert_eq!(reports[1].installed.as_ref().unwrap().version, "2.0.0");
    }

    #[test]
    fn compare_reports_missing_packages() {
        let reports = compare(&parse("flask==3.0\n"), &installed(&[]), None);
        assert_eq!(reports[0].status, Status::NotInstalled);
        assert!(reports[0].has_issue());
    }

    #[test]
    fn compare_looks_up_normalized_names() {
        let reports = compare(&parse("Foo_Bar==1.0\n"), &installed(&[("foo-bar", "1.0")]), None);
        assert_eq!(reports[0].status, Status::Satisfied);
        assert!(reports[0].is_pinned());
    }

    #[test]
    fn compare_accepts_local_build_of_pinned_version() {
        let reports = compare(
            &parse("torch==2.1.0\n"),
            &installed(&[("torch", "2.1.0+cu118")]),
            None,
        );
        assert_eq!(reports[0].status, Status::Satisfied);
        assert_eq!(reports[0].failed_constraint, None);
    }

    #[test]
    fn compare_marks_non_registry_and_invalid_lines_unknown() {
        let requirements = parse("-e ./local/pkg\nnot a valid req!!\n");
        let reports = compare(&requirements, &installed(&[]), None);

        assert_eq!(reports[0].status, Status::Unknown);
        assert!(reports[0].is_unchecked());
        assert_eq!(reports[1].status, Status::Unknown);
        assert!(!reports[1].is_unchecked());
    }

    #[test]
    fn compare_with_remote_marks_outdated_packages() {
        let requirements = parse("requests>=2.0\nsix\ncolr>=0.7.6\n");
        let index = installed(&[("requests", "2.31.0"), ("six", "1.16.0"), ("colr", "0.7.5")]);
        let remote = remote(vec![
            ("requests", Ok("2.32.0")),
            ("six", Ok("1.16.0")),
            ("colr", Ok("0.9.1")),
        ]);

        let reports = compare(&requirements, &index, Some(&remote));

        assert_eq!(reports[0].status, Status::Outdated);
        assert_eq!(reports[1].status, Status::Satisfied);
        // A broken constraint is reported before staleness
        assert_eq!(reports[2].status, Status::Unsatisfied);
        assert!(reports[2].is_behind_latest());
    }

    #[test]
    fn compare_with_remote_failure_degrades_to_unknown() {
        let requirements = parse("requests\nprivate-pkg\n");
        let index = installed(&[("requests", "2.31.0"), ("private-pkg", "1.0")]);
        let remote = remote(vec![
            ("requests", Err(RegistryError::Timeout { timeout_ms: 10 })),
            (
                "private-pkg",
                Err(RegistryError::NotFound("private-pkg".to_string())),
            ),
        ]);

        let reports = compare(&requirements, &index, Some(&remote));

        assert_eq!(reports[0].status, Status::Unknown);
        assert!(matches!(
            reports[0].remote_error,
            Some(LookupFailure::Failed(_))
        ));
        assert_eq!(reports[1].status, Status::Satisfied);
        assert_eq!(reports[1].remote_error, Some(LookupFailure::NotFound));
    }

    #[test]
    fn filter_issues_skips_unchecked_unless_requested() {
        let requirements = parse("requests\nflask\n-e ./local/pkg\n");
        let reports = compare(&requirements, &installed(&[("requests", "2.0")]), None);

        let issues = filter_issues(&reports, false);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].requirement.name, "flask");

        let issues = filter_issues(&reports, true);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn is_pinned_requires_single_exact_match() {
        let index = installed(&[("six", "1.16.0")]);
        assert!(compare(&parse("six==1.16\n"), &index, None)[0].is_pinned());
        assert!(!compare(&parse("six>=1.16.0\n"), &index, None)[0].is_pinned());
        assert!(!compare(&parse("six\n"), &index, None)[0].is_pinned());
    }
}
