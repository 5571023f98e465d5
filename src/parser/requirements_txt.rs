//! requirements.txt parser
//!
//! Parses pip requirement files one line at a time. Every requirement line
//! yields exactly one [`Requirement`]; malformed lines carry a [`ParseError`]
//! instead of aborting the batch.
//!
//! Format examples:
//! - Registry: `requests[socks] >= 2.0, < 3 ; python_version >= "3.8"`
//! - Editable path: `-e ./libs/mylib`
//! - VCS: `-e git+https://github.com/user/repo.git@v1.0#egg=repo`
//! - Direct reference: `mylib @ https://example.com/mylib-1.0.tar.gz`
//!
//! Blank lines, `#` comments and pip option lines (`-r`, `--index-url`, ...)
//! are skipped, but line numbers always refer to the original content.

use std::str::FromStr;

use pep508_rs::pep440_rs::VersionSpecifier;
use pep508_rs::{VerbatimUrl, VersionOrUrl};
use regex::Regex;
use tracing::{debug, warn};

use crate::parser::error::ParseError;
use crate::parser::types::{Constraint, Requirement, SourceKind, normalize_name};

const VCS_SCHEMES: [&str; 4] = ["git+", "hg+", "svn+", "bzr+"];
const URL_SCHEMES: [&str; 4] = ["http://", "https://", "file://", "ftp://"];
const ARCHIVE_SUFFIXES: [&str; 6] = [".whl", ".tar.gz", ".tgz", ".tar.bz2", ".zip", ".tar"];

/// Classification of a raw manifest line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    /// A pip option such as `-r base.txt` or `--index-url ...`
    Option,
    Requirement,
}

/// Classify a manifest line without parsing it
pub fn line_kind(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with('#') {
        LineKind::Comment
    } else if trimmed.starts_with('-') && editable_target(trimmed).is_none() {
        LineKind::Option
    } else {
        LineKind::Requirement
    }
}

/// Returns the path/URL after `-e`/`--editable`, if the line is editable
fn editable_target(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("--editable")
        .or_else(|| line.strip_prefix("-e"))?;
    if rest.is_empty() {
        return Some(rest);
    }
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    if rest.starts_with(char::is_whitespace) || line.starts_with("--editable=") {
        Some(rest.trim())
    } else {
        None
    }
}

/// Cut a trailing ` # comment` (pip only treats `#` after whitespace as a comment)
fn strip_inline_comment(line: &str) -> &str {
    let mut previous_is_space = true;
    for (i, c) in line.char_indices() {
        if c == '#' && previous_is_space {
            return &line[..i];
        }
        previous_is_space = c.is_whitespace();
    }
    line
}

/// Parser for requirements.txt files
///
/// Registry and `name @ url` lines are PEP 508 strings and go through
/// `pep508_rs`; editable, VCS, path and bare URL lines are pip extensions and
/// are handled here.
pub struct RequirementsTxtParser {
    /// Match a bare package name
    name_re: Regex,
    /// Match the `egg=` fragment of a VCS URL
    egg_re: Regex,
}

impl RequirementsTxtParser {
    pub fn new() -> Self {
        Self {
            name_re: Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").unwrap(),
            egg_re: Regex::new(r"[#&]egg=(?P<egg>[^&\s]+)").unwrap(),
        }
    }

    /// Parse the whole content of a manifest
    pub fn parse(&self, content: &str) -> Vec<Requirement> {
        self.parse_lines(content.lines())
    }

    /// Parse an ordered sequence of lines
    ///
    /// Returns one record per requirement line, numbered from 1 in input order.
    pub fn parse_lines<'a, I>(&self, lines: I) -> Vec<Requirement>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let requirements: Vec<Requirement> = lines
            .into_iter()
            .enumerate()
            .filter(|(_, line)| line_kind(line) == LineKind::Requirement)
            .map(|(index, line)| self.parse_line(line, index + 1))
            .collect();

        debug!(
            "Parsed {} requirements ({} invalid)",
            requirements.len(),
            requirements.iter().filter(|r| !r.is_valid()).count()
        );
        requirements
    }

    /// Parse a single requirement line
    ///
    /// Never fails: a malformed line becomes a requirement with `error` set.
    pub fn parse_line(&self, raw_line: &str, line_number: usize) -> Requirement {
        let text = strip_inline_comment(raw_line).trim();
        self.parse_text(text, raw_line, line_number)
            .unwrap_or_else(|e| {
                warn!("Line {}: failed to parse '{}': {}", line_number, raw_line, e);
                Requirement::invalid(raw_line, line_number, e)
            })
    }

    fn parse_text(
        &self,
        text: &str,
        raw_line: &str,
        line_number: usize,
    ) -> Result<Requirement, ParseError> {
        if let Some(target) = editable_target(text) {
            if target.is_empty() {
                return Err(ParseError::MissingLocation);
            }
            let mut req = self.parse_location(target, raw_line, line_number)?;
            req.editable = true;
            return Ok(req);
        }

        if text.starts_with('-') {
            return Err(ParseError::InvalidSyntax(text.to_string()));
        }

        if is_vcs(text) || is_url(text) || is_path(text) {
            return self.parse_location(text, raw_line, line_number);
        }

        self.parse_pep508(text, raw_line, line_number)
    }

    /// Parse a PEP 508 dependency specifier
    fn parse_pep508(
        &self,
        text: &str,
        raw_line: &str,
        line_number: usize,
    ) -> Result<Requirement, ParseError> {
        let parsed = pep508_rs::Requirement::<VerbatimUrl>::from_str(text)
            .map_err(|e| ParseError::InvalidRequirement(e.message.to_string()))?;
        let name = leading_name(text);

        let mut req = match &parsed.version_or_url {
            Some(VersionOrUrl::Url(url)) => {
                let target = url.given().unwrap_or(url.as_str());
                let mut req = self.parse_location(target, raw_line, line_number)?;
                if req.source_kind == SourceKind::LocalPath {
                    req.source_kind = SourceKind::Url;
                }
                req
            }
            Some(VersionOrUrl::VersionSpecifier(_)) | None => {
                let mut req = Requirement::registry("", raw_line, line_number);
                req.constraints = parse_constraints(spec_text(text, name))?;
                req
            }
        };

        req.name = name.to_string();
        req.normalized_name = normalize_name(name);
        req.extras = parsed.extras.iter().map(ToString::to_string).collect();
        req.markers = if parsed.marker.is_true() {
            None
        } else {
            text.rsplit_once(';')
                .map(|(_, markers)| markers.trim().to_string())
        };
        Ok(req)
    }

    /// Parse a path, URL or VCS reference
    fn parse_location(
        &self,
        target: &str,
        raw_line: &str,
        line_number: usize,
    ) -> Result<Requirement, ParseError> {
        let mut req = Requirement::registry("", raw_line, line_number);

        if is_vcs(target) || is_url(target) {
            req.source_kind = if is_vcs(target) {
                SourceKind::Vcs
            } else {
                SourceKind::Url
            };

            let (url, fragment) = match target.split_once('#') {
                Some((url, fragment)) => (url, Some(fragment)),
                None => (target, None),
            };
            if let Some(egg) = fragment
                .and_then(|f| self.egg_re.captures(&format!("#{f}")).map(|c| c["egg"].to_string()))
            {
                self.apply_name(&mut req, &egg)?;
            }

            let (url, revision) = match req.source_kind {
                SourceKind::Vcs => split_revision(url),
                _ => (url, None),
            };
            req.location = Some(url.to_string());
            req.revision = revision.map(str::to_string);
        } else {
            req.source_kind = SourceKind::LocalPath;
            let path = target.split_once(';').map_or(target, |(path, _)| path);
            req.location = Some(path.trim().to_string());
        }

        Ok(req)
    }

    fn apply_name(&self, req: &mut Requirement, name: &str) -> Result<(), ParseError> {
        if !self.name_re.is_match(name) {
            return Err(ParseError::InvalidName(name.to_string()));
        }
        req.name = name.to_string();
        req.normalized_name = normalize_name(name);
        Ok(())
    }
}

impl Default for RequirementsTxtParser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_vcs(text: &str) -> bool {
    VCS_SCHEMES.iter().any(|scheme| text.starts_with(scheme))
}

fn is_url(text: &str) -> bool {
    URL_SCHEMES.iter().any(|scheme| text.starts_with(scheme))
}

fn is_path(text: &str) -> bool {
    let first = text.split_whitespace().next().unwrap_or(text);
    first.starts_with('.')
        || first.starts_with('/')
        || first.starts_with('~')
        || first.contains('\\')
        || (first.contains('/') && !first.contains('@'))
        || ARCHIVE_SUFFIXES.iter().any(|suffix| first.ends_with(suffix))
}

/// The package name at the start of a validated PEP 508 line, as written
fn leading_name(text: &str) -> &str {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or(text.len());
    &text[..end]
}

/// The version specifier part of a validated `name[extras] spec ; markers` line
fn spec_text<'a>(text: &'a str, name: &str) -> &'a str {
    let rest = text[name.len()..].trim_start();
    let rest = match rest.strip_prefix('[') {
        Some(extras) => extras.split_once(']').map_or("", |(_, after)| after),
        None => rest,
    };
    let spec = rest.split_once(';').map_or(rest, |(spec, _)| spec).trim();
    spec.strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(spec)
        .trim()
}

/// Split `>=1.0, <2.0` into constraints in written order
///
/// `VersionSpecifiers` sorts its clauses, so each clause is checked with
/// `VersionSpecifier` on its own. The operand is kept as written.
fn parse_constraints(spec: &str) -> Result<Vec<Constraint>, ParseError> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    spec.split(',')
        .map(str::trim)
        .map(|clause| {
            VersionSpecifier::from_str(clause)
                .map_err(|e| ParseError::InvalidConstraint(format!("{clause} ({e})")))?;
            let operand_start = clause
                .find(|c: char| !matches!(c, '=' | '!' | '~' | '<' | '>'))
                .unwrap_or(clause.len());
            let (operator, version) = clause.split_at(operand_start);
            let operator = operator
                .parse()
                .map_err(|_| ParseError::InvalidConstraint(clause.to_string()))?;
            Ok(Constraint::new(operator, version.trim()))
        })
        .collect()
}

/// Split the `@revision` suffix from a VCS URL
///
/// Only an `@` after the first path separator counts, so `git@host` user
/// info is left alone.
fn split_revision(url: &str) -> (&str, Option<&str>) {
    let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
    let Some(path_start) = url[after_scheme..].find('/').map(|i| after_scheme + i) else {
        return (url, None);
    };
    match url[path_start..].rfind('@') {
        Some(at) => {
            let at = path_start + at;
            (&url[..at], Some(&url[at + 1..]))
        }
        None => (url, None),
    }
}
