//! Linting issue value objects
//!
//! Every stage of a generation run reports findings as `LintingIssue`s. They
//! are collected, in discovery order, into one `LintingIssues` accumulator
//! owned by the orchestrator for the duration of a single run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Which check produced an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintRule {
    Cycle,
    StaticProductDuplication,
    PlatformMismatch,
    /// Dangling edge endpoint: a defect in whatever built the graph
    MissingReference,
    InvalidLink,
    DuplicateName,
    Environment,
    Configuration,
    Manifest,
    Signing,
    Packages,
}

/// What an issue is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueSubject {
    Node { id: NodeId },
    Edge { source: NodeId, target: NodeId },
    Path { path: PathBuf },
    Workspace,
}

impl fmt::Display for IssueSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSubject::Node { id } => write!(f, "{}", id.name),
            IssueSubject::Edge { source, target } => {
                write!(f, "{} -> {}", source.name, target.name)
            }
            IssueSubject::Path { path } => write!(f, "{}", path.display()),
            IssueSubject::Workspace => f.write_str("workspace"),
        }
    }
}

/// A structural finding with a severity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintingIssue {
    pub severity: Severity,
    pub reason: String,
    pub subject: IssueSubject,
    pub rule: LintRule,
}

impl LintingIssue {
    pub fn error(rule: LintRule, subject: IssueSubject, reason: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            reason: reason.into(),
            subject,
            rule,
        }
    }

    pub fn warning(rule: LintRule, subject: IssueSubject, reason: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            reason: reason.into(),
            subject,
            rule,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for LintingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.reason)
    }
}

/// Run-scoped, ordered accumulator of issues
///
/// Created fresh for every generation call and passed explicitly between
/// stages. Never shared between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintingIssues {
    issues: Vec<LintingIssue>,
}

impl LintingIssues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: LintingIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = LintingIssue>) {
        self.issues.extend(issues);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LintingIssue> {
        self.issues.iter()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(LintingIssue::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LintingIssue> {
        self.issues.iter().filter(|i| i.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LintingIssue> {
        self.issues.iter().filter(|i| i.is_warning())
    }

    /// Drain everything, leaving the accumulator empty
    pub fn take(&mut self) -> Vec<LintingIssue> {
        std::mem::take(&mut self.issues)
    }

    pub fn as_slice(&self) -> &[LintingIssue] {
        &self.issues
    }
}

impl From<Vec<LintingIssue>> for LintingIssues {
    fn from(issues: Vec<LintingIssue>) -> Self {
        Self { issues }
    }
}

impl IntoIterator for LintingIssues {
    type Item = LintingIssue;
    type IntoIter = std::vec::IntoIter<LintingIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

/// Human-readable block listing issues grouped by severity, errors first
pub fn render_issues(issues: &[LintingIssue]) -> String {
    let mut out = String::new();
    for severity in [Severity::Error, Severity::Warning] {
        let matching: Vec<&LintingIssue> =
            issues.iter().filter(|i| i.severity == severity).collect();
        if matching.is_empty() {
            continue;
        }
        let heading = match severity {
            Severity::Error => "The following issues have been found:",
            Severity::Warning => "The following warnings need attention:",
        };
        out.push_str(heading);
        out.push('\n');
        for issue in matching {
            out.push_str(&format!(" · {}\n", issue.reason));
        }
    }
    out
}
