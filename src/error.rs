//! Error types for keel
//!
//! Uses `thiserror` for library errors. Port-specific errors live next to
//! their ports and are wrapped here.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::domain::ports::{
    ConfigError, EnvironmentError, FsError, LoadError, WriteError,
};
pub use crate::domain::services::GenerationError;
use crate::domain::value_objects::{render_issues, LintingIssue};

/// Result type alias for keel operations
pub type KeelResult<T> = Result<T, KeelError>;

/// Main error type for keel operations
#[derive(Error, Debug)]
pub enum KeelError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Lint(#[from] LintError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    SideEffect(#[from] SideEffectError),

    /// A producer handed over an inconsistent graph
    #[error("internal error: {reason}")]
    Internal { reason: String },

    #[error("generation cancelled after {applied} side effect(s)")]
    Cancelled { applied: usize },
}

impl KeelError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            KeelError::Internal { .. } => 70,
            KeelError::Cancelled { .. } => 130,
            _ => 1,
        }
    }
}

/// A lint batch contained errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render_issues(.issues).trim_end())]
pub struct LintError {
    /// Every error of the batch, in discovery order
    pub issues: Vec<LintingIssue>,
}

/// Why a side effect could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffectFailure {
    PermissionDenied,
    InvalidPath,
    /// Out of space or quota
    Disk,
    Io,
}

impl std::fmt::Display for SideEffectFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SideEffectFailure::PermissionDenied => f.write_str("permission denied"),
            SideEffectFailure::InvalidPath => f.write_str("invalid path"),
            SideEffectFailure::Disk => f.write_str("disk full"),
            SideEffectFailure::Io => f.write_str("I/O error"),
        }
    }
}

#[derive(Error, Debug)]
#[error("side effect on {path} failed ({failure}): {message}")]
pub struct SideEffectError {
    pub path: PathBuf,
    pub failure: SideEffectFailure,
    pub message: String,
    /// Effects applied before the failure
    pub applied: usize,
}

impl SideEffectError {
    pub fn from_fs(path: PathBuf, err: &FsError, applied: usize) -> Self {
        let failure = match err {
            FsError::PermissionDenied(_) => SideEffectFailure::PermissionDenied,
            FsError::InvalidPath(_) | FsError::NotFound(_) => SideEffectFailure::InvalidPath,
            FsError::Disk(_) => SideEffectFailure::Disk,
            FsError::Io(..) | FsError::Other(_) => SideEffectFailure::Io,
        };
        Self {
            path,
            failure,
            message: err.to_string(),
            applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{IssueSubject, LintRule};

    #[test]
    fn lint_error_lists_every_issue() {
        let err = LintError {
            issues: vec![
                LintingIssue::error(LintRule::Cycle, IssueSubject::Workspace, "first"),
                LintingIssue::error(LintRule::InvalidLink, IssueSubject::Workspace, "second"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "The following issues have been found:\n · first\n · second"
        );
    }

    #[test]
    fn exit_codes_separate_defects_from_user_errors() {
        let internal = KeelError::Internal {
            reason: "dangling edge".to_string(),
        };
        assert_eq!(internal.exit_code(), 70);
        assert_eq!(KeelError::Cancelled { applied: 2 }.exit_code(), 130);

        let lint = KeelError::from(LintError { issues: vec![] });
        assert_eq!(lint.exit_code(), 1);
    }

    #[test]
    fn fs_errors_map_to_side_effect_failures() {
        let path = PathBuf::from("Derived");
        let err = SideEffectError::from_fs(
            path.clone(),
            &FsError::PermissionDenied(path.clone()),
            3,
        );
        assert_eq!(err.failure, SideEffectFailure::PermissionDenied);
        assert_eq!(err.applied, 3);
        assert!(err.to_string().starts_with("side effect on Derived failed (permission denied)"));
    }
}
