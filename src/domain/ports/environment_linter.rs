//! Environment linter port - checks the machine running the generation

use thiserror::Error;

use crate::config::Config;
use crate::domain::value_objects::LintingIssue;

/// Unrecoverable environment mismatch
///
/// Ordinary incompatibilities are `Error` issues, not this.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("cannot look up required tools ({tools}): PATH is not set")]
    PathUnset { tools: String },
}

pub trait EnvironmentLinter: Send + Sync {
    fn lint(&self, config: &Config) -> Result<Vec<LintingIssue>, EnvironmentError>;
}
