//! Default environment linter
//!
//! Checks that this keel build satisfies the project's compatibility
//! constraints and that required tools can be found on `PATH`.

use std::ffi::OsString;
use std::path::Path;

use crate::config::Config;
use crate::domain::ports::{EnvironmentError, EnvironmentLinter};
use crate::domain::value_objects::{IssueSubject, LintRule, LintingIssue};

#[derive(Debug, Clone)]
pub struct DefaultEnvironmentLinter {
    version: String,
    /// `None` reads `PATH` from the process environment at lint time
    search_path: Option<Option<OsString>>,
}

impl Default for DefaultEnvironmentLinter {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultEnvironmentLinter {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            search_path: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Use `path` instead of the process `PATH`; `None` simulates it unset
    pub fn with_search_path(mut self, path: Option<OsString>) -> Self {
        self.search_path = Some(path);
        self
    }

    fn lint_version(&self, config: &Config) -> Option<LintingIssue> {
        let versions = &config.compatibility.versions;
        if versions.is_empty() || versions.iter().any(|v| self.version.starts_with(v.as_str())) {
            return None;
        }
        Some(LintingIssue::error(
            LintRule::Environment,
            IssueSubject::Workspace,
            format!(
                "keel {} is not compatible with this project, which expects {}",
                self.version,
                versions.join(", ")
            ),
        ))
    }

    fn lint_tools(&self, config: &Config) -> Result<Vec<LintingIssue>, EnvironmentError> {
        let tools = &config.compatibility.required_tools;
        if tools.is_empty() {
            return Ok(Vec::new());
        }

        let search_path = match &self.search_path {
            Some(path) => path.clone(),
            None => std::env::var_os("PATH"),
        };
        let Some(search_path) = search_path.filter(|p| !p.is_empty()) else {
            return Err(EnvironmentError::PathUnset {
                tools: tools.join(", "),
            });
        };

        let directories: Vec<_> = std::env::split_paths(&search_path).collect();
        Ok(tools
            .iter()
            .filter(|tool| !directories.iter().any(|dir| is_executable(dir, tool)))
            .map(|tool| {
                LintingIssue::error(
                    LintRule::Environment,
                    IssueSubject::Workspace,
                    format!("Required tool '{}' was not found on PATH", tool),
                )
            })
            .collect())
    }
}

fn is_executable(dir: &Path, tool: &str) -> bool {
    if dir.join(tool).is_file() {
        return true;
    }
    cfg!(windows) && dir.join(format!("{}.exe", tool)).is_file()
}

impl EnvironmentLinter for DefaultEnvironmentLinter {
    fn lint(&self, config: &Config) -> Result<Vec<LintingIssue>, EnvironmentError> {
        let mut issues: Vec<LintingIssue> = self.lint_version(config).into_iter().collect();
        issues.extend(self.lint_tools(config)?);
        Ok(issues)
    }
}
