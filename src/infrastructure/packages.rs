//! Command package installer
//!
//! Resolves external package products by running the configured
//! `[packages] command` in the project root, with `KEEL_WORKSPACE` set to
//! the workspace name.

use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::domain::ports::PackageInstaller;
use crate::domain::services::GraphTraverser;
use crate::domain::value_objects::{IssueSubject, LintRule, LintingIssue, NodeKind};

pub const ENV_WORKSPACE: &str = "KEEL_WORKSPACE";

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandPackageInstaller;

impl CommandPackageInstaller {
    pub fn new() -> Self {
        Self
    }
}

impl PackageInstaller for CommandPackageInstaller {
    fn install(
        &self,
        traverser: &GraphTraverser<'_>,
        workspace_name: &str,
        config: &Config,
    ) -> Result<Vec<LintingIssue>> {
        let packages = traverser.nodes_of_kind(NodeKind::Package);
        if packages.is_empty() {
            return Ok(Vec::new());
        }

        let Some(command) = config.packages.command.as_deref() else {
            let names: Vec<&str> = packages.iter().map(|n| n.name()).collect();
            return Ok(vec![LintingIssue::warning(
                LintRule::Packages,
                IssueSubject::Workspace,
                format!(
                    "Package products are declared ({}) but no [packages] command is configured",
                    names.join(", ")
                ),
            )]);
        };

        let output = Command::new(command)
            .args(&config.packages.args)
            .current_dir(traverser.path())
            .env(ENV_WORKSPACE, workspace_name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run package command '{}'", command))?;

        if output.status.success() {
            return Ok(Vec::new());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.lines().rev().find(|l| !l.trim().is_empty());
        let status = match output.status.code() {
            Some(code) => format!("exit code {}", code),
            None => "a signal".to_string(),
        };
        let reason = match detail {
            Some(line) => format!(
                "Package command '{}' failed with {}: {}",
                command,
                status,
                line.trim()
            ),
            None => format!("Package command '{}' failed with {}", command, status),
        };
        Ok(vec![LintingIssue::warning(
            LintRule::Packages,
            IssueSubject::Workspace,
            reason,
        )])
    }
}
