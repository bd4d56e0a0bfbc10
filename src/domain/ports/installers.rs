//! Post-generation installer ports
//!
//! Both run after the workspace and side effects are on disk. Anything they
//! report, failures included, ends up as a warning: they never abort a run.

use anyhow::Result;

use crate::config::Config;
use crate::domain::services::GraphTraverser;
use crate::domain::value_objects::LintingIssue;

/// Installs code-signing material for the generated projects
pub trait SigningInstaller: Send + Sync {
    fn install(&self, traverser: &GraphTraverser<'_>, config: &Config)
        -> Result<Vec<LintingIssue>>;
}

/// Resolves external package products
pub trait PackageInstaller: Send + Sync {
    fn install(
        &self,
        traverser: &GraphTraverser<'_>,
        workspace_name: &str,
        config: &Config,
    ) -> Result<Vec<LintingIssue>>;
}
