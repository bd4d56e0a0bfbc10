//! Generate Result
//!
//! Result types for generation runs.

use std::path::PathBuf;

use crate::application::side_effects::ExecutionReport;
use crate::domain::entities::{Graph, WorkspaceDescriptor};
use crate::domain::value_objects::LintingIssue;

/// Result of a successful generation run
#[derive(Debug, Clone)]
pub struct GenerateReport {
    /// Path of the generated workspace
    pub output_path: PathBuf,
    pub graph: Graph,
    pub workspace: WorkspaceDescriptor,
    /// Warnings flushed at the end of the run, in discovery order
    pub warnings: Vec<LintingIssue>,
    pub execution: ExecutionReport,
}

impl GenerateReport {
    pub fn project_count(&self) -> usize {
        self.workspace.projects.len()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
