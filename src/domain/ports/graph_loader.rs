//! Graph loader port - turns a project root into a graph
//!
//! Manifest formats are pluggable: the orchestrator only sees this trait.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::{Graph, GraphError, SideEffectDescriptor};
use crate::domain::value_objects::LintingIssue;

/// Everything a loader produces for one run
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    /// Filesystem mutations to apply after the workspace is written
    pub side_effects: Vec<SideEffectDescriptor>,
    /// Findings that do not prevent loading (unknown keys, ...)
    pub issues: Vec<LintingIssue>,
}

impl LoadedGraph {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            side_effects: Vec::new(),
            issues: Vec::new(),
        }
    }
}

/// User-facing manifest errors
///
/// A loader never builds dangling edges: a dependency it cannot resolve is
/// reported here instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no manifest found at {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("'{node}' depends on '{target}', which is not declared")]
    UnknownTarget { node: String, target: String },

    #[error("'{node}' depends on '{target}', which matches several nodes ({candidates}); set target_path")]
    AmbiguousTarget {
        node: String,
        target: String,
        candidates: String,
    },

    #[error("side effect path '{path}' must stay inside the project root")]
    EscapingPath { path: PathBuf },
}

pub trait GraphLoader: Send + Sync {
    fn load(&self, root: &Path) -> Result<LoadedGraph, LoadError>;
}
