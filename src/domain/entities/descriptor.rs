//! Descriptor entities - declarative generation output
//!
//! Descriptors are pure values computed from a graph. Writers turn them into
//! a concrete on-disk representation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::value_objects::{LinkingKind, NodeId, NodeKind, SettingsMap};

/// Role of a referenced file inside a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileReferenceKind {
    Source,
    Resource,
}

/// A file a project references, relative to the project's node path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReference {
    pub path: PathBuf,
    pub kind: FileReferenceKind,
}

/// A resolved dependency entry of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyReference {
    pub node: NodeId,
    pub linking: LinkingKind,
}

/// One generated project, derived from one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
    /// Where the project bundle is written
    pub path: PathBuf,
    pub node: NodeId,
    pub kind: NodeKind,
    /// Resolved settings shared by every configuration
    pub settings: SettingsMap,
    /// Resolved settings per configuration (base settings included)
    pub configurations: BTreeMap<String, SettingsMap>,
    pub file_references: Vec<FileReference>,
    pub dependencies: Vec<DependencyReference>,
}

/// The generated workspace: projects in topological order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceDescriptor {
    pub path: PathBuf,
    pub name: String,
    pub projects: Vec<ProjectDescriptor>,
}

impl WorkspaceDescriptor {
    pub fn project(&self, node: &NodeId) -> Option<&ProjectDescriptor> {
        self.projects.iter().find(|p| &p.node == node)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}
