//! JSON Workspace Writer
//!
//! Writes `<name>.keelworkspace/contents.json` and one
//! `<node>.keelproj/project.json` per project. A file whose bytes match
//! what is already on disk is not rewritten.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::{ProjectDescriptor, WorkspaceDescriptor};
use crate::domain::ports::{FileSystem, WorkspaceWriter, WriteError};
use crate::infrastructure::fs::LocalFs;

pub const WORKSPACE_FILE: &str = "contents.json";
pub const PROJECT_FILE: &str = "project.json";

/// Workspace index: the project bundles, in build order
#[derive(Debug, Serialize)]
struct WorkspaceContents<'a> {
    name: &'a str,
    projects: Vec<PathBuf>,
}

pub struct JsonWorkspaceWriter {
    fs: Arc<dyn FileSystem>,
}

impl Default for JsonWorkspaceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWorkspaceWriter {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(LocalFs::new()),
        }
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn encode<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>, WriteError> {
        let mut bytes = serde_json::to_vec_pretty(value).map_err(|e| WriteError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Write unless the file already holds identical content
    fn write_if_changed(&self, path: &Path, content: &[u8]) -> Result<bool, WriteError> {
        if let Ok(existing) = self.fs.read(path) {
            if existing == content {
                return Ok(false);
            }
        }
        self.fs.write(path, content).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    fn write_project(&self, project: &ProjectDescriptor) -> Result<bool, WriteError> {
        let path = project.path.join(PROJECT_FILE);
        let content = Self::encode(&path, project)?;
        self.write_if_changed(&path, &content)
    }
}

impl WorkspaceWriter for JsonWorkspaceWriter {
    fn write(&self, workspace: &WorkspaceDescriptor) -> Result<(), WriteError> {
        for project in &workspace.projects {
            self.write_project(project)?;
        }

        let root = workspace.path.parent().unwrap_or(Path::new(""));
        let contents = WorkspaceContents {
            name: &workspace.name,
            projects: workspace
                .projects
                .iter()
                .map(|p| p.path.strip_prefix(root).unwrap_or(&p.path).to_path_buf())
                .collect(),
        };
        let path = workspace.path.join(WORKSPACE_FILE);
        let content = Self::encode(&path, &contents)?;
        self.write_if_changed(&path, &content)?;
        Ok(())
    }
}
