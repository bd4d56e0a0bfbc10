//! Side-effect descriptors - declarative filesystem mutations
//!
//! Produced fresh by the loader on every run, applied once by the executor,
//! then discarded.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// What `CreateFile` does when the file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    #[default]
    Overwrite,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SideEffectDescriptor {
    CreateFile {
        path: PathBuf,
        contents: Vec<u8>,
        overwrite: OverwritePolicy,
    },
    CreateDirectory {
        path: PathBuf,
    },
    Delete {
        path: PathBuf,
    },
}

impl SideEffectDescriptor {
    pub fn create_file(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        SideEffectDescriptor::CreateFile {
            path: path.into(),
            contents: contents.into(),
            overwrite: OverwritePolicy::Overwrite,
        }
    }

    pub fn create_file_if_missing(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        SideEffectDescriptor::CreateFile {
            path: path.into(),
            contents: contents.into(),
            overwrite: OverwritePolicy::Skip,
        }
    }

    pub fn create_directory(path: impl Into<PathBuf>) -> Self {
        SideEffectDescriptor::CreateDirectory { path: path.into() }
    }

    pub fn delete(path: impl Into<PathBuf>) -> Self {
        SideEffectDescriptor::Delete { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        match self {
            SideEffectDescriptor::CreateFile { path, .. }
            | SideEffectDescriptor::CreateDirectory { path }
            | SideEffectDescriptor::Delete { path } => path,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, SideEffectDescriptor::Delete { .. })
    }
}

/// What applying one descriptor did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffectOutcome {
    Applied,
    /// Already in the requested state
    Unchanged,
}

impl SideEffectOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SideEffectOutcome::Applied => "applied",
            SideEffectOutcome::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for SideEffectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffectDescriptor::CreateFile { path, .. } => {
                write!(f, "create file {}", path.display())
            }
            SideEffectDescriptor::CreateDirectory { path } => {
                write!(f, "create directory {}", path.display())
            }
            SideEffectDescriptor::Delete { path } => write!(f, "delete {}", path.display()),
        }
    }
}
