//! Workspace writer port - persists a generated workspace

use std::path::PathBuf;

use thiserror::Error;

use super::file_system::FsError;
use crate::domain::entities::WorkspaceDescriptor;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    #[error("failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

pub trait WorkspaceWriter: Send + Sync {
    fn write(&self, workspace: &WorkspaceDescriptor) -> Result<(), WriteError>;
}
