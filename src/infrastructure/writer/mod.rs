//! Workspace Writer Implementations
//!
//! - JsonWorkspaceWriter: pretty JSON bundles, unchanged files left alone

mod json;

pub use json::{JsonWorkspaceWriter, PROJECT_FILE, WORKSPACE_FILE};
