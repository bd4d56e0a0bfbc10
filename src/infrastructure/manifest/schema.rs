//! TOML representation of `keel.toml`
//!
//! Kept separate from the domain entities: the loader validates and
//! converts these into a `Graph`.

use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::value_objects::{LinkingKind, NodeKind, Platform, Settings};

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ManifestFile {
    pub workspace: WorkspaceSection,
    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeEntry>,
    #[serde(default, rename = "side_effect")]
    pub side_effects: Vec<SideEffectEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct WorkspaceSection {
    pub name: String,
    #[serde(default)]
    pub disable_static_products_lint: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct NodeEntry {
    pub name: String,
    /// Directory relative to the root; defaults to the node name
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub kind: NodeKind,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    #[serde(default)]
    pub resources: Vec<PathBuf>,
    #[serde(default)]
    pub info_plist: Option<PathBuf>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencyEntry>,
}

impl NodeEntry {
    pub fn directory(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct DependencyEntry {
    pub target: String,
    #[serde(default)]
    pub target_path: Option<PathBuf>,
    #[serde(default = "default_linking")]
    pub linking: LinkingKind,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub configurations: Vec<String>,
}

fn default_linking() -> LinkingKind {
    LinkingKind::Dynamic
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(super) enum SideEffectEntry {
    CreateFile {
        path: PathBuf,
        #[serde(default)]
        contents: String,
        #[serde(default = "default_overwrite")]
        overwrite: bool,
    },
    CreateDirectory {
        path: PathBuf,
    },
    Delete {
        path: PathBuf,
    },
}

fn default_overwrite() -> bool {
    true
}
