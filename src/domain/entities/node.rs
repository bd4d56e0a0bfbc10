//! Node entity - a buildable or referenceable unit of the graph

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::value_objects::{NodeId, NodeKind, Platform, Settings};

/// A buildable or referenceable unit
///
/// Built once by a loader and never mutated after it is added to a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    platforms: BTreeSet<Platform>,
    sources: Vec<PathBuf>,
    resources: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Settings::is_empty")]
    settings: Settings,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_plist: Option<PathBuf>,
}

impl Node {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(name, path),
            kind,
            platforms: BTreeSet::new(),
            sources: Vec::new(),
            resources: Vec::new(),
            settings: Settings::default(),
            info_plist: None,
        }
    }

    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn with_sources<P: Into<PathBuf>>(mut self, sources: impl IntoIterator<Item = P>) -> Self {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resources<P: Into<PathBuf>>(
        mut self,
        resources: impl IntoIterator<Item = P>,
    ) -> Self {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_info_plist(mut self, path: impl Into<PathBuf>) -> Self {
        self.info_plist = Some(path.into());
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn path(&self) -> &Path {
        &self.id.path
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    /// An empty platform set means the node builds everywhere
    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn resources(&self) -> &[PathBuf] {
        &self.resources
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn info_plist(&self) -> Option<&Path> {
        self.info_plist.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_without_platforms_supports_everything() {
        let node = Node::new("Core", "Core", NodeKind::Framework);
        for platform in Platform::ALL {
            assert!(node.supports(platform));
        }
    }

    #[test]
    fn node_with_platforms_is_restricted() {
        let node = Node::new("Watch", "Watch", NodeKind::App).with_platforms([Platform::Watchos]);
        assert!(node.supports(Platform::Watchos));
        assert!(!node.supports(Platform::Ios));
    }

    #[test]
    fn builder_keeps_declared_order() {
        let node = Node::new("App", "App", NodeKind::App)
            .with_sources(["Sources/b.swift", "Sources/a.swift"])
            .with_resources(["Resources/Assets.xcassets"]);

        assert_eq!(
            node.sources(),
            &[PathBuf::from("Sources/b.swift"), PathBuf::from("Sources/a.swift")]
        );
        assert_eq!(node.resources().len(), 1);
    }
}
