//! Linking value objects
//!
//! How a dependency is incorporated into its consumer, and under which
//! build context an edge applies.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{NodeKind, Platform};

/// How a dependency is incorporated into its consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkingKind {
    Dynamic,
    Static,
    /// Linked dynamically and copied into the consumer's bundle
    Embed,
    /// Copied or hosted, never linked
    CopyOnly,
}

impl LinkingKind {
    /// Resolve the effective linking kind of an edge from what the manifest
    /// declared and what the target actually produces.
    pub fn resolve(declared: LinkingKind, target: NodeKind) -> LinkingKind {
        if declared == LinkingKind::CopyOnly {
            return LinkingKind::CopyOnly;
        }
        match target {
            NodeKind::StaticLibrary | NodeKind::StaticFramework => LinkingKind::Static,
            NodeKind::App | NodeKind::UnitTests => LinkingKind::CopyOnly,
            NodeKind::Plugin => LinkingKind::Embed,
            NodeKind::Framework | NodeKind::DynamicLibrary => match declared {
                LinkingKind::Embed => LinkingKind::Embed,
                _ => LinkingKind::Dynamic,
            },
            NodeKind::Package => declared,
        }
    }

    pub fn links(&self) -> bool {
        !matches!(self, LinkingKind::CopyOnly)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkingKind::Dynamic => "dynamic",
            LinkingKind::Static => "static",
            LinkingKind::Embed => "embed",
            LinkingKind::CopyOnly => "copy_only",
        }
    }
}

impl std::fmt::Display for LinkingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform/configuration filter on an edge
///
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeCondition {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub platforms: BTreeSet<Platform>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub configurations: BTreeSet<String>,
}

impl EdgeCondition {
    pub fn for_platforms(platforms: impl IntoIterator<Item = Platform>) -> Self {
        Self {
            platforms: platforms.into_iter().collect(),
            configurations: BTreeSet::new(),
        }
    }

    pub fn for_configurations<S: Into<String>>(configurations: impl IntoIterator<Item = S>) -> Self {
        Self {
            platforms: BTreeSet::new(),
            configurations: configurations.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unconditional(&self) -> bool {
        self.platforms.is_empty() && self.configurations.is_empty()
    }

    pub fn matches(&self, context: &BuildContext) -> bool {
        let platform_ok = match context.platform {
            Some(platform) => self.platforms.is_empty() || self.platforms.contains(&platform),
            None => true,
        };
        let configuration_ok =
            self.configurations.is_empty() || self.configurations.contains(&context.configuration);
        platform_ok && configuration_ok
    }
}

/// One concrete platform + configuration resolution
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildContext {
    /// `None` matches edges of every platform (graphs without platforms)
    pub platform: Option<Platform>,
    pub configuration: String,
}

impl BuildContext {
    pub fn new(platform: Option<Platform>, configuration: impl Into<String>) -> Self {
        Self {
            platform,
            configuration: configuration.into(),
        }
    }
}

impl std::fmt::Display for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.platform {
            Some(platform) => write!(f, "{}/{}", platform, self.configuration),
            None => f.write_str(&self.configuration),
        }
    }
}
