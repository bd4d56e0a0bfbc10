//! Node kind value object

use serde::{Deserialize, Serialize};

/// What a node produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Application bundle
    App,
    /// Dynamic framework
    Framework,
    /// Framework linked statically into its consumers
    StaticFramework,
    StaticLibrary,
    DynamicLibrary,
    /// Unit-test bundle
    UnitTests,
    /// Product of an external package
    Package,
    /// Loadable plugin/extension bundle
    Plugin,
}

impl NodeKind {
    /// Statically linked products get copied into every consumer that links them
    pub fn is_static(&self) -> bool {
        matches!(self, NodeKind::StaticLibrary | NodeKind::StaticFramework)
    }

    /// Products that run the linker themselves
    pub fn is_linker(&self) -> bool {
        match self {
            NodeKind::App
            | NodeKind::Framework
            | NodeKind::DynamicLibrary
            | NodeKind::UnitTests
            | NodeKind::Plugin => true,
            NodeKind::StaticFramework | NodeKind::StaticLibrary | NodeKind::Package => false,
        }
    }

    /// Products that are always the top of a linking tree
    pub fn is_final_product(&self) -> bool {
        matches!(self, NodeKind::App | NodeKind::UnitTests | NodeKind::Plugin)
    }

    /// Products that carry a bundle property list
    pub fn has_bundle(&self) -> bool {
        matches!(
            self,
            NodeKind::App | NodeKind::Framework | NodeKind::UnitTests | NodeKind::Plugin
        )
    }

    /// Product type identifier written into generated settings
    pub fn product_type(&self) -> &'static str {
        match self {
            NodeKind::App => "application",
            NodeKind::Framework => "framework",
            NodeKind::StaticFramework => "static-framework",
            NodeKind::StaticLibrary => "static-library",
            NodeKind::DynamicLibrary => "dynamic-library",
            NodeKind::UnitTests => "unit-test-bundle",
            NodeKind::Package => "package-product",
            NodeKind::Plugin => "plugin",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.product_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_kinds() {
        assert!(NodeKind::StaticLibrary.is_static());
        assert!(NodeKind::StaticFramework.is_static());
        assert!(!NodeKind::Framework.is_static());
        assert!(!NodeKind::Package.is_static());
    }

    #[test]
    fn static_kinds_never_link() {
        for kind in [NodeKind::StaticLibrary, NodeKind::StaticFramework] {
            assert!(!kind.is_linker());
        }
    }

    #[test]
    fn kind_deserializes_snake_case() {
        let kind: NodeKind = serde_json::from_str("\"static_framework\"").unwrap();
        assert_eq!(kind, NodeKind::StaticFramework);
    }
}
