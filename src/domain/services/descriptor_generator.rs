//! Descriptor generator
//!
//! Turns a linted graph into a `WorkspaceDescriptor`. Pure and
//! deterministic: nodes are visited in topological order, every map is
//! ordered, and nothing is read from outside the graph.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::domain::entities::{
    DependencyReference, FileReference, FileReferenceKind, Node, ProjectDescriptor,
    WorkspaceDescriptor,
};
use crate::domain::value_objects::{BuildContext, LinkingKind, NodeId, SettingsMap};

use super::traverser::GraphTraverser;

pub const INHERITED: &str = "$(inherited)";

/// Effective propagated settings of every generated node, per configuration
type PropagatedSettings = BTreeMap<NodeId, BTreeMap<String, SettingsMap>>;
pub const WORKSPACE_EXTENSION: &str = "keelworkspace";
pub const PROJECT_EXTENSION: &str = "keelproj";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("'{node}' depends on '{dependency}', which has not been generated yet")]
    DependencyNotGenerated { node: NodeId, dependency: NodeId },

    #[error("setting {key} of '{node}' references unknown setting ${{{reference}}}")]
    UnknownSetting {
        node: NodeId,
        key: String,
        reference: String,
    },

    #[error("setting {key} of '{node}' references itself")]
    RecursiveSetting { node: NodeId, key: String },
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Configurations every project is resolved for
    pub configurations: Vec<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            configurations: vec!["Debug".to_string(), "Release".to_string()],
        }
    }
}

impl GeneratorOptions {
    pub fn with_configurations(mut self, configurations: Vec<String>) -> Self {
        self.configurations = configurations;
        self
    }

    fn effective_configurations(&self) -> Vec<String> {
        if self.configurations.is_empty() {
            vec!["Debug".to_string()]
        } else {
            self.configurations.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorGenerator;

impl DescriptorGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_workspace(
        &self,
        traverser: &GraphTraverser<'_>,
        options: &GeneratorOptions,
    ) -> Result<WorkspaceDescriptor, GenerationError> {
        let configurations = options.effective_configurations();
        let mut propagated = PropagatedSettings::new();
        let mut projects = Vec::with_capacity(traverser.graph().node_count());

        for node in traverser.topological_order() {
            let project =
                self.generate_project(traverser, node, &configurations, &mut propagated)?;
            projects.push(project);
        }

        Ok(WorkspaceDescriptor {
            path: traverser
                .path()
                .join(format!("{}.{}", traverser.name(), WORKSPACE_EXTENSION)),
            name: traverser.name().to_string(),
            projects,
        })
    }

    fn generate_project(
        &self,
        traverser: &GraphTraverser<'_>,
        node: &Node,
        configurations: &[String],
        propagated: &mut PropagatedSettings,
    ) -> Result<ProjectDescriptor, GenerationError> {
        let dependencies = Self::dependency_references(traverser, node);
        for dependency in &dependencies {
            if !propagated.contains_key(&dependency.node) {
                return Err(GenerationError::DependencyNotGenerated {
                    node: node.id().clone(),
                    dependency: dependency.node.clone(),
                });
            }
        }

        let mut resolved: BTreeMap<String, SettingsMap> = BTreeMap::new();
        let mut exported: BTreeMap<String, SettingsMap> = BTreeMap::new();
        for configuration in configurations {
            let context = BuildContext::new(None, configuration.clone());
            let inherited = Self::inherited_settings(traverser, node, &context, propagated);

            let mut own_propagated = inherited.clone();
            overlay(&mut own_propagated, &node.settings().propagated);
            exported.insert(configuration.clone(), own_propagated);

            resolved.insert(
                configuration.clone(),
                Self::resolve_settings(node, inherited, &context)?,
            );
        }
        propagated.insert(node.id().clone(), exported);

        Ok(ProjectDescriptor {
            path: traverser
                .path()
                .join(node.path())
                .join(format!("{}.{}", node.name(), PROJECT_EXTENSION)),
            node: node.id().clone(),
            kind: node.kind(),
            settings: Self::shared_settings(&resolved),
            configurations: resolved,
            file_references: Self::file_references(node),
            dependencies,
        })
    }

    /// Distinct direct dependencies with their resolved linking kind
    ///
    /// Condition-independent: a dependency that applies to any context is
    /// listed. The first declared edge to a target decides its kind.
    fn dependency_references(traverser: &GraphTraverser<'_>, node: &Node) -> Vec<DependencyReference> {
        let mut references: BTreeMap<&NodeId, LinkingKind> = BTreeMap::new();
        for edge in traverser.graph().edges_from(node.id()) {
            let Some(target) = traverser.node(&edge.target) else {
                continue;
            };
            references
                .entry(target.id())
                .or_insert_with(|| LinkingKind::resolve(edge.linking, target.kind()));
        }
        references
            .into_iter()
            .map(|(id, linking)| DependencyReference {
                node: id.clone(),
                linking,
            })
            .collect()
    }

    /// What the directly linked dependencies pass down under `context`
    ///
    /// Each dependency contributes its effective propagated settings, which
    /// already include everything its own dependency chain propagated.
    /// Dependencies are overlaid in `(name, path)` order.
    fn inherited_settings(
        traverser: &GraphTraverser<'_>,
        node: &Node,
        context: &BuildContext,
        propagated: &PropagatedSettings,
    ) -> SettingsMap {
        let mut linked: BTreeSet<&NodeId> = BTreeSet::new();
        for edge in traverser.graph().edges_from(node.id()) {
            if &edge.target == node.id() || !edge.condition.matches(context) {
                continue;
            }
            let Some(target) = traverser.node(&edge.target) else {
                continue;
            };
            if LinkingKind::resolve(edge.linking, target.kind()).links() {
                linked.insert(target.id());
            }
        }

        let mut settings = SettingsMap::new();
        for id in linked {
            if let Some(layer) = propagated
                .get(id)
                .and_then(|by_configuration| by_configuration.get(&context.configuration))
            {
                overlay(&mut settings, layer);
            }
        }
        settings
    }

    /// Layers: inherited → derived → base → configuration override
    fn resolve_settings(
        node: &Node,
        mut settings: SettingsMap,
        context: &BuildContext,
    ) -> Result<SettingsMap, GenerationError> {
        overlay(&mut settings, &Self::derived_settings(node));
        overlay(&mut settings, &node.settings().base);
        if let Some(overrides) = node.settings().configurations.get(&context.configuration) {
            overlay(&mut settings, overrides);
        }

        expand_references(node.id(), &settings)
    }

    fn derived_settings(node: &Node) -> SettingsMap {
        let mut derived = SettingsMap::new();
        derived.insert("PRODUCT_NAME".to_string(), node.name().to_string());
        derived.insert(
            "PRODUCT_TYPE".to_string(),
            node.kind().product_type().to_string(),
        );
        if !node.platforms().is_empty() {
            let sdks: Vec<&str> = node.platforms().iter().map(|p| p.sdk_name()).collect();
            derived.insert("SUPPORTED_PLATFORMS".to_string(), sdks.join(" "));
        }
        derived
    }

    /// Entries equal in every configuration
    fn shared_settings(resolved: &BTreeMap<String, SettingsMap>) -> SettingsMap {
        let mut maps = resolved.values();
        let Some(first) = maps.next() else {
            return SettingsMap::new();
        };
        let rest: Vec<&SettingsMap> = maps.collect();
        first
            .iter()
            .filter(|(key, value)| rest.iter().all(|m| m.get(*key) == Some(*value)))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn file_references(node: &Node) -> Vec<FileReference> {
        let sources = node.sources().iter().map(|path| FileReference {
            path: path.clone(),
            kind: FileReferenceKind::Source,
        });
        let resources = node.resources().iter().map(|path| FileReference {
            path: path.clone(),
            kind: FileReferenceKind::Resource,
        });
        sources.chain(resources).collect()
    }
}

/// Apply `layer` on top of `settings`, expanding `$(inherited)` against the
/// value the key had before this layer
fn overlay(settings: &mut SettingsMap, layer: &SettingsMap) {
    for (key, value) in layer {
        let value = if value.contains(INHERITED) {
            let inherited = settings.get(key).map(String::as_str).unwrap_or_default();
            value.replace(INHERITED, inherited).trim().to_string()
        } else {
            value.clone()
        };
        settings.insert(key.clone(), value);
    }
}

/// Expand every `${KEY}` against the fully layered settings
fn expand_references(node: &NodeId, settings: &SettingsMap) -> Result<SettingsMap, GenerationError> {
    let mut expanded = SettingsMap::new();
    for key in settings.keys() {
        let mut visiting = BTreeSet::new();
        let value = expand_key(node, key, settings, &mut visiting)?;
        expanded.insert(key.clone(), value);
    }
    Ok(expanded)
}

fn expand_key(
    node: &NodeId,
    key: &str,
    settings: &SettingsMap,
    visiting: &mut BTreeSet<String>,
) -> Result<String, GenerationError> {
    if !visiting.insert(key.to_string()) {
        return Err(GenerationError::RecursiveSetting {
            node: node.clone(),
            key: key.to_string(),
        });
    }

    let raw = settings.get(key).map(String::as_str).unwrap_or_default();
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let reference = &rest[start + 2..start + 2 + len];
        if !settings.contains_key(reference) {
            return Err(GenerationError::UnknownSetting {
                node: node.clone(),
                key: key.to_string(),
                reference: reference.to_string(),
            });
        }
        out.push_str(&rest[..start]);
        out.push_str(&expand_key(node, reference, settings, visiting)?);
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);

    visiting.remove(key);
    Ok(out)
}
