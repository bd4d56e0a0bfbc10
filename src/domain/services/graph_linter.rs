//! Graph linter
//!
//! Pure rule engine over a `GraphTraverser`. Every rule runs; none
//! short-circuits. Issues come out in rule order, each rule reporting in
//! discovery order, so two runs over one graph report identically.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::entities::{Edge, Node};
use crate::domain::value_objects::{
    BuildContext, IssueSubject, LintRule, LintingIssue, LinkingKind, NodeId, Platform,
};

use super::traverser::GraphTraverser;

/// Knobs for a lint pass
#[derive(Debug, Clone)]
pub struct LintOptions {
    pub disable_static_products_lint: bool,
    /// Configurations each conditional edge is resolved against
    pub configurations: Vec<String>,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            disable_static_products_lint: false,
            configurations: vec!["Debug".to_string(), "Release".to_string()],
        }
    }
}

impl LintOptions {
    pub fn with_disable_static_products_lint(mut self, disable: bool) -> Self {
        self.disable_static_products_lint = disable;
        self
    }

    pub fn with_configurations(mut self, configurations: Vec<String>) -> Self {
        self.configurations = configurations;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphLinter;

impl GraphLinter {
    pub fn new() -> Self {
        Self
    }

    pub fn lint(&self, traverser: &GraphTraverser<'_>, options: &LintOptions) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        issues.extend(self.lint_cycles(traverser));
        if !options.disable_static_products_lint {
            issues.extend(self.lint_static_products(traverser, &options.configurations));
        }
        issues.extend(self.lint_platforms(traverser));
        issues.extend(self.lint_missing_references(traverser));
        issues.extend(self.lint_invalid_links(traverser));
        issues.extend(self.lint_duplicate_names(traverser));
        issues
    }

    fn lint_cycles(&self, traverser: &GraphTraverser<'_>) -> Vec<LintingIssue> {
        traverser
            .cycles()
            .into_iter()
            .map(|cycle| {
                let subject = match cycle.nodes().first() {
                    Some(id) => IssueSubject::Node { id: id.clone() },
                    None => IssueSubject::Workspace,
                };
                LintingIssue::error(
                    LintRule::Cycle,
                    subject,
                    format!("Found circular dependency between nodes: {}", cycle),
                )
            })
            .collect()
    }

    /// Warn when one static product ends up in several linkers of the same
    /// final product. Each of those linkers carries its own copy, which
    /// fails with duplicate symbols or misbehaves at runtime.
    fn lint_static_products(
        &self,
        traverser: &GraphTraverser<'_>,
        configurations: &[String],
    ) -> Vec<LintingIssue> {
        let mut issues = Vec::new();
        let mut reported: HashSet<(NodeId, NodeId)> = HashSet::new();

        let products: Vec<&Node> = traverser
            .graph()
            .nodes()
            .filter(|node| {
                node.kind().is_final_product()
                    || (node.kind().is_linker() && traverser.dependents(node.id()).is_empty())
            })
            .collect();

        for context in traverser.build_contexts(configurations) {
            for product in &products {
                let linkers = Self::linkers_loaded_by(traverser, product, &context);

                let mut linked_by: BTreeMap<&NodeId, Vec<&str>> = BTreeMap::new();
                for linker in &linkers {
                    for dependency in traverser.static_dependencies(linker.id(), &context) {
                        linked_by
                            .entry(dependency.id())
                            .or_default()
                            .push(linker.name());
                    }
                }

                for (dependency, linkers) in linked_by {
                    if linkers.len() < 2
                        || !reported.insert((product.id().clone(), dependency.clone()))
                    {
                        continue;
                    }
                    issues.push(LintingIssue::warning(
                        LintRule::StaticProductDuplication,
                        IssueSubject::Node {
                            id: dependency.clone(),
                        },
                        format!(
                            "{} has the static product dependency {} linked more than once \
                             (through {}), which can cause duplicate symbols",
                            product.name(),
                            dependency.name,
                            linkers.join(", ")
                        ),
                    ));
                }
            }
        }

        issues
    }

    /// The product plus every dynamically loaded linker beneath it
    fn linkers_loaded_by<'g>(
        traverser: &GraphTraverser<'g>,
        product: &'g Node,
        context: &BuildContext,
    ) -> Vec<&'g Node> {
        let mut linkers = vec![product];
        let mut seen: HashSet<&NodeId> = HashSet::from([product.id()]);
        let mut index = 0;

        while index < linkers.len() {
            let current = linkers[index];
            index += 1;
            for dependency in traverser.linkable_dependencies(current.id(), context) {
                let loads_separately = match dependency.linking {
                    LinkingKind::Dynamic | LinkingKind::Embed => true,
                    LinkingKind::Static | LinkingKind::CopyOnly => false,
                };
                if loads_separately && seen.insert(dependency.node.id()) {
                    linkers.push(dependency.node);
                }
            }
        }

        linkers
    }

    fn lint_platforms(&self, traverser: &GraphTraverser<'_>) -> Vec<LintingIssue> {
        let graph = traverser.graph();
        graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = graph.node(&edge.source)?;
                let target = graph.node(&edge.target)?;
                let missing = Self::unsupported_platforms(edge, source, target);
                if missing.is_empty() {
                    return None;
                }
                let platforms: Vec<String> = missing.iter().map(|p| p.to_string()).collect();
                Some(LintingIssue::error(
                    LintRule::PlatformMismatch,
                    Self::edge_subject(edge),
                    format!(
                        "{} depends on {}, which does not support the required platforms: {}",
                        source.name(),
                        target.name(),
                        platforms.join(", ")
                    ),
                ))
            })
            .collect()
    }

    /// Platforms the source needs through `edge` that the target lacks
    fn unsupported_platforms(edge: &Edge, source: &Node, target: &Node) -> BTreeSet<Platform> {
        source
            .platforms()
            .iter()
            .copied()
            .filter(|p| edge.condition.platforms.is_empty() || edge.condition.platforms.contains(p))
            .filter(|p| !target.supports(*p))
            .collect()
    }

    fn lint_missing_references(&self, traverser: &GraphTraverser<'_>) -> Vec<LintingIssue> {
        let graph = traverser.graph();
        graph
            .dangling_edges()
            .map(|edge| {
                let missing = if graph.contains(&edge.source) {
                    &edge.target
                } else {
                    &edge.source
                };
                LintingIssue::error(
                    LintRule::MissingReference,
                    Self::edge_subject(edge),
                    format!(
                        "Dependency {} -> {} references '{}', which is not part of the graph \
                         (internal defect)",
                        edge.source.name, edge.target.name, missing
                    ),
                )
            })
            .collect()
    }

    fn lint_invalid_links(&self, traverser: &GraphTraverser<'_>) -> Vec<LintingIssue> {
        use crate::domain::value_objects::NodeKind;

        let graph = traverser.graph();
        graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let source = graph.node(&edge.source)?;
                let target = graph.node(&edge.target)?;
                let reason = match (source.kind(), target.kind()) {
                    (_, NodeKind::UnitTests) => format!(
                        "{} depends on {}, but unit-test bundles cannot be dependencies",
                        source.name(),
                        target.name()
                    ),
                    (NodeKind::UnitTests | NodeKind::Plugin, NodeKind::App) => return None,
                    (_, NodeKind::App) => format!(
                        "{} depends on the application {}; only unit tests and plugins can",
                        source.name(),
                        target.name()
                    ),
                    _ => return None,
                };
                Some(LintingIssue::error(
                    LintRule::InvalidLink,
                    Self::edge_subject(edge),
                    reason,
                ))
            })
            .collect()
    }

    fn lint_duplicate_names(&self, traverser: &GraphTraverser<'_>) -> Vec<LintingIssue> {
        let mut by_name: BTreeMap<&str, Vec<&Node>> = BTreeMap::new();
        for node in traverser.graph().nodes() {
            by_name.entry(node.name()).or_default().push(node);
        }

        by_name
            .into_iter()
            .filter(|(_, nodes)| nodes.len() > 1)
            .map(|(name, nodes)| {
                let paths: Vec<String> = nodes
                    .iter()
                    .map(|n| n.path().display().to_string())
                    .collect();
                LintingIssue::warning(
                    LintRule::DuplicateName,
                    IssueSubject::Node {
                        id: nodes[0].id().clone(),
                    },
                    format!(
                        "Nodes named '{}' are declared at {}; their products will collide",
                        name,
                        paths.join(", ")
                    ),
                )
            })
            .collect()
    }

    fn edge_subject(edge: &Edge) -> IssueSubject {
        IssueSubject::Edge {
            source: edge.source.clone(),
            target: edge.target.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
