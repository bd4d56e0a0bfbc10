//! Graph entity - nodes plus typed dependency edges
//!
//! A `Graph` is assembled once through `GraphBuilder` and is read-only
//! afterwards. Regeneration replaces the whole graph. Acyclicity is not
//! enforced here; the linter reports cycles.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::Node;
use crate::domain::value_objects::{EdgeCondition, LinkingKind, NodeId, Platform};

/// Directed dependency `source → target`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub linking: LinkingKind,
    #[serde(skip_serializing_if = "EdgeCondition::is_unconditional")]
    pub condition: EdgeCondition,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, linking: LinkingKind) -> Self {
        Self {
            source,
            target,
            linking,
            condition: EdgeCondition::default(),
        }
    }

    pub fn with_condition(mut self, condition: EdgeCondition) -> Self {
        self.condition = condition;
        self
    }
}

/// Workspace-level switches that influence linting and generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationOptions {
    pub disable_static_products_lint: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node '{id}' is declared more than once")]
    DuplicateNode { id: NodeId },
}

/// Nodes and edges scoped to a root path and a named workspace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    name: String,
    path: PathBuf,
    options: GenerationOptions,
    #[serde(serialize_with = "serialize_nodes")]
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    outgoing: BTreeMap<NodeId, Vec<usize>>,
}

fn serialize_nodes<S: Serializer>(
    nodes: &BTreeMap<NodeId, Node>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(nodes.values())
}

impl Graph {
    /// Workspace name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root directory everything is relative to
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// All nodes in `(name, path)` order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Outgoing edges of `id`, in insertion order
    pub fn edges_from<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.outgoing
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&index| &self.edges[index])
    }

    /// Edges with an endpoint missing from the node set
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| !self.nodes.contains_key(&e.source) || !self.nodes.contains_key(&e.target))
    }

    /// Union of every node's declared platforms
    pub fn platforms(&self) -> BTreeSet<Platform> {
        self.nodes
            .values()
            .flat_map(|n| n.platforms().iter().copied())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Construction-time API used by loaders
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    name: String,
    path: PathBuf,
    options: GenerationOptions,
    nodes: BTreeMap<NodeId, Node>,
    edges: Vec<Edge>,
    seen: HashSet<Edge>,
}

impl GraphBuilder {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            options: GenerationOptions::default(),
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(node.id()) {
            return Err(GraphError::DuplicateNode {
                id: node.id().clone(),
            });
        }
        self.nodes.insert(node.id().clone(), node);
        Ok(())
    }

    /// Add an edge; returns `false` when an identical edge already exists
    ///
    /// Endpoints are not checked here; they may be added later. Edges left
    /// dangling after `build` are reported by the linter as internal defects.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.seen.insert(edge.clone()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn build(self) -> Graph {
        let mut outgoing: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
        for (index, edge) in self.edges.iter().enumerate() {
            outgoing.entry(edge.source.clone()).or_default().push(index);
        }

        Graph {
            name: self.name,
            path: self.path,
            options: self.options,
            nodes: self.nodes,
            edges: self.edges,
            outgoing,
        }
    }
}
