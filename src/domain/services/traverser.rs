//! Graph traverser
//!
//! Read-only query layer over a `Graph`: transitive closure, cycle
//! discovery, topological ordering and linking resolution. Holds only
//! indexes derived at construction; every query is a pure function of the
//! borrowed graph.
//!
//! Cycles never make a query loop or fail. They are recorded and returned
//! next to a best-effort result so the linter can report them.

use std::collections::{btree_set, BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use crate::domain::entities::{Graph, Node};
use crate::domain::value_objects::{BuildContext, LinkingKind, NodeId, NodeKind};

/// A dependency cycle, rotated so its smallest node id comes first
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycle(Vec<NodeId>);

impl Cycle {
    fn normalized(mut path: Vec<NodeId>) -> Self {
        if let Some(start) = path
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(index, _)| index)
        {
            path.rotate_left(start);
        }
        Self(path)
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|id| id.name.as_str()).collect()
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        if let Some(first) = names.first().copied() {
            names.push(first);
        }
        f.write_str(&names.join(" -> "))
    }
}

/// Result of a transitive walk: dependencies in post-order plus any cycles
#[derive(Debug, Clone, Default)]
pub struct Traversal<'g> {
    pub nodes: Vec<&'g Node>,
    pub cycles: Vec<Cycle>,
}

impl Traversal<'_> {
    pub fn ids(&self) -> Vec<&NodeId> {
        self.nodes.iter().map(|n| n.id()).collect()
    }
}

/// A dependency together with its resolved linking kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedDependency<'g> {
    pub node: &'g Node,
    pub linking: LinkingKind,
}

pub struct GraphTraverser<'g> {
    graph: &'g Graph,
    dependents: BTreeMap<&'g NodeId, BTreeSet<&'g NodeId>>,
}

impl<'g> GraphTraverser<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let mut dependents: BTreeMap<&'g NodeId, BTreeSet<&'g NodeId>> = BTreeMap::new();
        for edge in graph.edges() {
            if let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
            {
                dependents.entry(target.id()).or_default().insert(source.id());
            }
        }
        Self { graph, dependents }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Root directory of the workspace
    pub fn path(&self) -> &'g Path {
        self.graph.path()
    }

    pub fn name(&self) -> &'g str {
        self.graph.name()
    }

    pub fn node(&self, id: &NodeId) -> Option<&'g Node> {
        self.graph.node(id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&'g Node> {
        self.graph.nodes().filter(|n| n.kind() == kind).collect()
    }

    /// Distinct ids of present targets of `id`'s edges, in `(name, path)` order
    fn dependency_ids(&self, id: &NodeId) -> BTreeSet<&'g NodeId> {
        self.graph
            .edges_from(id)
            .filter_map(|edge| self.graph.node(&edge.target))
            .map(Node::id)
            .collect()
    }

    /// Distinct direct dependencies, in `(name, path)` order
    pub fn direct_dependencies(&self, id: &NodeId) -> Vec<&'g Node> {
        self.dependency_ids(id)
            .into_iter()
            .filter_map(|dep| self.graph.node(dep))
            .collect()
    }

    /// Nodes that depend directly on `id`, in `(name, path)` order
    pub fn dependents(&self, id: &NodeId) -> Vec<&'g Node> {
        self.dependents
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|dep| self.graph.node(dep))
            .collect()
    }

    /// Every node reachable from `id`, dependencies before dependents
    ///
    /// The start node is never part of the result, even when it sits on a
    /// cycle. Cycles met on the way are returned alongside.
    pub fn transitive_dependencies(&self, id: &NodeId) -> Traversal<'g> {
        let Some(start) = self.graph.node(id) else {
            return Traversal::default();
        };

        let mut walk = DepthFirst::new(self);
        walk.visit(start.id());

        let start_id = start.id();
        Traversal {
            nodes: walk
                .order
                .into_iter()
                .filter(|n| n.id() != start_id)
                .collect(),
            cycles: walk.cycles,
        }
    }

    /// Every distinct cycle found by walking from each node in id order
    pub fn cycles(&self) -> Vec<Cycle> {
        let mut walk = DepthFirst::new(self);
        for node in self.graph.nodes() {
            if !walk.done.contains(node.id()) {
                walk.visit(node.id());
            }
        }
        walk.cycles
    }

    /// Nodes with dependencies first, ties broken by `(name, path)`
    ///
    /// On a cyclic graph the acyclic part comes first and nodes that could
    /// not be ordered are appended in id order.
    pub fn topological_order(&self) -> Vec<&'g Node> {
        let mut pending: BTreeMap<&'g NodeId, usize> = self
            .graph
            .nodes()
            .map(|n| (n.id(), self.dependency_ids(n.id()).len()))
            .collect();

        let mut ready: BTreeSet<&'g NodeId> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();
        for id in &ready {
            pending.remove(*id);
        }

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(id) = ready.pop_first() {
            if let Some(node) = self.graph.node(id) {
                order.push(node);
            }
            for dependent in self.dependents.get(id).into_iter().flatten() {
                if let Some(count) = pending.get_mut(*dependent) {
                    *count -= 1;
                    if *count == 0 {
                        pending.remove(*dependent);
                        ready.insert(*dependent);
                    }
                }
            }
        }

        order.extend(pending.keys().filter_map(|id| self.graph.node(id)));
        order
    }

    /// Dependencies `id` links against under `context`
    ///
    /// Edges whose condition does not match the context are excluded.
    /// Static dependencies do not link their own static dependencies, so
    /// those are linked by the consumer and appear here too. Copy-only
    /// relations are left out. Ordered by `(name, path)`.
    pub fn linkable_dependencies(
        &self,
        id: &NodeId,
        context: &BuildContext,
    ) -> Vec<LinkedDependency<'g>> {
        let mut found: BTreeMap<&'g NodeId, LinkedDependency<'g>> = BTreeMap::new();

        for edge in self.graph.edges_from(id) {
            if !edge.condition.matches(context) {
                continue;
            }
            let Some(target) = self.graph.node(&edge.target) else {
                continue;
            };
            if target.id() == id {
                continue;
            }
            let linking = LinkingKind::resolve(edge.linking, target.kind());
            if linking.links() {
                found.entry(target.id()).or_insert(LinkedDependency {
                    node: target,
                    linking,
                });
            }
        }

        let mut queue: Vec<&'g Node> = found
            .values()
            .filter(|d| d.linking == LinkingKind::Static)
            .map(|d| d.node)
            .collect();
        let mut seen: HashSet<&'g NodeId> = queue.iter().map(|n| n.id()).collect();

        while let Some(static_node) = queue.pop() {
            for edge in self.graph.edges_from(static_node.id()) {
                if !edge.condition.matches(context) {
                    continue;
                }
                let Some(target) = self.graph.node(&edge.target) else {
                    continue;
                };
                if target.id() == id
                    || LinkingKind::resolve(edge.linking, target.kind()) != LinkingKind::Static
                {
                    continue;
                }
                if seen.insert(target.id()) {
                    found.entry(target.id()).or_insert(LinkedDependency {
                        node: target,
                        linking: LinkingKind::Static,
                    });
                    queue.push(target);
                }
            }
        }

        found.into_values().collect()
    }

    /// Statically linked dependencies of `id` under `context`
    pub fn static_dependencies(&self, id: &NodeId, context: &BuildContext) -> Vec<&'g Node> {
        self.linkable_dependencies(id, context)
            .into_iter()
            .filter(|d| d.linking == LinkingKind::Static)
            .map(|d| d.node)
            .collect()
    }

    /// Every concrete platform × configuration the graph can be resolved for
    ///
    /// Graphs without declared platforms resolve once per configuration.
    pub fn build_contexts(&self, configurations: &[String]) -> Vec<BuildContext> {
        let configurations: Vec<String> = if configurations.is_empty() {
            vec!["Debug".to_string()]
        } else {
            configurations.to_vec()
        };

        let platforms = self.graph.platforms();
        if platforms.is_empty() {
            return configurations
                .into_iter()
                .map(|c| BuildContext::new(None, c))
                .collect();
        }

        platforms
            .into_iter()
            .flat_map(|platform| {
                configurations
                    .iter()
                    .map(move |c| BuildContext::new(Some(platform), c.clone()))
            })
            .collect()
    }
}

/// Depth-first walk with a *visiting* stack for cycle detection
///
/// Iterative: each frame on `pending` holds the dependencies of the node at
/// the same depth of `stack` that are still to be visited, so chain length
/// is bounded by the heap rather than the call stack.
struct DepthFirst<'t, 'g> {
    traverser: &'t GraphTraverser<'g>,
    stack: Vec<&'g NodeId>,
    pending: Vec<btree_set::IntoIter<&'g NodeId>>,
    on_stack: HashSet<&'g NodeId>,
    done: HashSet<&'g NodeId>,
    order: Vec<&'g Node>,
    cycles: Vec<Cycle>,
    seen_cycles: HashSet<Cycle>,
}

impl<'t, 'g> DepthFirst<'t, 'g> {
    fn new(traverser: &'t GraphTraverser<'g>) -> Self {
        Self {
            traverser,
            stack: Vec::new(),
            pending: Vec::new(),
            on_stack: HashSet::new(),
            done: HashSet::new(),
            order: Vec::new(),
            cycles: Vec::new(),
            seen_cycles: HashSet::new(),
        }
    }

    fn visit(&mut self, start: &'g NodeId) {
        self.enter(start);

        while let Some(deps) = self.pending.last_mut() {
            match deps.next() {
                Some(dep) if self.on_stack.contains(dep) => self.record_cycle(dep),
                Some(dep) if !self.done.contains(dep) => self.enter(dep),
                Some(_) => {}
                None => self.leave(),
            }
        }
    }

    fn enter(&mut self, id: &'g NodeId) {
        self.stack.push(id);
        self.on_stack.insert(id);
        self.pending.push(self.traverser.dependency_ids(id).into_iter());
    }

    /// Finish the node on top of the stack; post-order
    fn leave(&mut self) {
        self.pending.pop();
        let Some(id) = self.stack.pop() else {
            return;
        };
        self.on_stack.remove(id);
        self.done.insert(id);
        if let Some(node) = self.traverser.graph.node(id) {
            self.order.push(node);
        }
    }

    fn record_cycle(&mut self, repeated: &'g NodeId) {
        let Some(position) = self.stack.iter().position(|id| *id == repeated) else {
            return;
        };
        let cycle = Cycle::normalized(
            self.stack[position..]
                .iter()
                .map(|id| (*id).clone())
                .collect(),
        );
        if self.seen_cycles.insert(cycle.clone()) {
            self.cycles.push(cycle);
        }
    }
}
