//! Property tests for graph traversal and ordering.

use std::collections::BTreeSet;

use proptest::prelude::*;

use keel::domain::entities::{Edge, Graph, GraphBuilder, Node};
use keel::domain::services::GraphTraverser;
use keel::domain::value_objects::{LinkingKind, NodeId, NodeKind};

fn id(index: usize) -> NodeId {
    NodeId::new(format!("N{index}"), format!("N{index}"))
}

fn build(count: usize, edges: &[(usize, usize)]) -> Graph {
    let mut builder = GraphBuilder::new("Prop", "/w");
    for index in 0..count {
        builder
            .add_node(Node::new(
                format!("N{index}"),
                format!("N{index}"),
                NodeKind::Framework,
            ))
            .unwrap();
    }
    for (source, target) in edges {
        builder.add_edge(Edge::new(id(*source), id(*target), LinkingKind::Dynamic));
    }
    builder.build()
}

/// Any edge set, cycles and self-loops included
fn any_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..=8).prop_flat_map(|count| {
        (
            Just(count),
            proptest::collection::vec((0..count, 0..count), 0..=20),
        )
    })
}

/// Edges only point from higher to lower indices, so the graph is acyclic
fn acyclic_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    any_graph().prop_map(|(count, edges)| {
        let edges = edges
            .into_iter()
            .filter(|(a, b)| a != b)
            .map(|(a, b)| (a.max(b), a.min(b)))
            .collect();
        (count, edges)
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every query terminates, whatever the cycles.
    #[test]
    fn property_traversal_terminates((count, edges) in any_graph()) {
        let graph = build(count, &edges);
        let traverser = GraphTraverser::new(&graph);

        for index in 0..count {
            let walk = traverser.transitive_dependencies(&id(index));
            let unique: BTreeSet<&NodeId> = walk.ids().into_iter().collect();
            prop_assert_eq!(unique.len(), walk.nodes.len());
            prop_assert!(!unique.contains(&id(index)));
        }
        prop_assert_eq!(traverser.topological_order().len(), count);
        let _ = traverser.cycles();
    }

    /// PROPERTY: Topological order is a permutation with dependencies first.
    #[test]
    fn property_topological_order_respects_edges((count, edges) in acyclic_graph()) {
        let graph = build(count, &edges);
        let traverser = GraphTraverser::new(&graph);
        let order: Vec<NodeId> = traverser
            .topological_order()
            .into_iter()
            .map(|n| n.id().clone())
            .collect();

        let sorted: BTreeSet<NodeId> = order.iter().cloned().collect();
        let expected: BTreeSet<NodeId> = (0..count).map(id).collect();
        prop_assert_eq!(order.len(), count);
        prop_assert_eq!(sorted, expected);

        let position = |node: &NodeId| order.iter().position(|n| n == node);
        for (source, target) in &edges {
            prop_assert!(position(&id(*target)) < position(&id(*source)));
        }
        prop_assert!(traverser.cycles().is_empty());
    }

    /// PROPERTY: A node reaches everything its direct dependencies reach.
    #[test]
    fn property_transitive_closure_is_closed((count, edges) in acyclic_graph()) {
        let graph = build(count, &edges);
        let traverser = GraphTraverser::new(&graph);

        for index in 0..count {
            let reached: BTreeSet<NodeId> = traverser
                .transitive_dependencies(&id(index))
                .ids()
                .into_iter()
                .cloned()
                .collect();
            for direct in traverser.direct_dependencies(&id(index)) {
                prop_assert!(reached.contains(direct.id()));
                for further in traverser.transitive_dependencies(direct.id()).ids() {
                    prop_assert!(reached.contains(further));
                }
            }
        }
    }
}
