use super::*;
use crate::domain::entities::{Graph, GraphBuilder};
use crate::domain::value_objects::{EdgeCondition, NodeKind, Severity};

fn id(name: &str) -> NodeId {
    NodeId::new(name, name)
}

fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> Graph {
    let mut builder = GraphBuilder::new("Demo", "/tmp/demo");
    for node in nodes {
        builder.add_node(node).unwrap();
    }
    for edge in edges {
        builder.add_edge(edge);
    }
    builder.build()
}

fn node(name: &str, kind: NodeKind) -> Node {
    Node::new(name, name, kind)
}

fn edge(source: &str, target: &str, linking: LinkingKind) -> Edge {
    Edge::new(id(source), id(target), linking)
}

fn lint(graph: &Graph, options: &LintOptions) -> Vec<LintingIssue> {
    GraphLinter::new().lint(&GraphTraverser::new(graph), options)
}

fn rules(issues: &[LintingIssue]) -> Vec<LintRule> {
    issues.iter().map(|i| i.rule).collect()
}

/// App links two dynamic features that both link `Shared` statically
fn duplicated_static_graph(shared_edge: Option<EdgeCondition>) -> Graph {
    let mut shared_b = edge("FeatureB", "Shared", LinkingKind::Static);
    if let Some(condition) = shared_edge {
        shared_b = shared_b.with_condition(condition);
    }
    build(
        vec![
            node("App", NodeKind::App),
            node("FeatureA", NodeKind::Framework),
            node("FeatureB", NodeKind::Framework),
            node("Shared", NodeKind::StaticLibrary),
        ],
        vec![
            edge("App", "FeatureA", LinkingKind::Dynamic),
            edge("App", "FeatureB", LinkingKind::Dynamic),
            edge("FeatureA", "Shared", LinkingKind::Static),
            shared_b,
        ],
    )
}

// === cycles ===

#[test]
fn cycle_yields_one_error_naming_its_nodes() {
    let graph = build(
        vec![
            node("A", NodeKind::Framework),
            node("B", NodeKind::Framework),
            node("C", NodeKind::Framework),
        ],
        vec![
            edge("A", "B", LinkingKind::Dynamic),
            edge("B", "C", LinkingKind::Dynamic),
            edge("C", "A", LinkingKind::Dynamic),
        ],
    );

    let issues = lint(&graph, &LintOptions::default());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Error);
    assert_eq!(issues[0].rule, LintRule::Cycle);
    assert!(issues[0].reason.contains("A -> B -> C -> A"));
    assert_eq!(issues[0].subject, IssueSubject::Node { id: id("A") });
}

#[test]
fn acyclic_graph_is_clean() {
    let graph = build(
        vec![node("App", NodeKind::App), node("Core", NodeKind::Framework)],
        vec![edge("App", "Core", LinkingKind::Dynamic)],
    );

    assert!(lint(&graph, &LintOptions::default()).is_empty());
}

// === static duplication ===

#[test]
fn static_product_linked_twice_warns_once() {
    let graph = duplicated_static_graph(None);

    let issues = lint(&graph, &LintOptions::default());
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert_eq!(issues[0].rule, LintRule::StaticProductDuplication);
    assert_eq!(issues[0].subject, IssueSubject::Node { id: id("Shared") });
    assert!(issues[0].reason.contains("App"));
    assert!(issues[0].reason.contains("Shared"));
    assert!(issues[0].reason.contains("FeatureA, FeatureB"));
}

#[test]
fn static_duplication_lint_can_be_disabled() {
    let graph = duplicated_static_graph(None);
    let options = LintOptions::default().with_disable_static_products_lint(true);

    assert!(lint(&graph, &options).is_empty());
}

#[test]
fn static_duplication_is_evaluated_per_configuration() {
    let graph = duplicated_static_graph(Some(EdgeCondition::for_configurations(["Debug"])));

    let both = LintOptions::default();
    assert_eq!(lint(&graph, &both).len(), 1);

    let release_only = LintOptions::default().with_configurations(vec!["Release".to_string()]);
    assert!(lint(&graph, &release_only).is_empty());
}

#[test]
fn static_linked_once_per_linker_is_fine() {
    let graph = build(
        vec![
            node("App", NodeKind::App),
            node("Feature", NodeKind::StaticLibrary),
            node("Shared", NodeKind::StaticLibrary),
        ],
        vec![
            edge("App", "Feature", LinkingKind::Static),
            edge("App", "Shared", LinkingKind::Static),
            edge("Feature", "Shared", LinkingKind::Static),
        ],
    );

    assert!(lint(&graph, &LintOptions::default()).is_empty());
}

// === platforms ===

#[test]
fn target_missing_required_platform_is_an_error() {
    let graph = build(
        vec![
            node("App", NodeKind::App).with_platforms([Platform::Ios, Platform::Macos]),
            node("Kit", NodeKind::Framework).with_platforms([Platform::Ios]),
        ],
        vec![edge("App", "Kit", LinkingKind::Dynamic)],
    );

    let issues = lint(&graph, &LintOptions::default());
    assert_eq!(rules(&issues), vec![LintRule::PlatformMismatch]);
    assert!(issues[0].reason.ends_with("macOS"));
    assert_eq!(
        issues[0].subject,
        IssueSubject::Edge {
            source: id("App"),
            target: id("Kit"),
        }
    );
}

#[test]
fn platform_condition_narrows_requirements() {
    let graph = build(
        vec![
            node("App", NodeKind::App).with_platforms([Platform::Ios, Platform::Macos]),
            node("Kit", NodeKind::Framework).with_platforms([Platform::Ios]),
        ],
        vec![edge("App", "Kit", LinkingKind::Dynamic)
            .with_condition(EdgeCondition::for_platforms([Platform::Ios]))],
    );

    assert!(lint(&graph, &LintOptions::default()).is_empty());
}

// === references and links ===

#[test]
fn dangling_edge_is_a_missing_reference() {
    let graph = build(
        vec![node("App", NodeKind::App)],
        vec![edge("App", "Ghost", LinkingKind::Dynamic)],
    );

    let issues = lint(&graph, &LintOptions::default());
    assert_eq!(rules(&issues), vec![LintRule::MissingReference]);
    assert!(issues[0].is_error());
    assert!(issues[0].reason.contains("internal defect"));
}

#[test]
fn unit_tests_and_apps_are_not_libraries() {
    let graph = build(
        vec![
            node("App", NodeKind::App),
            node("AppTests", NodeKind::UnitTests),
            node("Core", NodeKind::Framework),
            node("Widget", NodeKind::Plugin),
        ],
        vec![
            edge("AppTests", "App", LinkingKind::Dynamic),
            edge("Widget", "App", LinkingKind::Dynamic),
            edge("Core", "AppTests", LinkingKind::Dynamic),
            edge("Core", "App", LinkingKind::Dynamic),
        ],
    );

    let issues = lint(&graph, &LintOptions::default());
    assert_eq!(
        rules(&issues),
        vec![LintRule::InvalidLink, LintRule::InvalidLink]
    );
    assert!(issues[0].reason.contains("unit-test"));
    assert!(issues[1].reason.contains("application App"));
}

#[test]
fn shared_names_at_different_paths_warn() {
    let graph = build(
        vec![
            Node::new("Core", "Modules/A", NodeKind::Framework),
            Node::new("Core", "Modules/B", NodeKind::Framework),
        ],
        vec![],
    );

    let issues = lint(&graph, &LintOptions::default());
    assert_eq!(rules(&issues), vec![LintRule::DuplicateName]);
    assert!(issues[0].is_warning());
    assert!(issues[0].reason.contains("Modules/A, Modules/B"));
}

// === aggregation ===

#[test]
fn independent_violations_are_all_reported_in_order() {
    let graph = build(
        vec![
            node("A", NodeKind::Framework),
            node("B", NodeKind::Framework),
            node("App", NodeKind::App).with_platforms([Platform::Ios]),
            node("MacKit", NodeKind::Framework).with_platforms([Platform::Macos]),
            node("TvKit", NodeKind::Framework).with_platforms([Platform::Tvos]),
        ],
        vec![
            edge("A", "B", LinkingKind::Dynamic),
            edge("B", "A", LinkingKind::Dynamic),
            edge("App", "TvKit", LinkingKind::Dynamic),
            edge("App", "MacKit", LinkingKind::Dynamic),
        ],
    );

    let issues = lint(&graph, &LintOptions::default());
    assert_eq!(
        rules(&issues),
        vec![
            LintRule::Cycle,
            LintRule::PlatformMismatch,
            LintRule::PlatformMismatch,
        ]
    );
    assert!(issues[1].reason.starts_with("App depends on TvKit"));
    assert!(issues[2].reason.starts_with("App depends on MacKit"));
}

#[test]
fn lint_is_deterministic() {
    let graph = duplicated_static_graph(None);
    let options = LintOptions::default();

    assert_eq!(lint(&graph, &options), lint(&graph, &options));
}
