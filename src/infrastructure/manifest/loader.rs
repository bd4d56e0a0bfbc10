//! TOML Graph Loader
//!
//! Implements the GraphLoader port for `keel.toml` manifests.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::domain::entities::{Edge, GenerationOptions, GraphBuilder, Node, SideEffectDescriptor};
use crate::domain::ports::{FileSystem, GraphLoader, LoadError, LoadedGraph};
use crate::domain::value_objects::{EdgeCondition, IssueSubject, LintRule, LintingIssue, NodeId};
use crate::infrastructure::fs::LocalFs;

use super::info_plist::derived_info_plist;
use super::schema::{DependencyEntry, ManifestFile, NodeEntry, SideEffectEntry};

/// Manifest file name, at the project root
pub const MANIFEST_FILE: &str = "keel.toml";

/// Loads `<root>/keel.toml`
pub struct TomlGraphLoader {
    fs: Arc<dyn FileSystem>,
}

impl Default for TomlGraphLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlGraphLoader {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(LocalFs::new()),
        }
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Build a graph from manifest text
    ///
    /// `root` anchors relative paths; the manifest path is only used for
    /// reporting.
    pub fn parse(&self, root: &Path, content: &str) -> Result<LoadedGraph, LoadError> {
        let manifest_path = root.join(MANIFEST_FILE);
        let (manifest, issues) = parse_manifest(content, &manifest_path)?;

        let mut loaded = build_graph(root, &manifest)?;
        loaded.issues = issues;
        Ok(loaded)
    }
}

impl GraphLoader for TomlGraphLoader {
    fn load(&self, root: &Path) -> Result<LoadedGraph, LoadError> {
        let path = root.join(MANIFEST_FILE);
        if !self.fs.exists(&path) || self.fs.is_dir(&path) {
            return Err(LoadError::ManifestNotFound { path });
        }
        let content = self.fs.read_to_string(&path).map_err(|e| LoadError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.parse(root, &content)
    }
}

fn parse_manifest(
    content: &str,
    path: &Path,
) -> Result<(ManifestFile, Vec<LintingIssue>), LoadError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let manifest: ManifestFile = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let issues = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str());
            let location = match find_line_number(content, leaf) {
                Some(line) => format!("{}:{}", MANIFEST_FILE, line),
                None => MANIFEST_FILE.to_string(),
            };
            LintingIssue::warning(
                LintRule::Manifest,
                IssueSubject::Path {
                    path: path.to_path_buf(),
                },
                format!("Unknown manifest key '{}' in {}", key, location),
            )
        })
        .collect();

    Ok((manifest, issues))
}

fn build_graph(root: &Path, manifest: &ManifestFile) -> Result<LoadedGraph, LoadError> {
    let options = GenerationOptions {
        disable_static_products_lint: manifest.workspace.disable_static_products_lint,
    };
    let mut builder = GraphBuilder::new(&manifest.workspace.name, root).with_options(options);

    for entry in &manifest.nodes {
        builder.add_node(node_from_entry(entry))?;
    }

    for entry in &manifest.nodes {
        let source = NodeId::new(&entry.name, entry.directory());
        for dependency in &entry.dependencies {
            let target = resolve_target(&manifest.nodes, entry, dependency)?;
            let condition = EdgeCondition {
                platforms: dependency.platforms.iter().copied().collect(),
                configurations: dependency.configurations.iter().cloned().collect(),
            };
            builder.add_edge(
                Edge::new(source.clone(), target, dependency.linking).with_condition(condition),
            );
        }
    }

    let graph = builder.build();
    let mut side_effects: Vec<SideEffectDescriptor> = graph
        .nodes()
        .flat_map(|node| derived_info_plist(root, node))
        .collect();
    for entry in &manifest.side_effects {
        side_effects.push(side_effect_from_entry(root, entry)?);
    }

    let mut loaded = LoadedGraph::new(graph);
    loaded.side_effects = side_effects;
    Ok(loaded)
}

fn node_from_entry(entry: &NodeEntry) -> Node {
    let node = Node::new(&entry.name, entry.directory(), entry.kind)
        .with_platforms(entry.platforms.iter().copied())
        .with_sources(entry.sources.iter().cloned())
        .with_resources(entry.resources.iter().cloned())
        .with_settings(entry.settings.clone());
    match &entry.info_plist {
        Some(path) => node.with_info_plist(path.clone()),
        None => node,
    }
}

/// Find the node a dependency names
///
/// Names are matched first; `target_path` narrows the match when several
/// nodes share a name.
fn resolve_target(
    nodes: &[NodeEntry],
    source: &NodeEntry,
    dependency: &DependencyEntry,
) -> Result<NodeId, LoadError> {
    let mut candidates: Vec<NodeId> = nodes
        .iter()
        .filter(|node| node.name == dependency.target)
        .map(|node| NodeId::new(&node.name, node.directory()))
        .filter(|id| dependency.target_path.iter().all(|p| id.path() == p))
        .collect();

    match candidates.len() {
        0 => Err(LoadError::UnknownTarget {
            node: source.name.clone(),
            target: dependency.target.clone(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(LoadError::AmbiguousTarget {
            node: source.name.clone(),
            target: dependency.target.clone(),
            candidates: candidates
                .iter()
                .map(|id| id.path().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Anchor a declared side effect under `root`
///
/// Absolute paths, `..` components and the root itself are rejected.
fn side_effect_from_entry(
    root: &Path,
    entry: &SideEffectEntry,
) -> Result<SideEffectDescriptor, LoadError> {
    let path = match entry {
        SideEffectEntry::CreateFile { path, .. }
        | SideEffectEntry::CreateDirectory { path }
        | SideEffectEntry::Delete { path } => path,
    };
    if !stays_inside(path) {
        return Err(LoadError::EscapingPath { path: path.clone() });
    }

    let absolute = |path: &PathBuf| root.join(path);
    let effect = match entry {
        SideEffectEntry::CreateFile {
            path,
            contents,
            overwrite: true,
        } => SideEffectDescriptor::create_file(absolute(path), contents.as_bytes()),
        SideEffectEntry::CreateFile {
            path,
            contents,
            overwrite: false,
        } => SideEffectDescriptor::create_file_if_missing(absolute(path), contents.as_bytes()),
        SideEffectEntry::CreateDirectory { path } => {
            SideEffectDescriptor::create_directory(absolute(path))
        }
        SideEffectEntry::Delete { path } => SideEffectDescriptor::delete(absolute(path)),
    };
    Ok(effect)
}

/// Relative, free of `..`, and naming something below the root itself
fn stays_inside(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::Normal(_)))
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GraphError;
    use crate::domain::value_objects::{LinkingKind, NodeKind, Platform, Severity};
    use crate::infrastructure::fs::MemoryFs;
    use std::fs;
    use tempfile::tempdir;

    const APP_AND_CORE: &str = r#"
[workspace]
name = "Demo"

[[node]]
name = "App"
kind = "app"
platforms = ["ios"]
sources = ["Sources/App.swift"]

[node.settings.base]
SWIFT_VERSION = "5.9"

[[node.dependency]]
target = "Core"
linking = "static"
platforms = ["ios"]

[[node]]
name = "Core"
path = "Modules/Core"
kind = "static_library"
platforms = ["ios", "macos"]
"#;

    fn parse(content: &str) -> Result<LoadedGraph, LoadError> {
        TomlGraphLoader::new().parse(Path::new("/w"), content)
    }

    #[test]
    fn parses_nodes_and_edges() {
        let loaded = parse(APP_AND_CORE).unwrap();
        let graph = &loaded.graph;

        assert_eq!(graph.name(), "Demo");
        assert_eq!(graph.path(), Path::new("/w"));
        assert_eq!(graph.node_count(), 2);

        let app = graph.node(&NodeId::new("App", "App")).unwrap();
        assert_eq!(app.kind(), NodeKind::App);
        assert_eq!(app.settings().base["SWIFT_VERSION"], "5.9");

        let edge = &graph.edges()[0];
        assert_eq!(edge.target, NodeId::new("Core", "Modules/Core"));
        assert_eq!(edge.linking, LinkingKind::Static);
        assert!(edge.condition.platforms.contains(&Platform::Ios));
        assert!(loaded.issues.is_empty());
    }

    #[test]
    fn linking_defaults_to_dynamic() {
        let loaded = parse(
            r#"
[workspace]
name = "Demo"

[[node]]
name = "App"
kind = "app"
[[node.dependency]]
target = "Kit"

[[node]]
name = "Kit"
kind = "framework"
"#,
        )
        .unwrap();

        assert_eq!(loaded.graph.edges()[0].linking, LinkingKind::Dynamic);
        assert!(loaded.graph.edges()[0].condition.is_unconditional());
    }

    #[test]
    fn bundles_without_info_plist_get_derived_side_effects() {
        let loaded = parse(APP_AND_CORE).unwrap();

        let paths: Vec<PathBuf> = loaded
            .side_effects
            .iter()
            .map(|e| e.path().to_path_buf())
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/w/App/Derived/InfoPlists"),
                PathBuf::from("/w/App/Derived/InfoPlists/App-Info.plist"),
            ]
        );
    }

    #[test]
    fn declared_side_effects_are_rooted() {
        let loaded = parse(
            r#"
[workspace]
name = "Demo"

[[side_effect]]
kind = "create_directory"
path = "Derived"

[[side_effect]]
kind = "create_file"
path = "Derived/README"
contents = "generated"
overwrite = false

[[side_effect]]
kind = "delete"
path = "Stale"
"#,
        )
        .unwrap();

        assert_eq!(
            loaded.side_effects,
            vec![
                SideEffectDescriptor::create_directory("/w/Derived"),
                SideEffectDescriptor::create_file_if_missing("/w/Derived/README", "generated"),
                SideEffectDescriptor::delete("/w/Stale"),
            ]
        );
    }

    #[test]
    fn side_effects_cannot_leave_the_root() {
        for path in ["/", "/etc/hosts", "../..", "Derived/../../x", ".", ""] {
            let manifest = format!(
                "[workspace]\nname = \"Demo\"\n\n[[side_effect]]\nkind = \"delete\"\npath = {path:?}\n"
            );

            let err = parse(&manifest).unwrap_err();

            match err {
                LoadError::EscapingPath { path: rejected } => {
                    assert_eq!(rejected, PathBuf::from(path))
                }
                other => panic!("{path:?} accepted or misreported: {other:?}"),
            }
        }
    }

    #[test]
    fn dotted_side_effect_paths_stay_rooted() {
        let loaded = parse(
            r#"
[workspace]
name = "Demo"

[[side_effect]]
kind = "create_directory"
path = "./Derived/.cache"
"#,
        )
        .unwrap();

        assert_eq!(
            loaded.side_effects,
            vec![SideEffectDescriptor::create_directory("/w/./Derived/.cache")]
        );
    }

    #[test]
    fn unknown_keys_are_warnings() {
        let loaded = parse(
            r#"
[workspace]
name = "Demo"

[[node]]
name = "App"
kind = "app"
colour = "blue"
"#,
        )
        .unwrap();

        assert_eq!(loaded.issues.len(), 1);
        let issue = &loaded.issues[0];
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.rule, LintRule::Manifest);
        assert!(issue.reason.contains("colour"));
        assert!(issue.reason.ends_with("keel.toml:8"));
    }

    #[test]
    fn duplicate_nodes_are_rejected() {
        let err = parse(
            r#"
[workspace]
name = "Demo"

[[node]]
name = "Core"
kind = "framework"

[[node]]
name = "Core"
kind = "static_library"
"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LoadError::Graph(GraphError::DuplicateNode { .. })
        ));
    }

    #[test]
    fn unknown_targets_are_rejected() {
        let err = parse(
            r#"
[workspace]
name = "Demo"

[[node]]
name = "App"
kind = "app"
[[node.dependency]]
target = "Missing"
"#,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "'App' depends on 'Missing', which is not declared"
        );
    }

    #[test]
    fn shared_names_need_a_target_path() {
        let manifest = |dependency: &str| {
            format!(
                r#"
[workspace]
name = "Demo"

[[node]]
name = "App"
kind = "app"
[[node.dependency]]
{dependency}

[[node]]
name = "Core"
path = "iOS/Core"
kind = "framework"

[[node]]
name = "Core"
path = "macOS/Core"
kind = "framework"
"#
            )
        };

        let err = parse(&manifest(r#"target = "Core""#)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::AmbiguousTarget { ref candidates, .. } if candidates == "iOS/Core, macOS/Core"
        ));

        let loaded = parse(&manifest(
            r#"target = "Core"
target_path = "macOS/Core""#,
        ))
        .unwrap();
        assert_eq!(
            loaded.graph.edges()[0].target,
            NodeId::new("Core", "macOS/Core")
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = parse("[workspace\nname = ").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn load_reads_the_manifest_from_disk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), APP_AND_CORE).unwrap();

        let loaded = TomlGraphLoader::new().load(dir.path()).unwrap();

        assert_eq!(loaded.graph.path(), dir.path());
        assert_eq!(loaded.graph.node_count(), 2);
    }

    #[test]
    fn load_goes_through_the_file_system_port() {
        let fs = Arc::new(MemoryFs::new().with_file("/w/keel.toml", APP_AND_CORE));

        let loaded = TomlGraphLoader::with_fs(fs).load(Path::new("/w")).unwrap();

        assert_eq!(loaded.graph.path(), Path::new("/w"));
        assert_eq!(loaded.graph.node_count(), 2);
    }

    #[test]
    fn manifest_directories_are_not_manifests() {
        let fs = Arc::new(MemoryFs::new().with_file("/w/keel.toml/nested", "x"));

        let err = TomlGraphLoader::with_fs(fs)
            .load(Path::new("/w"))
            .unwrap_err();

        assert!(matches!(err, LoadError::ManifestNotFound { .. }));
    }

    #[test]
    fn load_without_manifest_fails() {
        let dir = tempdir().unwrap();

        let err = TomlGraphLoader::new().load(dir.path()).unwrap_err();

        assert!(matches!(err, LoadError::ManifestNotFound { .. }));
    }
}
