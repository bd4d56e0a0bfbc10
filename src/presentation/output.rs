//! Output Rendering
//!
//! Renders a loaded graph for `keel graph`.

use crate::domain::entities::Graph;
use crate::domain::value_objects::NodeId;

/// Output format for `keel graph`
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Graphviz DOT
    Dot,
}

/// Render a graph in the requested format
pub fn render_graph(graph: &Graph, format: GraphFormat) -> Result<String, serde_json::Error> {
    match format {
        GraphFormat::Json => render_graph_json(graph),
        GraphFormat::Dot => Ok(render_graph_dot(graph)),
    }
}

pub fn render_graph_json(graph: &Graph) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(graph)
}

/// Render a graph as a DOT digraph
///
/// Node statements come first in identity order, then one statement per
/// edge in declaration order, labelled with its linking kind.
pub fn render_graph_dot(graph: &Graph) -> String {
    let mut out = format!("digraph \"{}\" {{\n", escape(graph.name()));

    for node in graph.nodes() {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"];\n",
            quoted_id(node.id()),
            escape(node.name())
        ));
    }
    for edge in graph.edges() {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            quoted_id(&edge.source),
            quoted_id(&edge.target),
            edge.linking
        ));
    }

    out.push_str("}\n");
    out
}

fn quoted_id(id: &NodeId) -> String {
    escape(&id.to_string())
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
