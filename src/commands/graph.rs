use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use keel::infrastructure::ConsoleEventSink;
use keel::presentation::cli::ColorWhen;
use keel::presentation::factory::create_load_use_case;
use keel::presentation::output::{render_graph, GraphFormat};

use super::OutputChoice;

/// Load the graph and print it on stdout
///
/// Loader warnings always go to stderr so stdout stays a single document;
/// `--json` forces the JSON format.
pub fn cmd_graph(
    path: &Path,
    format: GraphFormat,
    json: bool,
    verbose: u8,
    color: Option<ColorWhen>,
) -> Result<()> {
    let output = OutputChoice::resolve(path, false, color, verbose);
    let sink = Arc::new(ConsoleEventSink::stderr(output.color, output.verbose));
    let graph = create_load_use_case(sink).load(path)?;

    let format = if json { GraphFormat::Json } else { format };
    println!("{}", render_graph(&graph, format)?.trim_end());
    Ok(())
}
