use std::path::Path;

use anyhow::Result;

use keel::application::CancellationFlag;
use keel::presentation::cli::ColorWhen;
use keel::presentation::factory::create_generate_use_case;

use super::OutputChoice;

pub fn cmd_generate(
    path: &Path,
    json: bool,
    verbose: u8,
    color: Option<ColorWhen>,
    cancellation: CancellationFlag,
) -> Result<()> {
    let output = OutputChoice::resolve(path, json, color, verbose);
    let use_case = create_generate_use_case(output.sink(), cancellation);

    let workspace = use_case.generate(path)?;

    // JSON mode already carries the path in the completion event
    if !output.json {
        println!("{}", workspace.display());
    }
    Ok(())
}
