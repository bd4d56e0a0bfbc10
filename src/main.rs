//! keel CLI - project graph generator
//!
//! Usage: keel <COMMAND>
//!
//! Commands:
//!   generate  Lint the project graph and generate the workspace
//!   graph     Load the project graph and print it

use std::process::ExitCode;

use clap::Parser;

use keel::application::CancellationFlag;
use keel::presentation::cli::{Cli, Commands};
use keel::KeelError;

mod commands;

use commands::generate::cmd_generate;
use commands::graph::cmd_graph;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cancellation = CancellationFlag::new();
    let handler_flag = cancellation.clone();
    // Without a handler Ctrl+C still terminates the process, just not between effects
    let _ = ctrlc::set_handler(move || handler_flag.cancel());

    let result = match cli.command {
        Commands::Generate { ref path } => {
            cmd_generate(path, cli.json, cli.verbose, cli.color, cancellation)
        }
        Commands::Graph { ref path, format } => {
            cmd_graph(path, format, cli.json, cli.verbose, cli.color)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let keel_error = err.downcast_ref::<KeelError>();
            // Lint issues were already rendered by the event sink
            let reported = matches!(keel_error, Some(KeelError::Lint(_)));
            if !cli.json && !reported {
                eprintln!("Error: {err:#}");
            }
            let code = keel_error.map(KeelError::exit_code).unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
