//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! Global flags (--json, --color, --verbose) are inherited by all subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ColorMode;
use crate::presentation::output::GraphFormat;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl From<ColorWhen> for ColorMode {
    fn from(value: ColorWhen) -> Self {
        match value {
            ColorWhen::Auto => ColorMode::Auto,
            ColorWhen::Always => ColorMode::Always,
            ColorWhen::Never => ColorMode::Never,
        }
    }
}

/// keel - project graph generator
#[derive(Parser, Debug)]
#[command(name = "keel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events on stdout (for CI)
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v shows every side effect)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint the project graph and generate the workspace
    Generate {
        /// Directory containing keel.toml
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Load the project graph and print it
    Graph {
        /// Directory containing keel.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: GraphFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["keel", "generate"]).unwrap();
        match cli.command {
            Commands::Generate { path } => assert_eq!(path, PathBuf::from(".")),
            other => panic!("Expected Generate command, got {other:?}"),
        }
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_generate_with_path_and_globals() {
        let cli = Cli::try_parse_from(["keel", "generate", "demo", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Generate { path } if path == PathBuf::from("demo")));
    }

    #[test]
    fn test_cli_parse_graph_format() {
        let cli = Cli::try_parse_from(["keel", "graph", "--format", "dot"]).unwrap();
        if let Commands::Graph { path, format } = cli.command {
            assert_eq!(path, PathBuf::from("."));
            assert_eq!(format, GraphFormat::Dot);
        } else {
            panic!("Expected Graph command");
        }
    }

    #[test]
    fn test_cli_color_flag() {
        let cli = Cli::try_parse_from(["keel", "--color", "never", "generate"]).unwrap();
        assert_eq!(cli.color, Some(ColorWhen::Never));
        assert_eq!(ColorMode::from(ColorWhen::Never), ColorMode::Never);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["keel", "graph", "--format", "yaml"]).is_err());
    }
}
