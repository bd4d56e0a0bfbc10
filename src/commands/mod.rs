pub mod generate;
pub mod graph;

use std::path::Path;
use std::sync::Arc;

use keel::config::{ColorMode, Config, OutputFormat};
use keel::domain::ports::{ConfigLoader, GenerateEventSink};
use keel::infrastructure::{ConsoleEventSink, JsonEventSink, TomlConfigLoader};
use keel::presentation::cli::ColorWhen;

/// How a command reports progress, resolved from flags and configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputChoice {
    pub json: bool,
    pub color: ColorMode,
    pub verbose: bool,
}

impl OutputChoice {
    /// Flags win over `[output]` in the configuration
    ///
    /// A configuration that fails to load falls back to defaults here; the
    /// use case reports the failure itself.
    pub fn resolve(root: &Path, json: bool, color: Option<ColorWhen>, verbose: u8) -> Self {
        let config: Config = TomlConfigLoader::new()
            .load_config(root)
            .map(|loaded| loaded.config)
            .unwrap_or_default();

        Self {
            json: json || config.output.format == OutputFormat::Json,
            color: color.map(ColorMode::from).unwrap_or(config.output.color),
            verbose: verbose > 0,
        }
    }

    pub fn sink(&self) -> Arc<dyn GenerateEventSink> {
        if self.json {
            Arc::new(JsonEventSink::stdout())
        } else {
            Arc::new(ConsoleEventSink::stderr(self.color, self.verbose))
        }
    }
}
