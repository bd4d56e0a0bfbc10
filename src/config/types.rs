//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ports::ConfigError;

use super::loader::{self, ConfigWarning};

/// What gets generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Build configurations every project is resolved for
    #[serde(default = "default_configurations")]
    pub configurations: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            configurations: default_configurations(),
        }
    }
}

fn default_configurations() -> Vec<String> {
    vec!["Debug".to_string(), "Release".to_string()]
}

/// Environment requirements checked before generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompatibilityConfig {
    /// Accepted keel version prefixes; empty accepts any
    #[serde(default)]
    pub versions: Vec<String>,

    /// Executables that must be on `PATH`
    #[serde(default)]
    pub required_tools: Vec<String>,
}

/// Code-signing material lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Relative to the project root
    #[serde(default = "default_signing_directory")]
    pub directory: PathBuf,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            directory: default_signing_directory(),
        }
    }
}

fn default_signing_directory() -> PathBuf {
    PathBuf::from("Signing")
}

/// External package resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PackagesConfig {
    /// Command that resolves package products; none disables resolution
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub color: ColorMode,
}

/// How events are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl OutputFormat {
    pub const VALUES: &'static [&'static str] = &["human", "json"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub const VALUES: &'static [&'static str] = &["auto", "always", "never"];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub compatibility: CompatibilityConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub packages: PackagesConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Apply `KEEL_*` environment overrides from the process environment
    pub fn with_env_overrides(self) -> (Self, Vec<ConfigWarning>) {
        loader::with_env_overrides(self, |name| std::env::var(name).ok())
    }

    /// Configurations to generate, never empty
    pub fn configurations(&self) -> Vec<String> {
        if self.generation.configurations.is_empty() {
            vec!["Debug".to_string()]
        } else {
            self.generation.configurations.clone()
        }
    }
}
