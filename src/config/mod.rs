//! Configuration module for keel
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (KEEL_*)
//! 3. Project config (.keel/config.toml)
//! 4. User config ($XDG_CONFIG_HOME/keel/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{
    load_hierarchy, parse_with_warnings, user_config_dir, with_env_overrides, ConfigWarning,
    ConfigWarningKind, ENV_COLOR, ENV_OUTPUT_FORMAT, ENV_PACKAGES_COMMAND, PROJECT_CONFIG,
};
pub use types::{
    ColorMode, CompatibilityConfig, Config, GenerationConfig, OutputConfig, OutputFormat,
    PackagesConfig, SigningConfig,
};
