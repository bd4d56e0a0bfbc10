//! Config loader port - abstracts where configuration comes from

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{Config, ConfigWarning};

/// Configuration plus non-fatal findings (unknown keys, bad env values)
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
}

impl LoadedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Loads configuration for a project root
///
/// Lookup order:
/// 1. Project config (`.keel/config.toml`)
/// 2. User config (`$XDG_CONFIG_HOME/keel/config.toml`)
/// 3. Built-in defaults
///
/// `KEEL_*` environment overrides apply on top.
pub trait ConfigLoader: Send + Sync {
    fn load_config(&self, root: &Path) -> Result<LoadedConfig, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Mock implementation keyed by project root
    struct MockConfigLoader {
        configs: HashMap<PathBuf, Config>,
    }

    impl ConfigLoader for MockConfigLoader {
        fn load_config(&self, root: &Path) -> Result<LoadedConfig, ConfigError> {
            Ok(LoadedConfig::new(
                self.configs.get(root).cloned().unwrap_or_default(),
            ))
        }
    }

    #[test]
    fn mock_loader_falls_back_to_default() {
        let loader = MockConfigLoader {
            configs: HashMap::new(),
        };
        let loaded = loader.load_config(Path::new("/project")).unwrap();
        assert_eq!(loaded.config.generation.configurations, vec!["Debug", "Release"]);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn mock_loader_returns_configured() {
        let mut custom = Config::default();
        custom.generation.configurations = vec!["Beta".to_string()];
        let loader = MockConfigLoader {
            configs: HashMap::from([(PathBuf::from("/project"), custom)]),
        };

        let loaded = loader.load_config(Path::new("/project")).unwrap();
        assert_eq!(loaded.config.generation.configurations, vec!["Beta"]);
    }
}
