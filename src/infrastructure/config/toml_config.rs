//! TOML-based configuration loader implementation.

use std::path::{Path, PathBuf};

use crate::config::{load_hierarchy, user_config_dir, with_env_overrides};
use crate::domain::ports::{ConfigError, ConfigLoader, LoadedConfig};

/// TOML configuration loader implementation.
///
/// Delegates to the `config` module for the file hierarchy and applies
/// `KEEL_*` environment overrides on top.
#[derive(Debug, Clone, Default)]
pub struct TomlConfigLoader {
    /// Overrides `$XDG_CONFIG_HOME` lookup (for testing)
    user_config_dir: Option<PathBuf>,
    /// Skip environment overrides (for testing)
    ignore_env: bool,
}

impl TomlConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_config_dir = Some(dir.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }
}

impl ConfigLoader for TomlConfigLoader {
    fn load_config(&self, root: &Path) -> Result<LoadedConfig, ConfigError> {
        let user_dir = self.user_config_dir.clone().or_else(user_config_dir);
        let (config, mut warnings, _source) = load_hierarchy(root, user_dir.as_deref())?;

        if self.ignore_env {
            return Ok(LoadedConfig { config, warnings });
        }

        let (config, env_warnings) = with_env_overrides(config, |key| std::env::var(key).ok());
        warnings.extend(env_warnings);
        Ok(LoadedConfig { config, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorMode, ConfigWarningKind, OutputFormat};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn project_config_wins_over_user_config() {
        let project = tempdir().unwrap();
        let user = tempdir().unwrap();
        fs::create_dir_all(project.path().join(".keel")).unwrap();
        fs::write(
            project.path().join(".keel/config.toml"),
            "[output]\nformat = \"json\"\n",
        )
        .unwrap();
        fs::create_dir_all(user.path().join("keel")).unwrap();
        fs::write(
            user.path().join("keel/config.toml"),
            "[output]\ncolor = \"never\"\n",
        )
        .unwrap();

        let loaded = TomlConfigLoader::new()
            .with_user_config_dir(user.path())
            .without_env()
            .load_config(project.path())
            .unwrap();

        assert_eq!(loaded.config.output.format, OutputFormat::Json);
        assert_eq!(loaded.config.output.color, ColorMode::Auto);
    }

    #[test]
    fn user_config_is_the_fallback() {
        let project = tempdir().unwrap();
        let user = tempdir().unwrap();
        fs::create_dir_all(user.path().join("keel")).unwrap();
        fs::write(
            user.path().join("keel/config.toml"),
            "[generation]\nconfigurations = [\"Debug\", \"Beta\", \"Release\"]\n",
        )
        .unwrap();

        let loaded = TomlConfigLoader::new()
            .with_user_config_dir(user.path())
            .without_env()
            .load_config(project.path())
            .unwrap();

        assert_eq!(
            loaded.config.configurations(),
            vec!["Debug", "Beta", "Release"]
        );
    }

    #[test]
    fn unknown_keys_surface_as_warnings() {
        let project = tempdir().unwrap();
        let user = tempdir().unwrap();
        fs::create_dir_all(project.path().join(".keel")).unwrap();
        fs::write(
            project.path().join(".keel/config.toml"),
            "[signing]\ndirectroy = \"Certs\"\n",
        )
        .unwrap();

        let loaded = TomlConfigLoader::new()
            .with_user_config_dir(user.path())
            .without_env()
            .load_config(project.path())
            .unwrap();

        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].kind, ConfigWarningKind::UnknownKey);
        assert_eq!(loaded.warnings[0].suggestion.as_deref(), Some("directory"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let project = tempdir().unwrap();
        let user = tempdir().unwrap();
        fs::create_dir_all(project.path().join(".keel")).unwrap();
        fs::write(project.path().join(".keel/config.toml"), "[output\n").unwrap();

        let err = TomlConfigLoader::new()
            .with_user_config_dir(user.path())
            .without_env()
            .load_config(project.path())
            .unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
