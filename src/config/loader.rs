//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ports::ConfigError;
use crate::domain::value_objects::{IssueSubject, LintRule, LintingIssue};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{ColorMode, Config, OutputFormat};

pub const PROJECT_CONFIG: &str = ".keel/config.toml";
pub const ENV_OUTPUT_FORMAT: &str = "KEEL_OUTPUT_FORMAT";
pub const ENV_COLOR: &str = "KEEL_COLOR";
pub const ENV_PACKAGES_COMMAND: &str = "KEEL_PACKAGES_COMMAND";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarningKind {
    UnknownKey,
    InvalidEnvValue { value: String, valid: Vec<String> },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub kind: ConfigWarningKind,
    /// Dotted key path, or the environment variable name
    pub key: String,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl ConfigWarning {
    pub fn to_issue(&self) -> LintingIssue {
        let subject = match &self.file {
            Some(path) => IssueSubject::Path { path: path.clone() },
            None => IssueSubject::Workspace,
        };
        LintingIssue::warning(LintRule::Configuration, subject, self.to_string())
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConfigWarningKind::UnknownKey => {
                write!(f, "Unknown config key '{}'", self.key)?;
                if let Some(file) = &self.file {
                    write!(f, " in {}", file.display())?;
                    if let Some(line) = self.line {
                        write!(f, ":{}", line)?;
                    }
                }
            }
            ConfigWarningKind::InvalidEnvValue { value, .. } => {
                write!(f, "Invalid {} value '{}'", self.key, value)?;
            }
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, ". Did you mean '{}'?", suggestion)?;
        }
        if let ConfigWarningKind::InvalidEnvValue { valid, .. } = &self.kind {
            write!(f, " Valid values: {}", valid.join(", "))?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_with_warnings(&content, path)
}

/// Parse TOML content; `path` is only used for reporting
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                kind: ConfigWarningKind::UnknownKey,
                file: Some(path.to_path_buf()),
                line: find_line_number(content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
///
/// Returns the file that was used, if any. Environment overrides are not
/// applied here.
pub fn load_hierarchy(
    project_root: &Path,
    user_config_dir: Option<&Path>,
) -> Result<(Config, Vec<ConfigWarning>, Option<PathBuf>), ConfigError> {
    let project_config = project_root.join(PROJECT_CONFIG);
    if project_config.is_file() {
        let (config, warnings) = load_with_warnings(&project_config)?;
        return Ok((config, warnings, Some(project_config)));
    }

    if let Some(dir) = user_config_dir {
        let user_config = dir.join("keel/config.toml");
        if user_config.is_file() {
            let (config, warnings) = load_with_warnings(&user_config)?;
            return Ok((config, warnings, Some(user_config)));
        }
    }

    Ok((Config::default(), Vec::new(), None))
}

/// Apply environment variable overrides (KEEL_* prefix)
///
/// Invalid values keep the configured setting and produce a warning.
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> (Config, Vec<ConfigWarning>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();

    if let Some(value) = lookup(ENV_OUTPUT_FORMAT) {
        match EnvVarValidator::new(ENV_OUTPUT_FORMAT, OutputFormat::VALUES)
            .parse(&value, OutputFormat::parse)
        {
            Ok(format) => config.output.format = format,
            Err(warning) => warnings.push(warning),
        }
    }

    if let Some(value) = lookup(ENV_COLOR) {
        match EnvVarValidator::new(ENV_COLOR, ColorMode::VALUES).parse(&value, ColorMode::parse) {
            Ok(color) => config.output.color = color,
            Err(warning) => warnings.push(warning),
        }
    }

    if let Some(command) = lookup(ENV_PACKAGES_COMMAND) {
        let command = command.trim();
        config.packages.command = if command.is_empty() {
            None
        } else {
            Some(command.to_string())
        };
    }

    (config, warnings)
}

/// User configuration directory: `$XDG_CONFIG_HOME`, else `~/.config`
pub fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "generation",
        "configurations",
        "compatibility",
        "versions",
        "required_tools",
        "signing",
        "directory",
        "packages",
        "command",
        "args",
        "output",
        "format",
        "color",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
