//! Filesystem signing installer
//!
//! Looks for signing material in the configured signing directory:
//! certificate pairs (`<name>.cer` + `<name>.p12`) and provisioning profiles
//! named `<Target>.<Configuration>.mobileprovision`. Valid profiles are
//! copied to `Derived/Signing` under the project root.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::domain::ports::{FileSystem, SigningInstaller};
use crate::domain::services::GraphTraverser;
use crate::domain::value_objects::{IssueSubject, LintRule, LintingIssue};
use crate::infrastructure::fs::LocalFs;

/// Where installed profiles go, relative to the project root
pub const DERIVED_SIGNING: &str = "Derived/Signing";

const CERTIFICATE: &str = "cer";
const PRIVATE_KEY: &str = "p12";
const PROFILE: &str = "mobileprovision";

pub struct FsSigningInstaller {
    fs: Arc<dyn FileSystem>,
}

impl Default for FsSigningInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl FsSigningInstaller {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(LocalFs::new()),
        }
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn lint_certificates(directory: &Path, files: &[PathBuf]) -> Vec<LintingIssue> {
        let stems = |extension: &str| -> BTreeSet<String> {
            files
                .iter()
                .filter(|f| has_extension(f, extension))
                .filter_map(|f| f.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .collect()
        };
        let certificates = stems(CERTIFICATE);
        let keys = stems(PRIVATE_KEY);

        let mut issues = Vec::new();
        for name in certificates.difference(&keys) {
            issues.push(warning(
                directory.join(format!("{name}.{CERTIFICATE}")),
                format!(
                    "Certificate '{name}.{CERTIFICATE}' has no matching private key ({name}.{PRIVATE_KEY})"
                ),
            ));
        }
        for name in keys.difference(&certificates) {
            issues.push(warning(
                directory.join(format!("{name}.{PRIVATE_KEY}")),
                format!(
                    "Private key '{name}.{PRIVATE_KEY}' has no matching certificate ({name}.{CERTIFICATE})"
                ),
            ));
        }
        issues
    }

    /// Why a profile cannot be installed, if it cannot
    fn profile_problem(
        file: &Path,
        traverser: &GraphTraverser<'_>,
        configurations: &[String],
    ) -> Option<String> {
        let file_name = file.file_name()?.to_string_lossy().into_owned();
        let stem = file.file_stem()?.to_string_lossy().into_owned();
        let Some((target, configuration)) = stem.rsplit_once('.') else {
            return Some(format!(
                "Provisioning profile '{file_name}' should be named <Target>.<Configuration>.{PROFILE}"
            ));
        };
        if !traverser.graph().nodes().any(|n| n.name() == target) {
            return Some(format!(
                "Provisioning profile '{file_name}' names the unknown target '{target}'"
            ));
        }
        if !configurations.iter().any(|c| c == configuration) {
            return Some(format!(
                "Provisioning profile '{file_name}' names the unknown configuration '{configuration}'"
            ));
        }
        None
    }
}

impl SigningInstaller for FsSigningInstaller {
    fn install(&self, traverser: &GraphTraverser<'_>, config: &Config) -> Result<Vec<LintingIssue>> {
        let directory = traverser.path().join(&config.signing.directory);
        if !self.fs.is_dir(&directory) {
            return Ok(Vec::new());
        }

        let files = self
            .fs
            .list_dir(&directory)
            .with_context(|| format!("reading {}", directory.display()))?;
        let mut issues = Self::lint_certificates(&directory, &files);

        let configurations = config.configurations();
        let destination = traverser.path().join(DERIVED_SIGNING);
        for profile in files.iter().filter(|f| has_extension(f, PROFILE)) {
            if let Some(problem) = Self::profile_problem(profile, traverser, &configurations) {
                issues.push(warning(profile.clone(), problem));
                continue;
            }
            let Some(file_name) = profile.file_name() else {
                continue;
            };
            let content = self
                .fs
                .read(profile)
                .with_context(|| format!("reading {}", profile.display()))?;
            let target = destination.join(file_name);
            self.fs
                .write(&target, &content)
                .with_context(|| format!("installing {}", target.display()))?;
        }

        Ok(issues)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|e| e == extension)
}

fn warning(path: PathBuf, reason: String) -> LintingIssue {
    LintingIssue::warning(LintRule::Signing, IssueSubject::Path { path }, reason)
}
