//! Common test utilities for keel CLI tests.
//!
//! Provides `TestEnv`: an isolated project directory plus an isolated config
//! home, and helpers to run the `keel` binary inside it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Result of running a keel CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Stdout split into non-empty lines
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .collect()
    }

    /// Stdout parsed as NDJSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout_lines()
            .into_iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

/// Isolated test environment
pub struct TestEnv {
    pub project_root: TempDir,
    pub config_home: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            project_root: TempDir::new().unwrap(),
            config_home: TempDir::new().unwrap(),
        }
    }

    /// Environment with `keel.toml` already written
    pub fn with_manifest(manifest: &str) -> Self {
        let env = Self::new();
        env.write("keel.toml", manifest);
        env
    }

    pub fn root(&self) -> &Path {
        self.project_root.path()
    }

    /// Get path relative to project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.project_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.project_path(relative)).unwrap()
    }

    /// Run keel from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run keel from the project root with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_keel"));
        cmd.current_dir(self.root())
            .args(args)
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("HOME", self.config_home.path())
            .env("NO_COLOR", "1")
            .env_remove("KEEL_OUTPUT_FORMAT")
            .env_remove("KEEL_COLOR")
            .env_remove("KEEL_PACKAGES_COMMAND");
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().unwrap();
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// App depending on a static library, both on iOS
pub const APP_AND_CORE: &str = r#"
[workspace]
name = "Demo"

[[node]]
name = "App"
kind = "app"
platforms = ["ios"]
sources = ["Sources/App.swift"]

[[node.dependency]]
target = "Core"

[[node]]
name = "Core"
kind = "static_library"
platforms = ["ios"]
sources = ["Sources/Core.swift"]
"#;

/// Two frameworks depending on each other
pub const CYCLE: &str = r#"
[workspace]
name = "Loop"

[[node]]
name = "A"
kind = "framework"
platforms = ["ios"]

[[node.dependency]]
target = "B"

[[node]]
name = "B"
kind = "framework"
platforms = ["ios"]

[[node.dependency]]
target = "A"
"#;
