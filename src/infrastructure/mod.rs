//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, Memory)
//! - `manifest/` - `keel.toml` graph loader
//! - `config/` - TOML configuration loader
//! - `writer/` - Workspace writers
//! - `events/` - Event sinks (console, JSON)
//! - `environment`, `signing`, `packages` - Environment linter and installers

pub mod config;
pub mod environment;
pub mod events;
pub mod fs;
pub mod manifest;
pub mod packages;
pub mod signing;
pub mod writer;

// Re-export for convenience
pub use config::TomlConfigLoader;
pub use environment::DefaultEnvironmentLinter;
pub use events::{ConsoleEventSink, JsonEventSink};
pub use fs::{LocalFs, MemoryFs};
pub use manifest::{TomlGraphLoader, MANIFEST_FILE};
pub use packages::CommandPackageInstaller;
pub use signing::FsSigningInstaller;
pub use writer::JsonWorkspaceWriter;
