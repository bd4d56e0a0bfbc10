//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod config_loader;
pub mod environment_linter;
pub mod file_system;
pub mod generate_events;
pub mod graph_loader;
pub mod installers;
pub mod workspace_writer;

pub use config_loader::{ConfigError, ConfigLoader, LoadedConfig};
pub use environment_linter::{EnvironmentError, EnvironmentLinter};
pub use file_system::{FileSystem, FsError, FsResult};
pub use generate_events::{GenerateEvent, GenerateEventSink, NoopEventSink};
pub use graph_loader::{GraphLoader, LoadError, LoadedGraph};
pub use installers::{PackageInstaller, SigningInstaller};
pub use workspace_writer::{WorkspaceWriter, WriteError};
