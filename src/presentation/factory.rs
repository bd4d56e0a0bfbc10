//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::{CancellationFlag, GenerateUseCase};
use crate::domain::ports::{FileSystem, GenerateEventSink};
use crate::infrastructure::{
    CommandPackageInstaller, DefaultEnvironmentLinter, FsSigningInstaller, JsonWorkspaceWriter,
    LocalFs, TomlConfigLoader, TomlGraphLoader,
};

/// Create a generate use case with all dependencies wired up
///
/// Every adapter shares one `LocalFs`. The cancellation flag is the one the
/// binary's Ctrl+C handler sets.
pub fn create_generate_use_case(
    events: Arc<dyn GenerateEventSink>,
    cancellation: CancellationFlag,
) -> GenerateUseCase {
    let file_system: Arc<dyn FileSystem> = Arc::new(LocalFs::new());

    GenerateUseCase::new(
        Box::new(TomlGraphLoader::with_fs(file_system.clone())),
        Box::new(TomlConfigLoader::new()),
        Box::new(DefaultEnvironmentLinter::new()),
        Box::new(JsonWorkspaceWriter::with_fs(file_system.clone())),
        file_system.clone(),
    )
    .with_signing_installer(Box::new(FsSigningInstaller::with_fs(file_system)))
    .with_package_installer(Box::new(CommandPackageInstaller::new()))
    .with_events(events)
    .with_cancellation(cancellation)
}

/// Create a use case that only loads graphs
///
/// Used by `keel graph`; nothing is linted against the environment and
/// nothing is written.
pub fn create_load_use_case(events: Arc<dyn GenerateEventSink>) -> GenerateUseCase {
    create_generate_use_case(events, CancellationFlag::new())
}
