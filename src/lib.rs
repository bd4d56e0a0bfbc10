//! keel - project graph generator
//!
//! keel loads a declarative project graph from `keel.toml`, lints it
//! (cycles, duplicated static products, platform mismatches, ...), turns it
//! into deterministic workspace and project descriptors, writes them, and
//! applies the filesystem side effects the manifest asks for.
//!
//! The crate follows a layered layout:
//!
//! - `domain` - entities, value objects, pure services and ports
//! - `application` - the generation use case and the side-effect executor
//! - `infrastructure` - port implementations (TOML, JSON, local disk)
//! - `presentation` - use case wiring and output rendering for the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{CancellationFlag, GenerateReport, GenerateUseCase, SideEffectExecutor};
pub use config::Config;
pub use domain::entities::{Graph, GraphBuilder, Node, SideEffectDescriptor, WorkspaceDescriptor};
pub use domain::services::{DescriptorGenerator, GraphLinter, GraphTraverser};
pub use domain::value_objects::{LinkingKind, LintingIssue, NodeId, NodeKind, Platform, Severity};
pub use error::{KeelError, KeelResult};
