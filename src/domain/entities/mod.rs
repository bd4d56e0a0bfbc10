//! Domain Entities
//!
//! - `Node` / `Graph` - the dependency graph model
//! - `WorkspaceDescriptor` - pure generation output
//! - `SideEffectDescriptor` - declarative filesystem mutations

mod descriptor;
mod graph;
mod node;
mod side_effect;

pub use descriptor::{
    DependencyReference, FileReference, FileReferenceKind, ProjectDescriptor, WorkspaceDescriptor,
};
pub use graph::{Edge, GenerationOptions, Graph, GraphBuilder, GraphError};
pub use node::Node;
pub use side_effect::{OverwritePolicy, SideEffectDescriptor, SideEffectOutcome};
