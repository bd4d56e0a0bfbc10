//! Domain Services
//!
//! Pure graph logic: traversal, linting and descriptor generation.
//! No I/O; everything here is driven by in-memory graphs in tests.

mod descriptor_generator;
mod graph_linter;
mod traverser;

pub use descriptor_generator::{
    DescriptorGenerator, GenerationError, GeneratorOptions, INHERITED, PROJECT_EXTENSION,
    WORKSPACE_EXTENSION,
};
pub use graph_linter::{GraphLinter, LintOptions};
pub use traverser::{Cycle, GraphTraverser, LinkedDependency, Traversal};
