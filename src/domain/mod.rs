//! Domain Layer
//!
//! The core of keel: the project graph and everything computed from it,
//! without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Graph, nodes, descriptors, side effects
//! - `value_objects/` - Immutable value types (NodeId, Platform, LintingIssue)
//! - `services/` - Traverser, linter, descriptor generator
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Deterministic** - Same graph in, same descriptors and issues out
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
