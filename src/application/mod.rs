//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `GenerateUseCase` - Load, lint, generate, write, apply side effects, install
//!
//! ## Services
//!
//! - `SideEffectExecutor` - Applies side-effect descriptors against a `FileSystem`

pub mod generate;
pub mod side_effects;

pub use generate::{GenerateReport, GenerateUseCase};
pub use side_effects::{CancellationFlag, ExecutedEffect, ExecutionReport, SideEffectExecutor};
