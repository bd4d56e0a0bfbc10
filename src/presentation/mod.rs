//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Graph rendering (JSON/DOT)
//!
//! ## Structure
//!
//! - `cli` - Command line definition shared by the binary and its tests
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Output rendering
//!
//! ## Usage
//!
//! ```ignore
//! use keel::presentation::factory;
//!
//! // Create generate use case with all dependencies wired up
//! let use_case = factory::create_generate_use_case(events, cancellation);
//! let workspace = use_case.generate(&root)?;
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use factory::create_generate_use_case;
