//! Generate Module
//!
//! Orchestrates a generation run for keel.
//!
//! ## Structure
//!
//! - `result` - Result types (`GenerateReport`)
//! - `use_case` - Core use case logic (`GenerateUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use keel::application::generate::GenerateUseCase;
//!
//! let use_case = GenerateUseCase::new(loader, config_loader, env_linter, writer, fs);
//! let output = use_case.generate(Path::new("."))?;
//! ```

mod result;
mod use_case;

pub use result::GenerateReport;
pub use use_case::GenerateUseCase;
