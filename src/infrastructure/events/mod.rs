//! Event Sink Implementations
//!
//! Provides concrete implementations of GenerateEventSink:
//! - ConsoleEventSink: Human-readable progress on stderr
//! - JsonEventSink: NDJSON output for CI/automation

mod console;
mod json;

pub use console::{use_color, ConsoleEventSink};
pub use json::JsonEventSink;
