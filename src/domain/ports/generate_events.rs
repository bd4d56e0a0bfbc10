//! Generate Event Port
//!
//! Observable interface for generation runs: progress reporting, NDJSON
//! event streams and debugging all hang off it.

use std::path::PathBuf;

use crate::domain::entities::SideEffectOutcome;
use crate::domain::value_objects::{GenerationStage, LintingIssue};

/// Event emitted during a generation run
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    /// The run moved to a new stage
    StageEntered { stage: GenerationStage },

    /// A batch containing errors, reported before the run aborts
    IssuesReported { issues: Vec<LintingIssue> },

    /// One side effect was processed
    SideEffectApplied {
        index: usize,
        total: usize,
        path: PathBuf,
        description: String,
        outcome: SideEffectOutcome,
    },

    /// Deferred warnings, emitted exactly once per run
    WarningsFlushed { warnings: Vec<LintingIssue> },

    Completed {
        output: PathBuf,
        project_count: usize,
        side_effect_count: usize,
    },

    Failed {
        stage: GenerationStage,
        error: String,
    },
}

/// Trait for receiving generate events
///
/// Implementations:
/// - ConsoleEventSink: progress on stderr
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: silent operation
pub trait GenerateEventSink: Send + Sync {
    fn on_event(&self, event: GenerateEvent);

    /// Whether this sink wants per-effect events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl GenerateEventSink for NoopEventSink {
    fn on_event(&self, _event: GenerateEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
