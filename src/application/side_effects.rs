//! Side-effect executor
//!
//! Applies `SideEffectDescriptor`s in order against a `FileSystem`. Every
//! descriptor is idempotent: applying a list twice leaves the same tree as
//! applying it once. The first failure stops the run; nothing is rolled
//! back.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::entities::{OverwritePolicy, SideEffectDescriptor, SideEffectOutcome};
use crate::domain::ports::{FileSystem, FsError, GenerateEvent, GenerateEventSink};
use crate::error::{KeelError, KeelResult, SideEffectError};

/// Shared cancellation flag
///
/// Set from a signal handler; checked between side effects and between
/// pipeline stages, never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One processed descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedEffect {
    pub path: PathBuf,
    pub delete: bool,
    pub outcome: SideEffectOutcome,
}

/// What an execution did, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub effects: Vec<ExecutedEffect>,
}

impl ExecutionReport {
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.effects
            .iter()
            .filter(|e| e.outcome == SideEffectOutcome::Applied)
            .count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.len() - self.applied_count()
    }

    /// Deletes that actually removed something
    pub fn deleted_count(&self) -> usize {
        self.effects
            .iter()
            .filter(|e| e.delete && e.outcome == SideEffectOutcome::Applied)
            .count()
    }
}

pub struct SideEffectExecutor<'a, FS: FileSystem + ?Sized> {
    fs: &'a FS,
    cancellation: CancellationFlag,
    sink: Option<&'a dyn GenerateEventSink>,
}

impl<'a, FS: FileSystem + ?Sized> SideEffectExecutor<'a, FS> {
    pub fn new(fs: &'a FS) -> Self {
        Self {
            fs,
            cancellation: CancellationFlag::new(),
            sink: None,
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_events(mut self, sink: &'a dyn GenerateEventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Apply every descriptor in order
    ///
    /// Fails with `KeelError::SideEffect` on the first failing descriptor or
    /// `KeelError::Cancelled` when cancellation is observed between two.
    pub fn execute(&self, effects: &[SideEffectDescriptor]) -> KeelResult<ExecutionReport> {
        let mut report = ExecutionReport::default();
        let detailed = self.sink.is_some_and(|s| s.wants_detailed_events());

        for (index, effect) in effects.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                return Err(KeelError::Cancelled { applied: index });
            }

            let outcome = self.apply(effect).map_err(|err| {
                SideEffectError::from_fs(effect.path().to_path_buf(), &err, index)
            })?;

            if detailed {
                if let Some(sink) = self.sink {
                    sink.on_event(GenerateEvent::SideEffectApplied {
                        index,
                        total: effects.len(),
                        path: effect.path().to_path_buf(),
                        description: effect.to_string(),
                        outcome,
                    });
                }
            }

            report.effects.push(ExecutedEffect {
                path: effect.path().to_path_buf(),
                delete: effect.is_delete(),
                outcome,
            });
        }

        Ok(report)
    }

    fn apply(&self, effect: &SideEffectDescriptor) -> Result<SideEffectOutcome, FsError> {
        match effect {
            SideEffectDescriptor::CreateDirectory { path } => {
                if self.fs.is_dir(path) {
                    return Ok(SideEffectOutcome::Unchanged);
                }
                self.fs.create_dir_all(path)?;
                Ok(SideEffectOutcome::Applied)
            }
            SideEffectDescriptor::CreateFile {
                path,
                contents,
                overwrite,
            } => {
                if self.fs.is_dir(path) {
                    return Err(FsError::InvalidPath(path.clone()));
                }
                if self.fs.exists(path) {
                    if *overwrite == OverwritePolicy::Skip {
                        return Ok(SideEffectOutcome::Unchanged);
                    }
                    if self.fs.read(path).is_ok_and(|current| &current == contents) {
                        return Ok(SideEffectOutcome::Unchanged);
                    }
                }
                self.fs.write(path, contents)?;
                Ok(SideEffectOutcome::Applied)
            }
            SideEffectDescriptor::Delete { path } => {
                if !self.fs.exists(path) {
                    return Ok(SideEffectOutcome::Unchanged);
                }
                self.fs.remove(path)?;
                Ok(SideEffectOutcome::Applied)
            }
        }
    }
}
