//! JSON Event Sink
//!
//! Outputs generation events as NDJSON for CI/automation consumption.

use crate::domain::ports::{GenerateEvent, GenerateEventSink};
use crate::domain::value_objects::LintingIssue;
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn issues_json(issues: &[LintingIssue]) -> serde_json::Value {
    serde_json::to_value(issues).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}

impl GenerateEventSink for JsonEventSink {
    fn on_event(&self, event: GenerateEvent) {
        let json = match event {
            GenerateEvent::StageEntered { stage } => {
                serde_json::json!({
                    "event": "stage",
                    "command": "generate",
                    "stage": stage.as_str(),
                })
            }

            GenerateEvent::IssuesReported { issues } => {
                serde_json::json!({
                    "event": "issues",
                    "command": "generate",
                    "count": issues.len(),
                    "issues": issues_json(&issues),
                })
            }

            GenerateEvent::SideEffectApplied {
                index,
                total,
                path,
                description,
                outcome,
            } => {
                serde_json::json!({
                    "event": "side_effect",
                    "command": "generate",
                    "index": index,
                    "total": total,
                    "path": path.display().to_string(),
                    "description": description,
                    "outcome": outcome.as_str(),
                })
            }

            GenerateEvent::WarningsFlushed { warnings } => {
                serde_json::json!({
                    "event": "warnings",
                    "command": "generate",
                    "count": warnings.len(),
                    "warnings": issues_json(&warnings),
                })
            }

            GenerateEvent::Completed {
                output,
                project_count,
                side_effect_count,
            } => {
                serde_json::json!({
                    "event": "complete",
                    "command": "generate",
                    "status": "success",
                    "output": output.display().to_string(),
                    "projects": project_count,
                    "side_effects": side_effect_count,
                })
            }

            GenerateEvent::Failed { stage, error } => {
                serde_json::json!({
                    "event": "complete",
                    "command": "generate",
                    "status": "failed",
                    "stage": stage.as_str(),
                    "error": error,
                })
            }
        };

        self.write_event(json);
    }

    fn wants_detailed_events(&self) -> bool {
        true // JSON mode wants all events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SideEffectOutcome;
    use crate::domain::value_objects::{GenerationStage, IssueSubject, LintRule};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    buffer: buffer.clone(),
                },
                buffer,
            )
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        String::from_utf8(buffer.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn json_sink_outputs_one_line_per_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(GenerateEvent::StageEntered {
            stage: GenerationStage::ApplyingSideEffects,
        });
        sink.on_event(GenerateEvent::SideEffectApplied {
            index: 0,
            total: 2,
            path: PathBuf::from("/w/Derived"),
            description: "create directory /w/Derived".to_string(),
            outcome: SideEffectOutcome::Unchanged,
        });

        let events = lines(&buffer);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["stage"], "applying_side_effects");
        assert_eq!(events[1]["event"], "side_effect");
        assert_eq!(events[1]["outcome"], "unchanged");
    }

    #[test]
    fn json_sink_serializes_issues() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(GenerateEvent::WarningsFlushed {
            warnings: vec![LintingIssue::warning(
                LintRule::StaticProductDuplication,
                IssueSubject::Workspace,
                "Shared is linked twice",
            )],
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["count"], 1);
        assert_eq!(events[0]["warnings"][0]["severity"], "warning");
        assert_eq!(events[0]["warnings"][0]["rule"], "static_product_duplication");
        assert_eq!(events[0]["warnings"][0]["subject"]["type"], "workspace");
    }

    #[test]
    fn json_sink_outputs_complete_event() {
        let (writer, buffer) = TestWriter::new();
        let sink = JsonEventSink::with_writer(writer);

        sink.on_event(GenerateEvent::Completed {
            output: PathBuf::from("/w/Demo.keelworkspace"),
            project_count: 2,
            side_effect_count: 0,
        });
        sink.on_event(GenerateEvent::Failed {
            stage: GenerationStage::Linting,
            error: "cycle".to_string(),
        });

        let events = lines(&buffer);
        assert_eq!(events[0]["status"], "success");
        assert_eq!(events[0]["projects"], 2);
        assert_eq!(events[1]["status"], "failed");
        assert_eq!(events[1]["stage"], "linting");
    }
}
