//! Console Event Sink
//!
//! Human-readable progress and issue reports on stderr.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::Stylize;
use is_terminal::IsTerminal;

use crate::config::ColorMode;
use crate::domain::entities::SideEffectOutcome;
use crate::domain::ports::{GenerateEvent, GenerateEventSink};
use crate::domain::value_objects::{render_issues, GenerationStage, LintingIssue};

const ERROR_HEADING: &str = "The following issues have been found:";

/// Whether to emit ANSI colors
///
/// `Auto` colors only a terminal, and only when `NO_COLOR` is unset.
pub fn use_color(mode: ColorMode, is_tty: bool, no_color: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_tty && !no_color,
    }
}

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn stderr(mode: ColorMode, verbose: bool) -> Self {
        let color = use_color(
            mode,
            io::stderr().is_terminal(),
            std::env::var_os("NO_COLOR").is_some(),
        );
        Self::with_writer(io::stderr(), color, verbose)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, color: bool, verbose: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color,
            verbose,
        }
    }

    fn write(&self, text: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = write!(writer, "{}", text);
            let _ = writer.flush();
        }
    }

    fn render_report(&self, issues: &[LintingIssue]) -> String {
        let report = render_issues(issues);
        if !self.color {
            return report;
        }
        report
            .lines()
            .map(|line| {
                if line.starts_with(' ') {
                    format!("{line}\n")
                } else if line == ERROR_HEADING {
                    format!("{}\n", line.red().bold())
                } else {
                    format!("{}\n", line.yellow().bold())
                }
            })
            .collect()
    }

    fn paint_dim(&self, text: &str) -> String {
        if self.color {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }
}

impl GenerateEventSink for ConsoleEventSink {
    fn on_event(&self, event: GenerateEvent) {
        match event {
            GenerateEvent::StageEntered { stage } => {
                if self.verbose && stage != GenerationStage::Done {
                    self.write(&format!("{}\n", self.paint_dim(&format!("> {}", stage.label()))));
                }
            }

            GenerateEvent::IssuesReported { issues } => {
                self.write(&self.render_report(&issues));
            }

            GenerateEvent::SideEffectApplied {
                index,
                total,
                description,
                outcome,
                ..
            } => {
                let suffix = match outcome {
                    SideEffectOutcome::Applied => "",
                    SideEffectOutcome::Unchanged => " (unchanged)",
                };
                self.write(&format!(
                    "  [{}/{}] {}{}\n",
                    index + 1,
                    total,
                    description,
                    self.paint_dim(suffix)
                ));
            }

            GenerateEvent::WarningsFlushed { warnings } => {
                if !warnings.is_empty() {
                    self.write(&self.render_report(&warnings));
                }
            }

            GenerateEvent::Completed {
                output,
                project_count,
                side_effect_count,
            } => {
                let mark = if self.color {
                    "✓".green().to_string()
                } else {
                    "✓".to_string()
                };
                self.write(&format!(
                    "{} Generated {} ({} project(s), {} side effect(s))\n",
                    mark,
                    output.display(),
                    project_count,
                    side_effect_count
                ));
            }

            GenerateEvent::Failed { stage, .. } => {
                if self.verbose {
                    self.write(&format!(
                        "{}\n",
                        self.paint_dim(&format!("> failed while {}", stage.label().to_lowercase()))
                    ));
                }
            }
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.verbose
    }
}
