//! Generate Use Case
//!
//! Orchestrates a generation run:
//! 1. Load the graph through the configured loader
//! 2. Lint the environment and the graph (the only early abort point)
//! 3. Generate the workspace descriptor
//! 4. Write it
//! 5. Apply the loader's side effects
//! 6. Run the signing and package installers
//!
//! Warnings from every stage are collected into one accumulator per call and
//! flushed once at the end, before the error on a failed run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::side_effects::{CancellationFlag, ExecutionReport, SideEffectExecutor};
use crate::config::Config;
use crate::domain::entities::Graph;
use crate::domain::ports::{
    ConfigLoader, EnvironmentLinter, FileSystem, GenerateEvent, GenerateEventSink, GraphLoader,
    NoopEventSink, PackageInstaller, SigningInstaller, WorkspaceWriter,
};
use crate::domain::services::{
    DescriptorGenerator, GeneratorOptions, GraphLinter, GraphTraverser, LintOptions,
};
use crate::domain::value_objects::{
    GenerationStage, IssueSubject, LintRule, LintingIssue, LintingIssues, Severity,
};
use crate::error::{KeelError, KeelResult, LintError};

use super::result::GenerateReport;

/// Installer used when none is configured
struct SkipInstaller;

impl SigningInstaller for SkipInstaller {
    fn install(
        &self,
        _traverser: &GraphTraverser<'_>,
        _config: &Config,
    ) -> anyhow::Result<Vec<LintingIssue>> {
        Ok(Vec::new())
    }
}

impl PackageInstaller for SkipInstaller {
    fn install(
        &self,
        _traverser: &GraphTraverser<'_>,
        _workspace_name: &str,
        _config: &Config,
    ) -> anyhow::Result<Vec<LintingIssue>> {
        Ok(Vec::new())
    }
}

/// Generate use case - orchestrates the generation pipeline
///
/// Every collaborator is a port, so a run can be driven entirely by
/// in-memory implementations.
pub struct GenerateUseCase {
    graph_loader: Box<dyn GraphLoader>,
    config_loader: Box<dyn ConfigLoader>,
    environment_linter: Box<dyn EnvironmentLinter>,
    workspace_writer: Box<dyn WorkspaceWriter>,
    file_system: Arc<dyn FileSystem>,
    signing_installer: Box<dyn SigningInstaller>,
    package_installer: Box<dyn PackageInstaller>,
    events: Arc<dyn GenerateEventSink>,
    cancellation: CancellationFlag,
}

impl GenerateUseCase {
    pub fn new(
        graph_loader: Box<dyn GraphLoader>,
        config_loader: Box<dyn ConfigLoader>,
        environment_linter: Box<dyn EnvironmentLinter>,
        workspace_writer: Box<dyn WorkspaceWriter>,
        file_system: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            graph_loader,
            config_loader,
            environment_linter,
            workspace_writer,
            file_system,
            signing_installer: Box::new(SkipInstaller),
            package_installer: Box::new(SkipInstaller),
            events: Arc::new(NoopEventSink),
            cancellation: CancellationFlag::new(),
        }
    }

    pub fn with_signing_installer(mut self, installer: Box<dyn SigningInstaller>) -> Self {
        self.signing_installer = installer;
        self
    }

    pub fn with_package_installer(mut self, installer: Box<dyn PackageInstaller>) -> Self {
        self.package_installer = installer;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn GenerateEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Load the graph without linting or generating anything
    ///
    /// Error issues reported by the loader fail the call; warnings are
    /// flushed.
    pub fn load(&self, path: &Path) -> KeelResult<Graph> {
        let mut warnings = LintingIssues::new();
        let mut stage = GenerationStage::Loading;

        let result = self.enter(&mut stage, GenerationStage::Loading).and_then(|()| {
            let loaded = self.graph_loader.load(path)?;
            self.check_batch(loaded.issues, &mut warnings)?;
            Ok(loaded.graph)
        });

        self.flush(&mut warnings);
        if let Err(err) = &result {
            self.fail(stage, err);
        }
        result
    }

    /// Run the full pipeline and return the generated workspace path
    pub fn generate(&self, path: &Path) -> KeelResult<PathBuf> {
        self.generate_report(path).map(|report| report.output_path)
    }

    /// Run the full pipeline and return the workspace path with the graph
    pub fn generate_with_graph(&self, path: &Path) -> KeelResult<(PathBuf, Graph)> {
        self.generate_report(path)
            .map(|report| (report.output_path, report.graph))
    }

    /// Run the full pipeline and return everything it produced
    pub fn generate_report(&self, path: &Path) -> KeelResult<GenerateReport> {
        let mut warnings = LintingIssues::new();
        let mut stage = GenerationStage::Loading;

        let result = self.run(path, &mut stage, &mut warnings);
        let flushed = self.flush(&mut warnings);

        match result {
            Ok(mut report) => {
                report.warnings = flushed;
                self.events.on_event(GenerateEvent::StageEntered {
                    stage: GenerationStage::Done,
                });
                self.events.on_event(GenerateEvent::Completed {
                    output: report.output_path.clone(),
                    project_count: report.project_count(),
                    side_effect_count: report.execution.len(),
                });
                Ok(report)
            }
            Err(err) => {
                self.fail(stage, &err);
                Err(err)
            }
        }
    }

    fn run(
        &self,
        root: &Path,
        stage: &mut GenerationStage,
        warnings: &mut LintingIssues,
    ) -> KeelResult<GenerateReport> {
        // Loading
        self.enter(stage, GenerationStage::Loading)?;
        let loaded = self.graph_loader.load(root)?;

        // Linting
        self.enter(stage, GenerationStage::Linting)?;
        let loaded_config = self.config_loader.load_config(root)?;
        let config = loaded_config.config;

        let mut environment_batch = loaded.issues;
        environment_batch.extend(loaded_config.warnings.iter().map(|w| w.to_issue()));
        environment_batch.extend(self.environment_linter.lint(&config)?);
        self.check_batch(environment_batch, warnings)?;

        let traverser = GraphTraverser::new(&loaded.graph);
        let lint_options = LintOptions::default()
            .with_disable_static_products_lint(loaded.graph.options().disable_static_products_lint)
            .with_configurations(config.configurations());
        let graph_batch = GraphLinter::new().lint(&traverser, &lint_options);
        let defect = graph_batch
            .iter()
            .find(|issue| issue.rule == LintRule::MissingReference)
            .map(|issue| issue.reason.clone());
        let checked = self.check_batch(graph_batch, warnings);
        // Every error of the batch is reported before a producer defect wins
        if let Some(reason) = defect {
            return Err(KeelError::Internal { reason });
        }
        checked?;

        // Generating
        self.enter(stage, GenerationStage::Generating)?;
        let generator_options =
            GeneratorOptions::default().with_configurations(config.configurations());
        let workspace = DescriptorGenerator::new().generate_workspace(&traverser, &generator_options)?;

        // Writing
        self.enter(stage, GenerationStage::Writing)?;
        self.workspace_writer.write(&workspace)?;

        // ApplyingSideEffects
        self.enter(stage, GenerationStage::ApplyingSideEffects)?;
        let execution: ExecutionReport = SideEffectExecutor::new(self.file_system.as_ref())
            .with_cancellation(self.cancellation.clone())
            .with_events(self.events.as_ref())
            .execute(&loaded.side_effects)?;

        // PostGeneration
        self.enter(stage, GenerationStage::PostGeneration)?;
        warnings.extend(Self::as_warnings(
            self.signing_installer.install(&traverser, &config),
            LintRule::Signing,
            "Installing signing material",
        ));
        warnings.extend(Self::as_warnings(
            self.package_installer
                .install(&traverser, &workspace.name, &config),
            LintRule::Packages,
            "Resolving packages",
        ));

        Ok(GenerateReport {
            output_path: workspace.path.clone(),
            graph: loaded.graph,
            workspace,
            warnings: Vec::new(),
            execution,
        })
    }

    /// Move to `next`, reporting the transition
    ///
    /// Cancellation is observed here, before any stage that can still fail.
    fn enter(&self, stage: &mut GenerationStage, next: GenerationStage) -> KeelResult<()> {
        if next != GenerationStage::Loading
            && next.can_fail()
            && self.cancellation.is_cancelled()
        {
            return Err(KeelError::Cancelled { applied: 0 });
        }
        *stage = next;
        self.events.on_event(GenerateEvent::StageEntered { stage: next });
        Ok(())
    }

    /// Keep a batch's warnings; report and fail on its errors
    fn check_batch(
        &self,
        batch: Vec<LintingIssue>,
        warnings: &mut LintingIssues,
    ) -> Result<(), LintError> {
        let (errors, batch_warnings): (Vec<LintingIssue>, Vec<LintingIssue>) =
            batch.into_iter().partition(LintingIssue::is_error);
        warnings.extend(batch_warnings);

        if errors.is_empty() {
            return Ok(());
        }
        self.events.on_event(GenerateEvent::IssuesReported {
            issues: errors.clone(),
        });
        Err(LintError { issues: errors })
    }

    fn as_warnings(
        result: anyhow::Result<Vec<LintingIssue>>,
        rule: LintRule,
        action: &str,
    ) -> Vec<LintingIssue> {
        match result {
            Ok(issues) => issues
                .into_iter()
                .map(|issue| LintingIssue {
                    severity: Severity::Warning,
                    ..issue
                })
                .collect(),
            Err(err) => vec![LintingIssue::warning(
                rule,
                IssueSubject::Workspace,
                format!("{action} failed: {err:#}"),
            )],
        }
    }

    fn flush(&self, warnings: &mut LintingIssues) -> Vec<LintingIssue> {
        let flushed = warnings.take();
        self.events.on_event(GenerateEvent::WarningsFlushed {
            warnings: flushed.clone(),
        });
        flushed
    }

    fn fail(&self, stage: GenerationStage, err: &KeelError) {
        self.events.on_event(GenerateEvent::Failed {
            stage,
            error: err.to_string(),
        });
    }
}
