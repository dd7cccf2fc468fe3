//! Rewrite pipeline orchestration.
//!
//! Phases run strictly in order, one file and one subprocess at a time:
//! workspace copy, pom.xml retargeting, scan, per-file model rewrite,
//! OpenRewrite run, compile verification. Only workspace preparation can
//! abort a run; every later failure is recorded in the [`RunReport`].

use crate::descriptor::{modernize_descriptor, DEFAULT_JAVA_RELEASE};
use crate::error::Result;
use crate::report::{
    content_digest, FileOutcome, FileStage, FileStatus, PipelinePhase, RunReport, ToolOutcome,
    VerificationResult,
};
use crate::scanner::scan_java_project;
use crate::workspace::Workspace;
use chrono::Utc;
use modernizer_llm::ModernizationModel;
use modernizer_maven::{BuiltinStage, MavenConfig, ToolRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Options for a modernization run.
#[derive(Debug, Clone)]
pub struct ModernizeOptions {
    /// Java release written into pom.xml and requested from the model.
    pub java_release: String,
    /// How Maven is invoked.
    pub maven: MavenConfig,
    /// Run the OpenRewrite formatter over pom.xml after editing it.
    pub format_descriptor: bool,
}

impl Default for ModernizeOptions {
    fn default() -> Self {
        Self {
            java_release: DEFAULT_JAVA_RELEASE.to_string(),
            maven: MavenConfig::default(),
            format_descriptor: true,
        }
    }
}

/// Sequences one modernization run over a [`Workspace`].
pub struct RewriteOrchestrator {
    workspace: Workspace,
    model: Arc<dyn ModernizationModel>,
    options: ModernizeOptions,
}

impl RewriteOrchestrator {
    pub fn new(
        workspace: Workspace,
        model: Arc<dyn ModernizationModel>,
        options: ModernizeOptions,
    ) -> Self {
        RewriteOrchestrator {
            workspace,
            model,
            options,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Run the full pipeline.
    ///
    /// Errors only when the workspace cannot be prepared.
    pub async fn run(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let root = self.workspace.output_root();
        let mut phase = PipelinePhase::Idle;

        info!(
            run_id = %run_id,
            input = %self.workspace.input_root().display(),
            java_release = %self.options.java_release,
            "Starting modernization run"
        );

        let workspace = self.workspace.clone();
        tokio::task::spawn_blocking(move || workspace.prepare()).await??;
        advance(&mut phase, PipelinePhase::WorkspacePrepared);

        let maven = self.options.format_descriptor.then_some(&self.options.maven);
        let descriptor = modernize_descriptor(root, &self.options.java_release, maven).await;
        advance(&mut phase, PipelinePhase::InfraModernized);

        info!(root = %root.display(), "Scanning workspace");
        let files = scan_java_project(root);
        info!(count = files.len(), "Java files found");
        advance(&mut phase, PipelinePhase::Scanned);

        let outcomes = self.rewrite_files(&files).await;
        advance(&mut phase, PipelinePhase::FilesRewritten);

        let refactor = self.apply_refactor().await;
        advance(&mut phase, PipelinePhase::ExternalRefactorApplied);

        let verification = verify_project(root, &self.options.maven).await;
        if verification.success {
            advance(&mut phase, PipelinePhase::Verified);
        } else {
            warn!("Modernization introduced compilation errors");
            advance(&mut phase, PipelinePhase::Failed);
        }

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            input_root: self.workspace.input_root().to_path_buf(),
            output_root: root.to_path_buf(),
            phase,
            descriptor,
            files: outcomes,
            refactor,
            verification,
        };

        info!(
            run_id = %run_id,
            rewritten = report.rewritten_count(),
            unchanged = report.unchanged_count(),
            failed = report.failed_count(),
            phase = %report.phase,
            "Modernization run finished"
        );

        Ok(report)
    }

    /// Rewrite each file in order. A failing file never stops the loop.
    pub async fn rewrite_files(&self, files: &[PathBuf]) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            outcomes.push(self.rewrite_file(path).await);
        }
        outcomes
    }

    /// Read, ask the model, overwrite. No rollback: a failed write may leave
    /// partial content behind.
    pub async fn rewrite_file(&self, path: &Path) -> FileOutcome {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let failed = |stage: FileStage, error: String, before_digest: Option<String>| {
            warn!(file = %path.display(), ?stage, error = %error, "Error processing file");
            FileOutcome {
                path: path.to_path_buf(),
                status: FileStatus::Failed { stage, error },
                before_digest,
                after_digest: None,
            }
        };

        let original = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) => return failed(FileStage::Read, err.to_string(), None),
        };
        let before_digest = content_digest(&original);

        let modernized = match self
            .model
            .modernize(&file_name, &original, &self.options.java_release)
            .await
        {
            Ok(text) => text,
            Err(err) => return failed(FileStage::Model, err.to_string(), Some(before_digest)),
        };

        if let Err(err) = tokio::fs::write(path, &modernized).await {
            return failed(FileStage::Write, err.to_string(), Some(before_digest));
        }

        let after_digest = content_digest(&modernized);
        let status = if after_digest == before_digest {
            FileStatus::Unchanged
        } else {
            FileStatus::Rewritten
        };
        info!(file = %path.display(), ?status, "Modernized file");

        FileOutcome {
            path: path.to_path_buf(),
            status,
            before_digest: Some(before_digest),
            after_digest: Some(after_digest),
        }
    }

    /// `mvn rewrite:run` in the workspace. Failure is logged and recorded only.
    pub async fn apply_refactor(&self) -> ToolOutcome {
        let root = self.workspace.output_root();
        info!(root = %root.display(), "Running OpenRewrite recipes");

        let stage = BuiltinStage::RewriteRun;
        let result = ToolRunner::run_builtin(stage, &self.options.maven, root).await;
        let outcome = ToolOutcome::from_result(stage.name(), result);

        if outcome.success {
            info!("OpenRewrite recipes applied");
        } else {
            warn!(
                exit_code = ?outcome.exit_code,
                diagnostics = outcome.diagnostics.as_deref().unwrap_or_default(),
                "OpenRewrite run failed, continuing"
            );
        }
        outcome
    }
}

/// Compile the project at `root` with `mvn clean compile -q`.
///
/// Never fails: launch errors, timeouts and non-zero exits all become a
/// failed [`VerificationResult`] with diagnostic text.
pub async fn verify_project(root: &Path, maven: &MavenConfig) -> VerificationResult {
    info!(root = %root.display(), "Verifying project by compiling");

    match ToolRunner::run_builtin_checked(BuiltinStage::CleanCompile, maven, root).await {
        Ok(_) => {
            info!("Project compiled successfully");
            VerificationResult::passed()
        }
        Err(err) => {
            let diagnostics = err.diagnostics();
            warn!(error = %err, "Compilation failed");
            VerificationResult::failed(diagnostics)
        }
    }
}

fn advance(phase: &mut PipelinePhase, next: PipelinePhase) {
    debug_assert!(next > *phase, "pipeline phases only move forward");
    info!(from = %phase, to = %next, "Pipeline phase");
    *phase = next;
}
