//! Run report: per-file outcomes, tool outcomes and the verification result.

use crate::descriptor::DescriptorOutcome;
use crate::error::{CoreError, Result};
use chrono::{DateTime, Utc};
use modernizer_maven::{StageResult, ToolError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// SHA-256 hex digest of file content.
pub fn content_digest(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Pipeline phases, in order. A run only moves forward.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Idle,
    WorkspacePrepared,
    InfraModernized,
    Scanned,
    FilesRewritten,
    ExternalRefactorApplied,
    Verified,
    Failed,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelinePhase::Idle => "idle",
            PipelinePhase::WorkspacePrepared => "workspace_prepared",
            PipelinePhase::InfraModernized => "infra_modernized",
            PipelinePhase::Scanned => "scanned",
            PipelinePhase::FilesRewritten => "files_rewritten",
            PipelinePhase::ExternalRefactorApplied => "external_refactor_applied",
            PipelinePhase::Verified => "verified",
            PipelinePhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Step of the per-file rewrite that failed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStage {
    Read,
    Model,
    Write,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Model output differed from the original and was written.
    Rewritten,
    /// Model returned the original text.
    Unchanged,
    /// File left as the failing step produced it.
    Failed { stage: FileStage, error: String },
}

/// Outcome of rewriting one source file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    /// Digest of the content before the rewrite (absent if unreadable).
    pub before_digest: Option<String>,
    /// Digest of the content written (absent if nothing was written).
    pub after_digest: Option<String>,
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

/// Outcome of an external tool step that does not fail the run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolOutcome {
    pub stage: String,
    pub success: bool,
    /// Exit code, absent when the process never ran to completion.
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    pub diagnostics: Option<String>,
}

impl ToolOutcome {
    pub fn from_result(stage: &str, result: std::result::Result<StageResult, ToolError>) -> Self {
        match result {
            Ok(result) => {
                let passed = result.passed();
                let duration_ms = result.duration_ms;
                let exit_code = result.exit_code;
                let diagnostics = match result.into_checked() {
                    Ok(_) => None,
                    Err(err) => Some(err.diagnostics()),
                };
                ToolOutcome {
                    stage: stage.to_string(),
                    success: passed,
                    exit_code: Some(exit_code),
                    duration_ms,
                    diagnostics,
                }
            }
            Err(err) => ToolOutcome {
                stage: stage.to_string(),
                success: false,
                exit_code: None,
                duration_ms: 0,
                diagnostics: Some(err.diagnostics()),
            },
        }
    }
}

/// Compile verification result: success flag plus diagnostic text on failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerificationResult {
    pub success: bool,
    pub diagnostics: Option<String>,
}

impl VerificationResult {
    pub fn passed() -> Self {
        VerificationResult {
            success: true,
            diagnostics: None,
        }
    }

    pub fn failed(diagnostics: impl Into<String>) -> Self {
        VerificationResult {
            success: false,
            diagnostics: Some(diagnostics.into()),
        }
    }
}

/// Everything a run did, returned to the caller instead of only logged.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    /// Last phase reached: `Verified` or `Failed`.
    pub phase: PipelinePhase,
    pub descriptor: DescriptorOutcome,
    pub files: Vec<FileOutcome>,
    pub refactor: ToolOutcome,
    pub verification: VerificationResult,
}

impl RunReport {
    pub fn rewritten_count(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Rewritten))
    }

    pub fn unchanged_count(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Unchanged))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// Files whose rewrite failed.
    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.is_failed())
    }

    /// Whether the modernized workspace compiles.
    pub fn succeeded(&self) -> bool {
        self.verification.success
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| CoreError::io(path, e))
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}
