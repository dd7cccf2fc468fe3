//! Subprocess stage execution.

use crate::error::{Result, ToolError};
use crate::stage::{BuiltinStage, MavenConfig, StageConfig};
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

/// Result of a stage execution.
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Stage name.
    pub stage_name: String,

    /// Exit code (0 = success, -1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether execution succeeded.
    pub success: bool,
}

impl StageResult {
    /// Whether this stage passed (exit code 0).
    pub fn passed(&self) -> bool {
        self.success && self.exit_code == 0
    }

    /// Convert a non-zero exit into [`ToolError::InvocationFailed`].
    pub fn into_checked(self) -> Result<StageResult> {
        if self.passed() {
            Ok(self)
        } else {
            // Maven prints compiler errors on stdout; fall back to it when stderr is empty.
            let stderr = if self.stderr.trim().is_empty() {
                self.stdout
            } else {
                self.stderr
            };
            Err(ToolError::InvocationFailed {
                stage: self.stage_name,
                exit_code: self.exit_code,
                stderr,
            })
        }
    }
}

/// Runs external tool stages as child processes.
pub struct ToolRunner;

impl ToolRunner {
    /// Execute a single stage and return the result.
    ///
    /// A non-zero exit is reported through [`StageResult::success`], not as an
    /// error. Errors are reserved for launch failures and timeouts.
    pub async fn execute_stage(config: &StageConfig) -> Result<StageResult> {
        let start = Instant::now();

        let Some((exe, args)) = config.command.split_first() else {
            return Err(ToolError::EmptyCommand {
                stage: config.name.clone(),
            });
        };

        debug!(
            stage = %config.name,
            command = %config.display_command(),
            cwd = %config.working_dir.display(),
            "Spawning stage"
        );

        let child = Command::new(exe)
            .args(args)
            .current_dir(&config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolError::Launch {
                stage: config.name.clone(),
                program: exe.clone(),
                source,
            })?;

        let output = if config.timeout_secs > 0 {
            tokio::time::timeout(
                Duration::from_secs(config.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| ToolError::TimedOut {
                stage: config.name.clone(),
                timeout_secs: config.timeout_secs,
            })??
        } else {
            child.wait_with_output().await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let success = output.status.success();

        info!(stage = %config.name, exit_code, duration_ms, "Stage finished");

        Ok(StageResult {
            stage_name: config.name.clone(),
            exit_code,
            stdout,
            stderr,
            duration_ms,
            success,
        })
    }

    /// Execute a builtin Maven stage inside `working_dir`.
    pub async fn run_builtin(
        stage: BuiltinStage,
        maven: &MavenConfig,
        working_dir: &Path,
    ) -> Result<StageResult> {
        let config = StageConfig::from_builtin(stage, maven, working_dir);
        Self::execute_stage(&config).await
    }

    /// Execute a builtin stage and treat a non-zero exit as an error.
    pub async fn run_builtin_checked(
        stage: BuiltinStage,
        maven: &MavenConfig,
        working_dir: &Path,
    ) -> Result<StageResult> {
        Self::run_builtin(stage, maven, working_dir)
            .await?
            .into_checked()
    }
}
