//! Error types for external tool invocation

use thiserror::Error;

/// Errors that can occur while running an external build tool stage
#[derive(Error, Debug)]
pub enum ToolError {
    /// Stage was configured without an executable
    #[error("Stage {stage} has empty command")]
    EmptyCommand { stage: String },

    /// Process could not be started (binary missing, permissions, bad cwd)
    #[error("Failed to launch {program} for stage {stage}: {source}")]
    Launch {
        stage: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Process did not exit before the stage timeout
    #[error("Stage {stage} timed out after {timeout_secs} seconds")]
    TimedOut { stage: String, timeout_secs: u64 },

    /// Process ran and exited with a non-zero status
    #[error("Stage {stage} exited with code {exit_code}: {stderr}")]
    InvocationFailed {
        stage: String,
        exit_code: i32,
        stderr: String,
    },

    /// IO error while waiting on the child
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Diagnostic text suitable for surfacing to a caller.
    ///
    /// For a failed invocation this is the captured stderr (falling back to
    /// the error message when the tool printed nothing).
    pub fn diagnostics(&self) -> String {
        match self {
            ToolError::InvocationFailed { stderr, .. } if !stderr.trim().is_empty() => {
                stderr.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Result alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_prefers_stderr() {
        let err = ToolError::InvocationFailed {
            stage: "mvn_compile".to_string(),
            exit_code: 1,
            stderr: "[ERROR] Point.java:[3,1] class, interface, enum, or record expected"
                .to_string(),
        };
        assert!(err.diagnostics().starts_with("[ERROR] Point.java"));
    }

    #[test]
    fn test_diagnostics_falls_back_to_message() {
        let err = ToolError::InvocationFailed {
            stage: "mvn_compile".to_string(),
            exit_code: 1,
            stderr: "  \n".to_string(),
        };
        assert_eq!(err.diagnostics(), "Stage mvn_compile exited with code 1:   \n");

        let err = ToolError::TimedOut {
            stage: "mvn_compile".to_string(),
            timeout_secs: 5,
        };
        assert!(err.diagnostics().contains("timed out after 5 seconds"));
    }
}
