//! Error taxonomy for the modernization pipeline.

use std::path::PathBuf;

/// Pipeline errors.
///
/// Only workspace preparation and report serialization surface these to the
/// caller; per-file and per-tool failures are recorded in the run report.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("input project not found: {0}")]
    InputNotFound(PathBuf),

    #[error("output root {output} overlaps input root {input}")]
    WorkspaceOverlap { input: PathBuf, output: PathBuf },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CoreError>;
