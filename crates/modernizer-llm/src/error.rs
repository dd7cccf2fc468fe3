//! Error types for modernizer-llm

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or calling the completion model
#[derive(Error, Debug)]
pub enum ModelError {
    /// API credential absent from both the environment and the env file
    #[error("{var} is not set in the environment or the env file")]
    MissingCredential { var: String },

    /// Env file exists but could not be parsed
    #[error("Failed to read env file {path}: {message}")]
    EnvFile { path: PathBuf, message: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Transport failure, timeout or non-success API response
    #[error("Remote call failed: {cause}")]
    RemoteCallFailed { cause: String },

    /// Response parsed but carried no choices
    #[error("Completion response contained no choices")]
    EmptyResponse,
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        let cause = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        ModelError::RemoteCallFailed { cause }
    }
}

/// Result alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
