//! Model configuration and credential resolution.

use crate::error::{ModelError, Result};
use std::path::Path;
use tracing::debug;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default OpenAI-compatible API base.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Sampling temperature. Kept low so reruns on the same file stay close.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Request timeout for a single completion call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Completion model configuration.
///
/// Built once at startup; the API key is validated here and never re-read.
#[derive(Clone)]
pub struct ModelConfig {
    /// Bearer credential
    pub api_key: String,
    /// Model identifier sent with every request
    pub model: String,
    /// API base URL (without `/chat/completions`)
    pub base_url: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ModelConfig {
    /// Create a config with defaults for everything but the credential.
    pub fn new(api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ModelError::MissingCredential {
                var: API_KEY_VAR.to_string(),
            });
        }

        Ok(ModelConfig {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Resolve the credential from the process environment, falling back to
    /// an optional dotenv-style file.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self> {
        Self::resolve(std::env::var(API_KEY_VAR).ok(), env_file)
    }

    /// Resolve the credential from an already-read environment value, falling
    /// back to `env_file` when the value is unset or blank.
    ///
    /// A missing env file is not an error; an unparsable one is.
    pub fn resolve(env_value: Option<String>, env_file: Option<&Path>) -> Result<Self> {
        if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
            debug!("{} taken from environment", API_KEY_VAR);
            return Self::new(&value);
        }

        if let Some(path) = env_file {
            if let Some(value) = read_env_file_var(path, API_KEY_VAR)? {
                debug!(path = %path.display(), "{} taken from env file", API_KEY_VAR);
                return Self::new(&value);
            }
        }

        Err(ModelError::MissingCredential {
            var: API_KEY_VAR.to_string(),
        })
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the request timeout.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Full URL of the chat completion endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Look up one variable in a dotenv file without touching the process
/// environment.
fn read_env_file_var(path: &Path, var: &str) -> Result<Option<String>> {
    if !path.exists() {
        debug!(path = %path.display(), "env file not found");
        return Ok(None);
    }

    let env_file_error = |message: String| ModelError::EnvFile {
        path: path.to_path_buf(),
        message,
    };

    let iter = dotenvy::from_path_iter(path).map_err(|e| env_file_error(e.to_string()))?;
    for item in iter {
        let (key, value) = item.map_err(|e| env_file_error(e.to_string()))?;
        if key == var && !value.trim().is_empty() {
            return Ok(Some(value));
        }
    }

    Ok(None)
}
