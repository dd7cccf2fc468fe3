//! Maven stage definitions and configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// OpenRewrite recipe used to normalise pom.xml formatting.
pub const NORMALIZE_FORMAT_RECIPE: &str = "org.openrewrite.xml.format.NormalizeFormat";

/// Builtin Maven stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinStage {
    /// mvn rewrite:run
    RewriteRun,

    /// mvn org.openrewrite.maven:rewrite-maven-plugin:run
    ///     -Drewrite.activeRecipes=org.openrewrite.xml.format.NormalizeFormat -q
    NormalizePom,

    /// mvn clean compile -q
    CleanCompile,
}

impl BuiltinStage {
    /// Get the stage name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinStage::RewriteRun => "mvn_rewrite_run",
            BuiltinStage::NormalizePom => "mvn_normalize_pom",
            BuiltinStage::CleanCompile => "mvn_clean_compile",
        }
    }

    /// Arguments passed to the Maven binary.
    pub fn args(&self) -> Vec<String> {
        match self {
            BuiltinStage::RewriteRun => vec!["rewrite:run".to_string()],
            BuiltinStage::NormalizePom => vec![
                "org.openrewrite.maven:rewrite-maven-plugin:run".to_string(),
                format!("-Drewrite.activeRecipes={NORMALIZE_FORMAT_RECIPE}"),
                "-q".to_string(),
            ],
            BuiltinStage::CleanCompile => {
                vec!["clean".to_string(), "compile".to_string(), "-q".to_string()]
            }
        }
    }

    /// Full command line for the given Maven binary.
    pub fn command(&self, binary: &str) -> Vec<String> {
        let mut command = vec![binary.to_string()];
        command.extend(self.args());
        command
    }

    fn timeout_secs(&self, config: &MavenConfig) -> u64 {
        match self {
            BuiltinStage::RewriteRun => config.rewrite_timeout_secs,
            BuiltinStage::NormalizePom => config.format_timeout_secs,
            BuiltinStage::CleanCompile => config.compile_timeout_secs,
        }
    }
}

/// How Maven is invoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MavenConfig {
    /// Maven executable (`mvn`, `./mvnw`, absolute path...).
    pub binary: String,

    /// Timeout for `rewrite:run`.
    pub rewrite_timeout_secs: u64,

    /// Timeout for pom.xml normalisation.
    pub format_timeout_secs: u64,

    /// Timeout for `clean compile`.
    pub compile_timeout_secs: u64,
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            binary: "mvn".to_string(),
            rewrite_timeout_secs: 1800,
            format_timeout_secs: 600,
            compile_timeout_secs: 1200,
        }
    }
}

impl MavenConfig {
    /// Config for a specific Maven executable with default timeouts.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }
}

/// Configuration for a single subprocess stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Human-readable stage name.
    pub name: String,

    /// Command to execute (first element is executable).
    pub command: Vec<String>,

    /// Working directory of the child process.
    pub working_dir: PathBuf,

    /// Timeout in seconds (0 disables the timeout).
    pub timeout_secs: u64,
}

impl StageConfig {
    /// Create a stage configuration from a builtin Maven stage.
    pub fn from_builtin(stage: BuiltinStage, maven: &MavenConfig, working_dir: &Path) -> Self {
        Self {
            name: stage.name().to_string(),
            command: stage.command(&maven.binary),
            working_dir: working_dir.to_path_buf(),
            timeout_secs: stage.timeout_secs(maven),
        }
    }

    /// Create a custom stage configuration.
    pub fn custom(
        name: String,
        command: Vec<String>,
        working_dir: &Path,
        timeout_secs: u64,
    ) -> Self {
        Self {
            name,
            command,
            working_dir: working_dir.to_path_buf(),
            timeout_secs,
        }
    }

    /// Command line joined for display.
    pub fn display_command(&self) -> String {
        self.command.join(" ")
    }
}
