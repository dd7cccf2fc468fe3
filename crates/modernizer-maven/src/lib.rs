//! Modernizer Maven - external build tool invocation
//!
//! Runs the Maven CLI as a subprocess inside a workspace:
//! - OpenRewrite recipe run (`rewrite:run`)
//! - pom.xml normalisation through the OpenRewrite plugin
//! - `clean compile` verification
//!
//! Every invocation is bounded by a timeout and captures stdout/stderr.

pub mod error;
pub mod runner;
pub mod stage;

// Re-export key types
pub use error::{Result, ToolError};
pub use runner::{StageResult, ToolRunner};
pub use stage::{BuiltinStage, MavenConfig, StageConfig};
