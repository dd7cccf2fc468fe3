//! Modernizer Core
//!
//! Copies a legacy Maven project into a fresh workspace, retargets its
//! pom.xml, rewrites every Java source through a completion model and checks
//! that the result still compiles.

pub mod descriptor;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod scanner;
pub mod telemetry;
pub mod workspace;

pub use descriptor::{
    build_block, edit_descriptor, modernize_descriptor, BuildDescriptor, DescriptorOutcome,
    EditSummary, PomDescriptor, DEFAULT_JAVA_RELEASE, DESCRIPTOR_FILE, TRACKED_VERSION_TAGS,
};
pub use error::{CoreError, Result};
pub use orchestrator::{verify_project, ModernizeOptions, RewriteOrchestrator};
pub use report::{
    content_digest, FileOutcome, FileStage, FileStatus, PipelinePhase, RunReport, ToolOutcome,
    VerificationResult,
};
pub use scanner::{
    preview_project, read_file_contents, scan_java_project, FilePreview, IGNORED_DIRS, JAVA_SUFFIX,
};
pub use telemetry::{init_tracing, level_for_verbosity, LogFormat};
pub use workspace::Workspace;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
